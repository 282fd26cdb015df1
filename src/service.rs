use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::CONFIG;
use crate::database::db_models::{
    BranchRow, JobItemRow, JobRoleRow, JobRow, RoleRow, StockAssignmentRow, StockRow,
    WorkerAssignmentRow, WorkerRoleRow, WorkerRow,
};
use crate::database::DbClient;
use crate::planner::solve::compute_plan;
use crate::planner::{
    Branch, Job, PlannerConfig, PlannerInput, PlannerResult, SolutionCache, SolveStatus, Stock,
    Worker,
};

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("solver task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Serialize)]
pub struct StartedReplan {
    pub status: &'static str,
    pub replan_id: Uuid,
}

// Runs the full plan pipeline: snapshot load, solve, assignment write-back.
// The warm-start cache lives here (never a hidden global) and survives across
// invocations for the lifetime of the process.
#[derive(Clone)]
pub struct PlannerService {
    db: DbClient,
    cache: Arc<Mutex<SolutionCache>>,
    // serializes the delete-then-insert write-back between concurrent replans
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl PlannerService {
    pub fn new(db: &DbClient) -> Self {
        PlannerService {
            db: db.clone(),
            cache: Arc::new(Mutex::new(SolutionCache::default())),
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    pub async fn load_snapshot(&self) -> PlannerInput {
        let branches = self.db.get_branches().await;
        let workers = self.db.get_workers().await;
        let roles = self.db.get_roles().await;
        let stocks = self.db.get_stocks().await;
        let jobs = self.db.get_jobs().await;
        let worker_roles = self.db.get_worker_roles().await;
        let job_roles = self.db.get_job_roles().await;
        let job_items = self.db.get_job_items().await;
        build_planner_input(
            branches,
            workers,
            roles,
            stocks,
            jobs,
            worker_roles,
            job_roles,
            job_items,
        )
    }

    // Fetch all data, solve, and replace the stored assignments. Write-back
    // only happens on OPTIMAL/FEASIBLE; other statuses leave the assignment
    // tables untouched.
    pub async fn fetch_and_run_planner(
        &self,
        max_time_seconds: f64,
    ) -> Result<PlannerResult, PlanError> {
        let started = Instant::now();
        let input = self.load_snapshot().await;
        info!(
            "Loaded snapshot: {} jobs, {} workers, {} stocks, {} branches",
            input.jobs.len(),
            input.workers.len(),
            input.stocks.len(),
            input.branches.len()
        );
        if input.jobs.is_empty() {
            info!("No jobs to plan");
            return Ok(PlannerResult::empty(SolveStatus::NoJobs));
        }

        let config = PlannerConfig::from_env().with_max_time(max_time_seconds);
        let cache = self.cache.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut cache = cache.lock().expect("warm start cache poisoned");
            compute_plan(&input, &config, &mut cache)
        })
        .await?;

        match result.status {
            SolveStatus::Optimal | SolveStatus::Feasible => {
                let job_ids: Vec<String> = result.jobs.keys().cloned().collect();
                let (worker_rows, stock_rows) = format_for_database(&result);
                let _guard = self.write_lock.lock().await;
                self.db
                    .replace_assignments(&job_ids, &worker_rows, &stock_rows)
                    .await?;
                info!(
                    "Stored {} worker assignments and {} stock assignments",
                    worker_rows.len(),
                    stock_rows.len()
                );
            }
            status => {
                info!("Skipping assignment write-back (status {})", status);
            }
        }
        info!(
            "Planner run completed in {:.2}s",
            started.elapsed().as_secs_f64()
        );
        Ok(result)
    }

    // Fire-and-forget replan. The caller gets an immediate acknowledgement;
    // failures are logged and swallowed.
    pub fn fetch_and_run_planner_async(&self, max_time_seconds: f64) -> StartedReplan {
        let service = self.clone();
        let replan_id = Uuid::new_v4();
        tokio::spawn(async move {
            match service.fetch_and_run_planner(max_time_seconds).await {
                Ok(result) => debug!(
                    "Background replan {} finished with status {}",
                    replan_id, result.status
                ),
                Err(e) => error!("Background replan {} failed: {}", replan_id, e),
            }
        });
        StartedReplan {
            status: "STARTED",
            replan_id,
        }
    }
}

// Resolve the raw table rows into the closed-world planner snapshot.
//
// Role references are resolved to role *names* on both the worker and the job
// side; required role counts come from the row multiplicity of job__role.
// Entities with missing coordinates, times or branch references are dropped.
#[allow(clippy::too_many_arguments)]
pub fn build_planner_input(
    branches: Vec<BranchRow>,
    workers: Vec<WorkerRow>,
    roles: Vec<RoleRow>,
    stocks: Vec<StockRow>,
    jobs: Vec<JobRow>,
    worker_roles: Vec<WorkerRoleRow>,
    job_roles: Vec<JobRoleRow>,
    job_items: Vec<JobItemRow>,
) -> PlannerInput {
    let role_names: HashMap<String, String> = roles
        .into_iter()
        .map(|r| (r.role_id, r.role_name))
        .collect();

    let mut roles_by_worker: HashMap<String, Vec<String>> = HashMap::new();
    for link in worker_roles {
        let Some(name) = role_names.get(&link.role_id) else {
            continue;
        };
        let entry = roles_by_worker.entry(link.worker_id).or_default();
        if !entry.contains(name) {
            entry.push(name.clone());
        }
    }

    let mut role_counts_by_job: HashMap<String, HashMap<String, i64>> = HashMap::new();
    for link in job_roles {
        let Some(name) = role_names.get(&link.role_id) else {
            continue;
        };
        *role_counts_by_job
            .entry(link.job_id)
            .or_default()
            .entry(name.clone())
            .or_default() += 1;
    }

    let mut items_by_job: HashMap<String, HashMap<String, i64>> = HashMap::new();
    for link in job_items {
        *items_by_job
            .entry(link.job_id)
            .or_default()
            .entry(link.item_id)
            .or_default() += link.required_quantity as i64;
    }

    let planner_branches: Vec<Branch> = branches
        .into_iter()
        .filter_map(|b| match (b.latitude, b.longitude) {
            (Some(latitude), Some(longitude)) => Some(Branch {
                branch_id: b.branch_id,
                latitude,
                longitude,
            }),
            _ => {
                warn!("Branch {} has no coordinates, skipped", b.branch_id);
                None
            }
        })
        .collect();

    let planner_workers: Vec<Worker> = workers
        .into_iter()
        .filter_map(|w| {
            let Some(branch_id) = w.fk_branch_id else {
                warn!("Worker {} has no branch, skipped", w.worker_id);
                return None;
            };
            let roles = roles_by_worker.remove(&w.worker_id).unwrap_or_default();
            Some(Worker {
                worker_id: w.worker_id,
                branch_id,
                roles,
            })
        })
        .collect();

    let planner_stocks: Vec<Stock> = stocks
        .into_iter()
        .filter_map(|s| match (s.fk_branch_id, s.fk_item_id) {
            (Some(branch_id), Some(item_id)) => Some(Stock {
                stock_id: s.stock_id,
                item_id,
                branch_id,
                quantity: s.quantity as i64,
            }),
            _ => {
                warn!("Stock {} has no branch or item, skipped", s.stock_id);
                None
            }
        })
        .collect();

    let planner_jobs: Vec<Job> = jobs
        .into_iter()
        .filter(|j| CONFIG.job_id_filter.is_match(&j.job_id))
        .filter_map(|j| {
            let (Some(latitude), Some(longitude), Some(start), Some(end)) =
                (j.latitude, j.longitude, j.start_datetime, j.end_datetime)
            else {
                warn!("Job {} has no coordinates or time window, skipped", j.job_id);
                return None;
            };
            Some(Job {
                required_roles: role_counts_by_job.remove(&j.job_id).unwrap_or_default(),
                required_items: items_by_job.remove(&j.job_id).unwrap_or_default(),
                job_id: j.job_id,
                latitude,
                longitude,
                start_datetime: start,
                end_datetime: end,
            })
        })
        .collect();

    PlannerInput {
        jobs: planner_jobs,
        workers: planner_workers,
        stocks: planner_stocks,
        branches: planner_branches,
    }
}

// Flatten a planner result into the two association-table record sets.
pub fn format_for_database(
    result: &PlannerResult,
) -> (Vec<WorkerAssignmentRow>, Vec<StockAssignmentRow>) {
    let mut worker_rows = Vec::new();
    let mut stock_rows = Vec::new();
    for (job_id, plan) in &result.jobs {
        for worker_id in &plan.workers {
            worker_rows.push(WorkerAssignmentRow {
                worker_id: worker_id.clone(),
                job_id: job_id.clone(),
            });
        }
        for assignment in &plan.stocks {
            stock_rows.push(StockAssignmentRow {
                job_id: job_id.clone(),
                stock_id: assignment.stock_id.clone(),
                assigned_quantity: assignment.quantity as i32,
            });
        }
    }
    (worker_rows, stock_rows)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::planner::{JobPlan, StockAssignment};
    use chrono::{TimeZone, Utc};

    fn branch_row(id: &str, lat: Option<f64>, lon: Option<f64>) -> BranchRow {
        BranchRow {
            branch_id: id.into(),
            branch_name: None,
            latitude: lat,
            longitude: lon,
            country: None,
            city: None,
            street: None,
            house_number: None,
            postal_code: None,
        }
    }

    fn job_row(id: &str, with_coords: bool, with_times: bool) -> JobRow {
        let t0 = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2025, 6, 2, 12, 0, 0).unwrap();
        JobRow {
            job_id: id.into(),
            job_name: None,
            job_description: None,
            latitude: with_coords.then_some(52.52),
            longitude: with_coords.then_some(13.40),
            country: None,
            city: None,
            street: None,
            house_number: None,
            postal_code: None,
            start_datetime: with_times.then_some(t0),
            end_datetime: with_times.then_some(t1),
        }
    }

    #[test]
    fn test_build_planner_input_resolves_names_and_multiplicity() {
        let roles = vec![
            RoleRow {
                role_id: "r1".into(),
                role_name: "electrician".into(),
                role_description: None,
            },
            RoleRow {
                role_id: "r2".into(),
                role_name: "plumber".into(),
                role_description: None,
            },
        ];
        let workers = vec![
            WorkerRow {
                worker_id: "w1".into(),
                first_name: None,
                last_name: None,
                phone: None,
                fk_branch_id: Some("b1".into()),
            },
            WorkerRow {
                worker_id: "w_nobranch".into(),
                first_name: None,
                last_name: None,
                phone: None,
                fk_branch_id: None,
            },
        ];
        let worker_roles = vec![
            WorkerRoleRow {
                worker_id: "w1".into(),
                role_id: "r1".into(),
            },
            WorkerRoleRow {
                worker_id: "w1".into(),
                role_id: "r_unknown".into(),
            },
        ];
        // two rows for the same (job, role) pair mean "need 2 electricians"
        let job_roles = vec![
            JobRoleRow {
                id: 1,
                job_id: "j1".into(),
                role_id: "r1".into(),
            },
            JobRoleRow {
                id: 2,
                job_id: "j1".into(),
                role_id: "r1".into(),
            },
            JobRoleRow {
                id: 3,
                job_id: "j1".into(),
                role_id: "r2".into(),
            },
        ];
        let job_items = vec![JobItemRow {
            job_id: "j1".into(),
            item_id: "i1".into(),
            required_quantity: 7,
        }];

        let input = build_planner_input(
            vec![branch_row("b1", Some(52.52), Some(13.40))],
            workers,
            roles,
            vec![],
            vec![job_row("j1", true, true)],
            worker_roles,
            job_roles,
            job_items,
        );

        assert_eq!(input.workers.len(), 1);
        assert_eq!(input.workers[0].roles, vec!["electrician".to_string()]);
        assert_eq!(input.jobs.len(), 1);
        assert_eq!(input.jobs[0].required_roles["electrician"], 2);
        assert_eq!(input.jobs[0].required_roles["plumber"], 1);
        assert_eq!(input.jobs[0].required_items["i1"], 7);
    }

    #[test]
    fn test_build_planner_input_drops_incomplete_entities() {
        let input = build_planner_input(
            vec![
                branch_row("b1", Some(52.52), Some(13.40)),
                branch_row("b_nocoords", None, None),
            ],
            vec![],
            vec![],
            vec![StockRow {
                stock_id: "s_noitem".into(),
                quantity: 5,
                fk_branch_id: Some("b1".into()),
                fk_item_id: None,
            }],
            vec![
                job_row("j_ok", true, true),
                job_row("j_nocoords", false, true),
                job_row("j_notimes", true, false),
            ],
            vec![],
            vec![],
            vec![],
        );
        assert_eq!(input.branches.len(), 1);
        assert!(input.stocks.is_empty());
        assert_eq!(input.jobs.len(), 1);
        assert_eq!(input.jobs[0].job_id, "j_ok");
    }

    #[test]
    fn test_format_for_database() {
        let mut result = PlannerResult::empty(SolveStatus::Optimal);
        result.jobs.insert(
            "j1".into(),
            JobPlan {
                workers: vec!["w1".into(), "w2".into()],
                stocks: vec![StockAssignment {
                    stock_id: "s1".into(),
                    quantity: 5,
                }],
            },
        );
        result.jobs.insert("j2".into(), JobPlan::default());

        let (worker_rows, stock_rows) = format_for_database(&result);
        assert_eq!(
            worker_rows,
            vec![
                WorkerAssignmentRow {
                    worker_id: "w1".into(),
                    job_id: "j1".into()
                },
                WorkerAssignmentRow {
                    worker_id: "w2".into(),
                    job_id: "j1".into()
                },
            ]
        );
        assert_eq!(
            stock_rows,
            vec![StockAssignmentRow {
                job_id: "j1".into(),
                stock_id: "s1".into(),
                assigned_quantity: 5
            }]
        );
    }
}
