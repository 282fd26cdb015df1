use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::warn;

use crate::planner::{PlannerConfig, PlannerInput};
use crate::util::{fits_in_shift, haversine_distance, intervals_overlap};

// Index-resolved view of a snapshot. String cross-references are resolved
// once; the model builder only ever touches dense indices and the pruned
// pair sets below. Workers and stocks whose branch is unknown are excluded
// from the solve entirely.
pub struct SolveContext {
    // worker index -> qualified role names (empty for excluded workers)
    pub worker_roles: Vec<HashSet<String>>,
    // stock index -> item id ("" for excluded stocks)
    pub stock_items: Vec<String>,
    // distances in km, present only for workers/stocks with a known branch
    pub wj_dist: HashMap<(usize, usize), f64>,
    pub sj_dist: HashMap<(usize, usize), f64>,
    // (w, j) pairs within the reachability radius that fit the shift budget
    pub feasible_worker_jobs: Vec<(usize, usize)>,
    // (s, j) -> per-pair assignment upper bound
    pub relevant_stock_jobs: BTreeMap<(usize, usize), i64>,
    // unordered job index pairs (j1 < j2) with overlapping intervals
    pub overlapping_jobs: Vec<(usize, usize)>,
}

impl SolveContext {
    pub fn build(input: &PlannerInput, config: &PlannerConfig) -> SolveContext {
        let branch_map: HashMap<&str, (f64, f64)> = input
            .branches
            .iter()
            .map(|b| (b.branch_id.as_str(), (b.latitude, b.longitude)))
            .collect();

        let mut worker_roles = vec![HashSet::new(); input.workers.len()];
        let mut wj_dist = HashMap::new();
        let mut feasible_worker_jobs = Vec::new();
        for (w_idx, worker) in input.workers.iter().enumerate() {
            let Some(&(lat, lon)) = branch_map.get(worker.branch_id.as_str()) else {
                warn!(
                    "Worker {} references unknown branch {}, excluded from solve",
                    worker.worker_id, worker.branch_id
                );
                continue;
            };
            worker_roles[w_idx] = worker.roles.iter().cloned().collect();
            for (j_idx, job) in input.jobs.iter().enumerate() {
                let dist = haversine_distance(lat, lon, job.latitude, job.longitude);
                wj_dist.insert((w_idx, j_idx), dist);
                if dist <= config.reachability_radius_km
                    && fits_in_shift(
                        dist,
                        job.start_datetime,
                        job.end_datetime,
                        config.avg_speed_kmh,
                        config.shift_budget_hours,
                    )
                {
                    feasible_worker_jobs.push((w_idx, j_idx));
                }
            }
        }

        let mut stock_items = vec![String::new(); input.stocks.len()];
        let mut sj_dist = HashMap::new();
        let mut relevant_stock_jobs = BTreeMap::new();
        for (s_idx, stock) in input.stocks.iter().enumerate() {
            let Some(&(lat, lon)) = branch_map.get(stock.branch_id.as_str()) else {
                warn!(
                    "Stock {} references unknown branch {}, excluded from solve",
                    stock.stock_id, stock.branch_id
                );
                continue;
            };
            stock_items[s_idx] = stock.item_id.clone();
            for (j_idx, job) in input.jobs.iter().enumerate() {
                let dist = haversine_distance(lat, lon, job.latitude, job.longitude);
                sj_dist.insert((s_idx, j_idx), dist);
                let needed = job
                    .required_items
                    .get(&stock.item_id)
                    .copied()
                    .unwrap_or(0);
                if needed > 0 && stock.quantity > 0 {
                    relevant_stock_jobs
                        .insert((s_idx, j_idx), needed.min(stock.quantity));
                }
            }
        }

        let mut overlapping_jobs = Vec::new();
        for j1 in 0..input.jobs.len() {
            for j2 in (j1 + 1)..input.jobs.len() {
                if intervals_overlap(
                    input.jobs[j1].start_datetime,
                    input.jobs[j1].end_datetime,
                    input.jobs[j2].start_datetime,
                    input.jobs[j2].end_datetime,
                ) {
                    overlapping_jobs.push((j1, j2));
                }
            }
        }

        SolveContext {
            worker_roles,
            stock_items,
            wj_dist,
            sj_dist,
            feasible_worker_jobs,
            relevant_stock_jobs,
            overlapping_jobs,
        }
    }
}
