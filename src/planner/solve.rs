use std::collections::BTreeMap;
use std::time::Instant;

use good_lp::solvers::highs::highs;
use good_lp::{
    constraint, variable, variables, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable, WithInitialSolution,
};
use tracing::{debug, info, warn};

use crate::planner::preprocess::SolveContext;
use crate::planner::{
    JobPlan, PlannerConfig, PlannerInput, PlannerResult, SolutionCache, SolveStatus,
    StockAssignment,
};

struct DecisionVariables {
    // x[w,j] = 1 if worker w is assigned to job j; only feasible pairs exist
    worker_job: BTreeMap<(usize, usize), Variable>,
    // q[s,j] = quantity of stock s committed to job j; only relevant pairs exist
    stock_job: BTreeMap<(usize, usize), Variable>,
    // sat[j] = 1 if job j is fully covered
    job_satisfied: Vec<Variable>,
}

fn create_decision_variables(
    vars: &mut ProblemVariables,
    ctx: &SolveContext,
    num_jobs: usize,
) -> DecisionVariables {
    let worker_job: BTreeMap<(usize, usize), Variable> = ctx
        .feasible_worker_jobs
        .iter()
        .map(|&(w, j)| {
            let var = vars.add(variable().binary().name(format!("worker_{w}_job_{j}")));
            ((w, j), var)
        })
        .collect();

    let stock_job: BTreeMap<(usize, usize), Variable> = ctx
        .relevant_stock_jobs
        .iter()
        .map(|(&(s, j), &max_qty)| {
            let var = vars.add(
                variable()
                    .integer()
                    .min(0)
                    .max(max_qty as f64)
                    .name(format!("stock_{s}_job_{j}_qty")),
            );
            ((s, j), var)
        })
        .collect();

    let job_satisfied: Vec<Variable> = (0..num_jobs)
        .map(|j| vars.add(variable().binary().name(format!("job_{j}_satisfied"))))
        .collect();

    DecisionVariables {
        worker_job,
        stock_job,
        job_satisfied,
    }
}

// minimize  -W * sum(sat) + sum(floor(dist/bucket) * q) + sum(floor(dist/bucket) * x)
// W dominates any reachable travel sum, so covering one more job always wins.
fn build_objective(
    ctx: &SolveContext,
    config: &PlannerConfig,
    dv: &DecisionVariables,
) -> Expression {
    let coverage: Expression = dv
        .job_satisfied
        .iter()
        .map(|&sat| sat * -(config.coverage_weight as f64))
        .sum();

    let bucket = config.cost_bucket_km as f64;
    let stock_travel: Expression = dv
        .stock_job
        .iter()
        .filter_map(|(&(s, j), &var)| {
            let cost = (ctx.sj_dist[&(s, j)] / bucket).floor();
            (cost > 0.0).then(|| var * cost)
        })
        .sum();
    let worker_travel: Expression = dv
        .worker_job
        .iter()
        .filter_map(|(&(w, j), &var)| {
            let cost = (ctx.wj_dist[&(w, j)] / bucket).floor();
            (cost > 0.0).then(|| var * cost)
        })
        .sum();

    coverage + stock_travel + worker_travel
}

fn add_constraints<P: SolverModel>(
    mut problem: P,
    input: &PlannerInput,
    ctx: &SolveContext,
    dv: &DecisionVariables,
) -> P {
    // A worker does at most one of any two time-overlapping jobs.
    for (w_idx, _) in input.workers.iter().enumerate() {
        for &(j1, j2) in &ctx.overlapping_jobs {
            let (Some(&x1), Some(&x2)) = (
                dv.worker_job.get(&(w_idx, j1)),
                dv.worker_job.get(&(w_idx, j2)),
            ) else {
                continue;
            };
            problem = problem.with(constraint!(x1 + x2 <= 1));
        }
    }

    // Stock commitments never exceed the held quantity.
    for (s_idx, stock) in input.stocks.iter().enumerate() {
        let allocations: Vec<Variable> = (0..input.jobs.len())
            .filter_map(|j_idx| dv.stock_job.get(&(s_idx, j_idx)).copied())
            .collect();
        if allocations.is_empty() {
            continue;
        }
        let total: Expression = allocations.into_iter().sum();
        problem = problem.with(constraint!(total <= stock.quantity as f64));
    }

    // Coverage is soft: requirements are only enforced when sat[j] = 1.
    for (j_idx, job) in input.jobs.iter().enumerate() {
        let sat = dv.job_satisfied[j_idx];

        for (role, &required_count) in &job.required_roles {
            let covering: Vec<Variable> = (0..input.workers.len())
                .filter(|&w_idx| ctx.worker_roles[w_idx].contains(role))
                .filter_map(|w_idx| dv.worker_job.get(&(w_idx, j_idx)).copied())
                .collect();
            if covering.is_empty() {
                // nobody reachable carries the role
                problem = problem.with(constraint!(sat == 0));
                continue;
            }
            let assigned: Expression = covering.into_iter().sum();
            problem = problem.with(constraint!(assigned >= sat * (required_count as f64)));
        }

        for (item, &required_qty) in &job.required_items {
            let supplying: Vec<Variable> = (0..input.stocks.len())
                .filter(|&s_idx| &ctx.stock_items[s_idx] == item)
                .filter_map(|s_idx| dv.stock_job.get(&(s_idx, j_idx)).copied())
                .collect();
            if supplying.is_empty() {
                problem = problem.with(constraint!(sat == 0));
                continue;
            }
            let committed: Expression = supplying.into_iter().sum();
            problem = problem.with(constraint!(committed >= sat * (required_qty as f64)));
        }
    }

    problem
}

// Compute worker and stock assignments for every job in the snapshot.
//
// The warm-start cache is read for hints before the solve and rebuilt from
// the solution afterwards; on INFEASIBLE/UNKNOWN it is left untouched.
pub fn compute_plan(
    input: &PlannerInput,
    config: &PlannerConfig,
    cache: &mut SolutionCache,
) -> PlannerResult {
    if input.jobs.is_empty() {
        return PlannerResult::empty(SolveStatus::NoJobs);
    }

    let ctx = SolveContext::build(input, config);
    info!(
        jobs = input.jobs.len(),
        workers = input.workers.len(),
        stocks = input.stocks.len(),
        feasible_worker_pairs = ctx.feasible_worker_jobs.len(),
        relevant_stock_pairs = ctx.relevant_stock_jobs.len(),
        "starting solve"
    );

    let mut vars = variables!();
    let dv = create_decision_variables(&mut vars, &ctx, input.jobs.len());
    let objective = build_objective(&ctx, config, &dv);

    let mut problem = vars.minimise(objective).using(highs);
    problem.set_verbose(config.log_search_progress);
    let mut problem = problem
        .set_time_limit(config.max_time_seconds)
        .set_threads(config.num_search_workers);
    problem = add_constraints(problem, input, &ctx, &dv);

    if !cache.is_empty() {
        let worker_hints = dv.worker_job.iter().map(|(&(w, j), &var)| {
            let hint =
                cache.worker_hint(&input.workers[w].worker_id, &input.jobs[j].job_id);
            (var, hint as f64)
        });
        let stock_hints = dv.stock_job.iter().map(|(&(s, j), &var)| {
            let hint = cache.stock_hint(&input.stocks[s].stock_id, &input.jobs[j].job_id);
            (var, hint as f64)
        });
        let hints: Vec<(Variable, f64)> = worker_hints.chain(stock_hints).collect();
        debug!(hints = hints.len(), "installing warm start hints");
        problem = problem.with_initial_solution(hints);
    }

    let started = Instant::now();
    let solved = problem.solve();
    let solve_time = started.elapsed().as_secs_f64();

    let solution = match solved {
        Ok(solution) => solution,
        Err(ResolutionError::Infeasible) => {
            warn!("solver reported infeasible model");
            let mut result = PlannerResult::empty(SolveStatus::Infeasible);
            result.solve_time = solve_time;
            return result;
        }
        Err(e) => {
            warn!("solver returned no solution: {}", e);
            let mut result = PlannerResult::empty(SolveStatus::Unknown);
            result.solve_time = solve_time;
            return result;
        }
    };

    // HiGHS returns before the limit exactly when optimality is proven.
    let status = if solve_time >= config.max_time_seconds {
        SolveStatus::Feasible
    } else {
        SolveStatus::Optimal
    };

    cache.clear();
    let mut jobs = BTreeMap::new();
    for (j_idx, job) in input.jobs.iter().enumerate() {
        let mut plan = JobPlan::default();
        for (w_idx, worker) in input.workers.iter().enumerate() {
            let Some(&var) = dv.worker_job.get(&(w_idx, j_idx)) else {
                continue;
            };
            if solution.value(var) > 0.5 {
                plan.workers.push(worker.worker_id.clone());
                cache.record_worker(&worker.worker_id, &job.job_id, 1);
            }
        }
        for (s_idx, stock) in input.stocks.iter().enumerate() {
            let Some(&var) = dv.stock_job.get(&(s_idx, j_idx)) else {
                continue;
            };
            let qty = solution.value(var).round() as i64;
            if qty > 0 {
                plan.stocks.push(StockAssignment {
                    stock_id: stock.stock_id.clone(),
                    quantity: qty,
                });
                cache.record_stock(&stock.stock_id, &job.job_id, qty);
            }
        }
        jobs.insert(job.job_id.clone(), plan);
    }

    let result = PlannerResult {
        jobs,
        status,
        solve_time,
    };
    info!(
        status = %result.status,
        assigned = result.num_assigned_jobs(),
        total = input.jobs.len(),
        solve_time = format!("{:.3}s", solve_time),
        "solve complete"
    );
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::planner::{Branch, Job, Stock, Worker};
    use crate::util::haversine_distance;
    use chrono::{DateTime, TimeZone, Utc};
    use maplit::hashmap;
    use std::collections::HashMap;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap()
    }

    fn hours(h: i64) -> chrono::Duration {
        chrono::Duration::hours(h)
    }

    fn branch(id: &str, lat: f64, lon: f64) -> Branch {
        Branch {
            branch_id: id.into(),
            latitude: lat,
            longitude: lon,
        }
    }

    fn worker(id: &str, branch_id: &str, roles: &[&str]) -> Worker {
        Worker {
            worker_id: id.into(),
            branch_id: branch_id.into(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn stock(id: &str, item: &str, branch_id: &str, quantity: i64) -> Stock {
        Stock {
            stock_id: id.into(),
            item_id: item.into(),
            branch_id: branch_id.into(),
            quantity,
        }
    }

    fn job(
        id: &str,
        lat: f64,
        lon: f64,
        start_offset_h: i64,
        end_offset_h: i64,
        roles: HashMap<String, i64>,
        items: HashMap<String, i64>,
    ) -> Job {
        Job {
            job_id: id.into(),
            latitude: lat,
            longitude: lon,
            start_datetime: base() + hours(start_offset_h),
            end_datetime: base() + hours(end_offset_h),
            required_roles: roles,
            required_items: items,
        }
    }

    fn test_config() -> PlannerConfig {
        PlannerConfig {
            num_search_workers: 1,
            ..PlannerConfig::default()
        }
    }

    fn solve(input: &PlannerInput) -> PlannerResult {
        let mut cache = SolutionCache::default();
        compute_plan(input, &test_config(), &mut cache)
    }

    // Invariants any returned assignment set has to satisfy.
    fn check_invariants(input: &PlannerInput, config: &PlannerConfig, result: &PlannerResult) {
        let branch_coords: HashMap<&str, (f64, f64)> = input
            .branches
            .iter()
            .map(|b| (b.branch_id.as_str(), (b.latitude, b.longitude)))
            .collect();
        let workers: HashMap<&str, &Worker> = input
            .workers
            .iter()
            .map(|w| (w.worker_id.as_str(), w))
            .collect();
        let stocks: HashMap<&str, &Stock> = input
            .stocks
            .iter()
            .map(|s| (s.stock_id.as_str(), s))
            .collect();
        let jobs: HashMap<&str, &Job> =
            input.jobs.iter().map(|j| (j.job_id.as_str(), j)).collect();

        let mut worker_intervals: HashMap<&str, Vec<(DateTime<Utc>, DateTime<Utc>)>> =
            HashMap::new();
        let mut stock_totals: HashMap<&str, i64> = HashMap::new();

        for (job_id, plan) in &result.jobs {
            let job = jobs[job_id.as_str()];

            for worker_id in &plan.workers {
                let worker = workers[worker_id.as_str()];
                let (lat, lon) = branch_coords[worker.branch_id.as_str()];
                let dist = haversine_distance(lat, lon, job.latitude, job.longitude);
                // invariant 4: reachability and shift fit
                assert!(dist <= config.reachability_radius_km);
                assert!(crate::util::fits_in_shift(
                    dist,
                    job.start_datetime,
                    job.end_datetime,
                    config.avg_speed_kmh,
                    config.shift_budget_hours,
                ));
                worker_intervals
                    .entry(worker_id.as_str())
                    .or_default()
                    .push((job.start_datetime, job.end_datetime));
            }

            for assignment in &plan.stocks {
                let stock = stocks[assignment.stock_id.as_str()];
                // invariant 3: item match and per-pair cap
                let required = job.required_items[&stock.item_id];
                assert!(assignment.quantity >= 1);
                assert!(assignment.quantity <= required.min(stock.quantity));
                *stock_totals.entry(assignment.stock_id.as_str()).or_default() +=
                    assignment.quantity;
            }
        }

        // invariant 1: no overlapping jobs per worker
        for intervals in worker_intervals.values() {
            for a in 0..intervals.len() {
                for b in (a + 1)..intervals.len() {
                    assert!(!crate::util::intervals_overlap(
                        intervals[a].0,
                        intervals[a].1,
                        intervals[b].0,
                        intervals[b].1,
                    ));
                }
            }
        }

        // invariant 2: stock capacity
        for (stock_id, total) in stock_totals {
            assert!(total <= stocks[stock_id].quantity);
        }
    }

    // A job counts as satisfied when every role count and item quantity is met.
    fn is_satisfied(input: &PlannerInput, job_id: &str, plan: &JobPlan) -> bool {
        let job = input.jobs.iter().find(|j| j.job_id == job_id).unwrap();
        let assigned_workers: Vec<&Worker> = plan
            .workers
            .iter()
            .map(|id| input.workers.iter().find(|w| &w.worker_id == id).unwrap())
            .collect();
        let roles_ok = job.required_roles.iter().all(|(role, &count)| {
            let have = assigned_workers
                .iter()
                .filter(|w| w.roles.iter().any(|r| r == role))
                .count() as i64;
            have >= count
        });
        let items_ok = job.required_items.iter().all(|(item, &qty)| {
            let have: i64 = plan
                .stocks
                .iter()
                .filter(|a| {
                    input
                        .stocks
                        .iter()
                        .find(|s| s.stock_id == a.stock_id)
                        .unwrap()
                        .item_id
                        == *item
                })
                .map(|a| a.quantity)
                .sum();
            have >= qty
        });
        roles_ok && items_ok
    }

    fn objective_value(input: &PlannerInput, config: &PlannerConfig, result: &PlannerResult) -> i64 {
        let branch_coords: HashMap<&str, (f64, f64)> = input
            .branches
            .iter()
            .map(|b| (b.branch_id.as_str(), (b.latitude, b.longitude)))
            .collect();
        let mut total = 0i64;
        for (job_id, plan) in &result.jobs {
            let job = input.jobs.iter().find(|j| &j.job_id == job_id).unwrap();
            if is_satisfied(input, job_id, plan) {
                total -= config.coverage_weight;
            }
            for worker_id in &plan.workers {
                let worker = input
                    .workers
                    .iter()
                    .find(|w| &w.worker_id == worker_id)
                    .unwrap();
                let (lat, lon) = branch_coords[worker.branch_id.as_str()];
                let dist = haversine_distance(lat, lon, job.latitude, job.longitude);
                total += (dist / config.cost_bucket_km as f64).floor() as i64;
            }
            for assignment in &plan.stocks {
                let stock = input
                    .stocks
                    .iter()
                    .find(|s| s.stock_id == assignment.stock_id)
                    .unwrap();
                let (lat, lon) = branch_coords[stock.branch_id.as_str()];
                let dist = haversine_distance(lat, lon, job.latitude, job.longitude);
                total +=
                    (dist / config.cost_bucket_km as f64).floor() as i64 * assignment.quantity;
            }
        }
        total
    }

    #[test]
    fn test_no_jobs() {
        let result = solve(&PlannerInput::default());
        assert_eq!(result.status, SolveStatus::NoJobs);
        assert!(result.jobs.is_empty());
    }

    // Single job, single qualified worker, sufficient stock.
    #[test]
    fn test_single_job_full_coverage() {
        let input = PlannerInput {
            branches: vec![branch("b1", 52.5200, 13.4050)],
            workers: vec![worker("w1", "b1", &["elec"])],
            stocks: vec![stock("s1", "cable", "b1", 10)],
            jobs: vec![job(
                "j1",
                52.5100,
                13.3900,
                1,
                4,
                hashmap! { "elec".into() => 1 },
                hashmap! { "cable".into() => 5 },
            )],
        };
        let result = solve(&input);
        assert_eq!(result.status, SolveStatus::Optimal);
        let plan = &result.jobs["j1"];
        assert_eq!(plan.workers, vec!["w1".to_string()]);
        assert_eq!(
            plan.stocks,
            vec![StockAssignment {
                stock_id: "s1".into(),
                quantity: 5
            }]
        );
        check_invariants(&input, &test_config(), &result);
    }

    // Two overlapping jobs, one worker: the nearer job wins.
    #[test]
    fn test_overlapping_jobs_one_worker() {
        let input = PlannerInput {
            branches: vec![branch("b1", 52.5200, 13.4050)],
            workers: vec![worker("w1", "b1", &["elec"])],
            stocks: vec![],
            jobs: vec![
                job(
                    "near",
                    52.5100,
                    13.3900,
                    1,
                    4,
                    hashmap! { "elec".into() => 1 },
                    HashMap::new(),
                ),
                job(
                    "far",
                    52.6500,
                    13.7500,
                    2,
                    5,
                    hashmap! { "elec".into() => 1 },
                    HashMap::new(),
                ),
            ],
        };
        let result = solve(&input);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert_eq!(result.jobs["near"].workers, vec!["w1".to_string()]);
        assert!(result.jobs["far"].workers.is_empty());
        check_invariants(&input, &test_config(), &result);
    }

    // Two jobs want 10 pipe each, only 15 held: one job is covered in full,
    // the other gets nothing.
    #[test]
    fn test_insufficient_stock_partial_coverage() {
        let input = PlannerInput {
            branches: vec![
                branch("depot", 52.3906, 13.0645),
                branch("site", 52.5100, 13.3900),
            ],
            workers: vec![],
            stocks: vec![stock("s1", "pipe", "depot", 15)],
            jobs: vec![
                job(
                    "close",
                    52.5100,
                    13.3900,
                    1,
                    3,
                    HashMap::new(),
                    hashmap! { "pipe".into() => 10 },
                ),
                job(
                    "distant",
                    52.5500,
                    13.5200,
                    4,
                    6,
                    HashMap::new(),
                    hashmap! { "pipe".into() => 10 },
                ),
            ],
        };
        let result = solve(&input);
        assert_eq!(result.status, SolveStatus::Optimal);

        let close = &result.jobs["close"];
        let distant = &result.jobs["distant"];
        assert_eq!(close.stocks.iter().map(|a| a.quantity).sum::<i64>(), 10);
        assert!(is_satisfied(&input, "close", close));
        assert!(distant.stocks.is_empty());
        assert!(!is_satisfied(&input, "distant", distant));

        let total: i64 = result
            .jobs
            .values()
            .flat_map(|p| p.stocks.iter().map(|a| a.quantity))
            .sum();
        assert!(total <= 15);
        check_invariants(&input, &test_config(), &result);
    }

    // A worker beyond the reachability radius is never chosen.
    #[test]
    fn test_reachability_prunes_far_worker() {
        let input = PlannerInput {
            branches: vec![
                branch("potsdam", 52.3906, 13.0645),
                branch("munich", 48.1372, 11.5755),
            ],
            workers: vec![
                worker("w_far", "munich", &["elec"]),
                worker("w_near", "potsdam", &["elec"]),
            ],
            stocks: vec![],
            jobs: vec![job(
                "j1",
                52.5100,
                13.3900,
                1,
                4,
                hashmap! { "elec".into() => 1 },
                HashMap::new(),
            )],
        };
        let result = solve(&input);
        assert_eq!(result.jobs["j1"].workers, vec!["w_near".to_string()]);
        check_invariants(&input, &test_config(), &result);
    }

    // Role multiplicity: need two electricians, three available, the two
    // lowest-travel-cost ones are picked.
    #[test]
    fn test_role_multiplicity_picks_cheapest() {
        let input = PlannerInput {
            branches: vec![
                branch("berlin", 52.5200, 13.4050),
                branch("potsdam", 52.3906, 13.0645),
                branch("brandenburg", 52.4537, 12.5510),
            ],
            workers: vec![
                worker("w_berlin", "berlin", &["elec"]),
                worker("w_potsdam", "potsdam", &["elec"]),
                worker("w_brandenburg", "brandenburg", &["elec"]),
            ],
            stocks: vec![],
            jobs: vec![job(
                "j1",
                52.5100,
                13.3900,
                1,
                4,
                hashmap! { "elec".into() => 2 },
                HashMap::new(),
            )],
        };
        let result = solve(&input);
        assert_eq!(
            result.jobs["j1"].workers,
            vec!["w_berlin".to_string(), "w_potsdam".to_string()]
        );
        check_invariants(&input, &test_config(), &result);
    }

    fn mixed_input() -> PlannerInput {
        PlannerInput {
            branches: vec![
                branch("b1", 52.5200, 13.4050),
                branch("b2", 52.3906, 13.0645),
                branch("b3", 52.4537, 12.5510),
            ],
            workers: vec![
                worker("w1", "b1", &["electrician", "general"]),
                worker("w2", "b1", &["plumber", "general"]),
                worker("w3", "b2", &["electrician", "plumber"]),
                worker("w4", "b2", &["general"]),
                worker("w5", "b3", &["electrician"]),
            ],
            stocks: vec![
                stock("s1", "cables", "b1", 50),
                stock("s2", "pipes", "b1", 30),
                stock("s3", "cables", "b2", 40),
                stock("s4", "tools", "b2", 20),
                stock("s5", "pipes", "b3", 25),
            ],
            jobs: vec![
                job(
                    "j1",
                    52.5100,
                    13.3900,
                    1,
                    4,
                    hashmap! { "electrician".into() => 1, "general".into() => 1 },
                    hashmap! { "cables".into() => 10, "tools".into() => 2 },
                ),
                job(
                    "j2",
                    52.3900,
                    13.0800,
                    2,
                    5,
                    hashmap! { "plumber".into() => 1 },
                    hashmap! { "pipes".into() => 8 },
                ),
                job(
                    "j3",
                    52.4800,
                    13.2500,
                    5,
                    7,
                    hashmap! { "electrician".into() => 2 },
                    hashmap! { "cables".into() => 15 },
                ),
                job(
                    "j4",
                    52.5300,
                    13.4200,
                    1,
                    3,
                    hashmap! { "general".into() => 1 },
                    hashmap! { "tools".into() => 1 },
                ),
            ],
        }
    }

    #[test]
    fn test_mixed_scenario_invariants() {
        let input = mixed_input();
        let result = solve(&input);
        assert_eq!(result.status, SolveStatus::Optimal);
        // plenty of workers and stock around: everything should be covered
        for (job_id, plan) in &result.jobs {
            assert!(is_satisfied(&input, job_id, plan), "{} uncovered", job_id);
        }
        check_invariants(&input, &test_config(), &result);
    }

    #[test]
    fn test_cold_solves_are_deterministic() {
        let input = mixed_input();
        let a = solve(&input);
        let b = solve(&input);
        assert_eq!(a.status, b.status);
        assert_eq!(a.jobs, b.jobs);
    }

    // Re-solving with the previous solution cached must not get worse.
    #[test]
    fn test_warm_start_equivalence() {
        let input = mixed_input();
        let config = test_config();
        let mut cache = SolutionCache::default();

        let cold = compute_plan(&input, &config, &mut cache);
        assert!(!cache.is_empty());
        let warm = compute_plan(&input, &config, &mut cache);

        assert_eq!(cold.status, SolveStatus::Optimal);
        assert_eq!(warm.status, SolveStatus::Optimal);
        assert_eq!(
            objective_value(&input, &config, &cold),
            objective_value(&input, &config, &warm)
        );
    }

    // A required role nobody holds keeps the job unsatisfied but the rest of
    // the plan intact.
    #[test]
    fn test_uncoverable_role_leaves_job_unsatisfied() {
        let mut input = mixed_input();
        input.jobs[0]
            .required_roles
            .insert("crane_operator".into(), 1);
        let result = solve(&input);
        assert_eq!(result.status, SolveStatus::Optimal);
        assert!(!is_satisfied(&input, "j1", &result.jobs["j1"]));
        // the other jobs are unaffected
        assert!(is_satisfied(&input, "j2", &result.jobs["j2"]));
        check_invariants(&input, &test_config(), &result);
    }
}
