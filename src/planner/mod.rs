pub mod preprocess;
pub mod solve;

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::CONFIG;

// Depot location. Workers travel from their branch; stock ships from its branch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub branch_id: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,
    pub branch_id: String,
    // role names this worker is qualified for
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub stock_id: String,
    pub item_id: String,
    pub branch_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    // role name -> required worker count
    pub required_roles: HashMap<String, i64>,
    // item id -> required quantity
    pub required_items: HashMap<String, i64>,
}

// Closed-world snapshot handed to the solver. Cross-references that don't
// resolve inside the snapshot cause the referring entity to be dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlannerInput {
    pub jobs: Vec<Job>,
    pub workers: Vec<Worker>,
    pub stocks: Vec<Stock>,
    pub branches: Vec<Branch>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,
    Feasible,
    Infeasible,
    Unknown,
    NoJobs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAssignment {
    pub stock_id: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    pub workers: Vec<String>,
    pub stocks: Vec<StockAssignment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerResult {
    pub jobs: BTreeMap<String, JobPlan>,
    pub status: SolveStatus,
    // solver wall time in seconds
    pub solve_time: f64,
}

impl PlannerResult {
    pub fn empty(status: SolveStatus) -> Self {
        PlannerResult {
            jobs: BTreeMap::new(),
            status,
            solve_time: 0.0,
        }
    }

    pub fn num_assigned_jobs(&self) -> usize {
        self.jobs.values().filter(|j| !j.workers.is_empty()).count()
    }
}

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub max_time_seconds: f64,
    pub num_search_workers: u32,
    pub reachability_radius_km: f64,
    pub avg_speed_kmh: f64,
    pub shift_budget_hours: f64,
    pub coverage_weight: i64,
    pub cost_bucket_km: i64,
    pub log_search_progress: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            max_time_seconds: 5.0,
            num_search_workers: 4,
            reachability_radius_km: 200.0,
            avg_speed_kmh: 50.0,
            shift_budget_hours: 10.0,
            coverage_weight: 10_000,
            cost_bucket_km: 10,
            log_search_progress: false,
        }
    }
}

impl PlannerConfig {
    pub fn from_env() -> Self {
        PlannerConfig {
            max_time_seconds: CONFIG.max_time_seconds,
            num_search_workers: CONFIG.num_search_workers,
            reachability_radius_km: CONFIG.reachability_radius_km,
            avg_speed_kmh: CONFIG.avg_speed_kmh,
            shift_budget_hours: CONFIG.shift_budget_hours,
            coverage_weight: CONFIG.coverage_weight,
            cost_bucket_km: CONFIG.cost_bucket_km,
            log_search_progress: CONFIG.log_search_progress,
        }
    }

    pub fn with_max_time(mut self, max_time_seconds: f64) -> Self {
        self.max_time_seconds = max_time_seconds;
        self
    }
}

// Previous solution, keyed by entity/job id pairs. Installed as solver hints
// on the next run and rebuilt wholesale after every successful solve, so it
// never outgrows the last solution.
#[derive(Debug, Clone, Default)]
pub struct SolutionCache {
    worker_hints: HashMap<(String, String), i64>,
    stock_hints: HashMap<(String, String), i64>,
}

impl SolutionCache {
    pub fn is_empty(&self) -> bool {
        self.worker_hints.is_empty() && self.stock_hints.is_empty()
    }

    pub fn worker_hint(&self, worker_id: &str, job_id: &str) -> i64 {
        self.worker_hints
            .get(&(worker_id.to_string(), job_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn stock_hint(&self, stock_id: &str, job_id: &str) -> i64 {
        self.stock_hints
            .get(&(stock_id.to_string(), job_id.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn record_worker(&mut self, worker_id: &str, job_id: &str, value: i64) {
        self.worker_hints
            .insert((worker_id.to_string(), job_id.to_string()), value);
    }

    pub fn record_stock(&mut self, stock_id: &str, job_id: &str, value: i64) {
        self.stock_hints
            .insert((stock_id.to_string(), job_id.to_string()), value);
    }

    pub fn clear(&mut self) {
        self.worker_hints.clear();
        self.stock_hints.clear();
    }
}
