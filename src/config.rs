use lazy_static::lazy_static;
use regex::Regex;

pub struct Config {
    pub job_id_filter: Regex,
    pub max_time_seconds: f64,
    pub num_search_workers: u32,
    pub reachability_radius_km: f64,
    pub avg_speed_kmh: f64,
    pub shift_budget_hours: f64,
    pub coverage_weight: i64,
    pub cost_bucket_km: i64,
    pub log_search_progress: bool,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(val) if !val.is_empty() => val
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for {}", key)),
        _ => default,
    }
}

lazy_static! {
    pub static ref CONFIG: Config = {
        let job_id_filter = match std::env::var("JOB_ID_FILTER") {
            Ok(val) if val.is_empty() => None,
            Ok(val) => Some(val),
            Err(_) => None,
        };
        let job_id_filter = match job_id_filter {
            Some(val) => Regex::new(&val).expect("Invalid JOB_ID_FILTER regex"),
            None => Regex::new(".*").expect("Invalid default regex"),
        };
        Config {
            job_id_filter,
            max_time_seconds: env_parse("PLANNER_MAX_TIME_SECONDS", 5.0),
            num_search_workers: env_parse("PLANNER_NUM_WORKERS", 4),
            reachability_radius_km: env_parse("REACHABILITY_RADIUS_KM", 200.0),
            avg_speed_kmh: env_parse("AVG_SPEED_KMH", 50.0),
            shift_budget_hours: env_parse("SHIFT_BUDGET_HOURS", 10.0),
            coverage_weight: env_parse("COVERAGE_WEIGHT", 10_000),
            cost_bucket_km: env_parse("COST_BUCKET_KM", 10),
            log_search_progress: env_parse("PLANNER_LOG_SEARCH", false),
        }
    };
}
