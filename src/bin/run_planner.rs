use dispatch::database::DbClient;
use dispatch::service::PlannerService;
use tracing_subscriber::EnvFilter;

// One-shot replan against the configured database.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db = DbClient::new().await;
    let planner = PlannerService::new(&db);

    let result = planner
        .fetch_and_run_planner(30.0)
        .await
        .expect("Planner run failed");

    println!(
        "status: {}  solve_time: {:.3}s  jobs assigned: {}/{}",
        result.status,
        result.solve_time,
        result.num_assigned_jobs(),
        result.jobs.len()
    );
    for (job_id, plan) in &result.jobs {
        println!("  {}", job_id);
        for worker_id in &plan.workers {
            println!("    worker {}", worker_id);
        }
        for assignment in &plan.stocks {
            println!("    stock {} x{}", assignment.stock_id, assignment.quantity);
        }
    }
}
