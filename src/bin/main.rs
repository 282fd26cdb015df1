use dispatch::config::CONFIG;
use dispatch::database::DbClient;
use dispatch::service::PlannerService;
use dispatch::web_api_server::WebApiServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    info!(
        "Starting dispatch server (radius {}km, shift budget {}h)",
        CONFIG.reachability_radius_km, CONFIG.shift_budget_hours
    );

    let db = DbClient::new().await;
    let planner = PlannerService::new(&db);

    let server = WebApiServer::new(&db, &planner);
    server.run().await;
}
