use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{debug_handler, Json, Router};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::config::CONFIG;
use crate::database::db_models::{
    NewBranch, NewItem, NewJob, NewRole, NewStock, NewWorker,
};
use crate::database::DbClient;
use crate::planner::solve::compute_plan;
use crate::planner::{
    Branch, Job, PlannerConfig, PlannerInput, SolutionCache, Stock, Worker,
};
use crate::service::{format_for_database, PlannerService, StartedReplan};

pub struct WebApiServer {
    db: DbClient,
    planner: PlannerService,
}

struct AppState {
    db: DbClient,
    planner: PlannerService,
    http: reqwest::Client,
}

fn new_id(requested: Option<String>) -> String {
    requested.unwrap_or_else(|| Uuid::new_v4().to_string())
}

// === branches ===

#[derive(Debug, Deserialize)]
struct BranchPayload {
    branch_id: Option<String>,
    branch_name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    country: Option<String>,
    city: Option<String>,
    street: Option<String>,
    house_number: Option<String>,
    postal_code: Option<String>,
}

impl BranchPayload {
    fn as_row<'a>(&'a self, branch_id: &'a str) -> NewBranch<'a> {
        NewBranch {
            branch_id,
            branch_name: self.branch_name.as_deref(),
            latitude: self.latitude,
            longitude: self.longitude,
            country: self.country.as_deref(),
            city: self.city.as_deref(),
            street: self.street.as_deref(),
            house_number: self.house_number.as_deref(),
            postal_code: self.postal_code.as_deref(),
        }
    }
}

#[debug_handler]
async fn list_branches(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_branches().await))
}

#[debug_handler]
async fn get_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.db.get_branch(&branch_id).await {
        Some(row) => Ok(Json(json!(row))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_branch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BranchPayload>,
) -> Json<Value> {
    let branch_id = new_id(payload.branch_id.clone());
    state.db.insert_branch(&payload.as_row(&branch_id)).await;
    Json(json!(state.db.get_branch(&branch_id).await))
}

#[debug_handler]
async fn update_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_id): Path<String>,
    Json(payload): Json<BranchPayload>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.update_branch(&branch_id, &payload.as_row(&branch_id)).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(state.db.get_branch(&branch_id).await)))
}

#[debug_handler]
async fn delete_branch(
    State(state): State<Arc<AppState>>,
    Path(branch_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_branch(&branch_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Branch deleted successfully" })))
}

// === workers ===

#[derive(Debug, Deserialize)]
struct WorkerPayload {
    worker_id: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    fk_branch_id: Option<String>,
    #[serde(default)]
    role_ids: Vec<String>,
}

impl WorkerPayload {
    fn as_row<'a>(&'a self, worker_id: &'a str) -> NewWorker<'a> {
        NewWorker {
            worker_id,
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            phone: self.phone.as_deref(),
            fk_branch_id: self.fk_branch_id.as_deref(),
        }
    }
}

async fn worker_json(state: &AppState, worker_id: &str) -> Option<Value> {
    let row = state.db.get_worker(worker_id).await?;
    let role_ids: Vec<String> = state
        .db
        .get_worker_roles()
        .await
        .into_iter()
        .filter(|link| link.worker_id == worker_id)
        .map(|link| link.role_id)
        .collect();
    let mut value = json!(row);
    value["role_ids"] = json!(role_ids);
    Some(value)
}

#[debug_handler]
async fn list_workers(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_workers().await))
}

#[debug_handler]
async fn get_worker(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match worker_json(&state, &worker_id).await {
        Some(value) => Ok(Json(value)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_worker(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WorkerPayload>,
) -> Json<Value> {
    let worker_id = new_id(payload.worker_id.clone());
    state.db.insert_worker(&payload.as_row(&worker_id)).await;
    state.db.set_worker_roles(&worker_id, &payload.role_ids).await;
    Json(worker_json(&state, &worker_id).await.unwrap_or(Value::Null))
}

#[debug_handler]
async fn update_worker(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
    Json(payload): Json<WorkerPayload>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.update_worker(&worker_id, &payload.as_row(&worker_id)).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.db.set_worker_roles(&worker_id, &payload.role_ids).await;
    Ok(Json(worker_json(&state, &worker_id).await.unwrap_or(Value::Null)))
}

#[debug_handler]
async fn delete_worker(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_worker(&worker_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Worker deleted successfully" })))
}

#[debug_handler]
async fn worker_jobs(
    State(state): State<Arc<AppState>>,
    Path(worker_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if state.db.get_worker(&worker_id).await.is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(state.db.get_jobs_for_worker(&worker_id).await)))
}

// === roles ===

#[derive(Debug, Deserialize)]
struct RolePayload {
    role_id: Option<String>,
    role_name: String,
    role_description: Option<String>,
}

#[debug_handler]
async fn list_roles(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_roles().await))
}

#[debug_handler]
async fn get_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.db.get_role(&role_id).await {
        Some(row) => Ok(Json(json!(row))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_role(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RolePayload>,
) -> Json<Value> {
    let role_id = new_id(payload.role_id.clone());
    let row = NewRole {
        role_id: &role_id,
        role_name: &payload.role_name,
        role_description: payload.role_description.as_deref(),
    };
    state.db.insert_role(&row).await;
    Json(json!(state.db.get_role(&role_id).await))
}

#[debug_handler]
async fn update_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<String>,
    Json(payload): Json<RolePayload>,
) -> Result<Json<Value>, StatusCode> {
    let row = NewRole {
        role_id: &role_id,
        role_name: &payload.role_name,
        role_description: payload.role_description.as_deref(),
    };
    if !state.db.update_role(&role_id, &row).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(state.db.get_role(&role_id).await)))
}

#[debug_handler]
async fn delete_role(
    State(state): State<Arc<AppState>>,
    Path(role_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_role(&role_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Role deleted successfully" })))
}

// === items ===

#[derive(Debug, Deserialize)]
struct ItemPayload {
    item_id: Option<String>,
    item_name: String,
    item_description: Option<String>,
    fk_branch_id: Option<String>,
}

#[debug_handler]
async fn list_items(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_items().await))
}

#[debug_handler]
async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.db.get_item(&item_id).await {
        Some(row) => Ok(Json(json!(row))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ItemPayload>,
) -> Json<Value> {
    let item_id = new_id(payload.item_id.clone());
    let row = NewItem {
        item_id: &item_id,
        item_name: &payload.item_name,
        item_description: payload.item_description.as_deref(),
        fk_branch_id: payload.fk_branch_id.as_deref(),
    };
    state.db.insert_item(&row).await;
    Json(json!(state.db.get_item(&item_id).await))
}

#[debug_handler]
async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
    Json(payload): Json<ItemPayload>,
) -> Result<Json<Value>, StatusCode> {
    let row = NewItem {
        item_id: &item_id,
        item_name: &payload.item_name,
        item_description: payload.item_description.as_deref(),
        fk_branch_id: payload.fk_branch_id.as_deref(),
    };
    if !state.db.update_item(&item_id, &row).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(state.db.get_item(&item_id).await)))
}

#[debug_handler]
async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_item(&item_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Item deleted successfully" })))
}

// === stocks ===

#[derive(Debug, Deserialize)]
struct StockPayload {
    stock_id: Option<String>,
    quantity: i32,
    fk_branch_id: Option<String>,
    fk_item_id: Option<String>,
}

#[debug_handler]
async fn list_stocks(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_stocks().await))
}

#[debug_handler]
async fn get_stock(
    State(state): State<Arc<AppState>>,
    Path(stock_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match state.db.get_stock(&stock_id).await {
        Some(row) => Ok(Json(json!(row))),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_stock(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StockPayload>,
) -> Json<Value> {
    let stock_id = new_id(payload.stock_id.clone());
    let row = NewStock {
        stock_id: &stock_id,
        quantity: payload.quantity,
        fk_branch_id: payload.fk_branch_id.as_deref(),
        fk_item_id: payload.fk_item_id.as_deref(),
    };
    state.db.insert_stock(&row).await;
    Json(json!(state.db.get_stock(&stock_id).await))
}

#[debug_handler]
async fn update_stock(
    State(state): State<Arc<AppState>>,
    Path(stock_id): Path<String>,
    Json(payload): Json<StockPayload>,
) -> Result<Json<Value>, StatusCode> {
    let row = NewStock {
        stock_id: &stock_id,
        quantity: payload.quantity,
        fk_branch_id: payload.fk_branch_id.as_deref(),
        fk_item_id: payload.fk_item_id.as_deref(),
    };
    if !state.db.update_stock(&stock_id, &row).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!(state.db.get_stock(&stock_id).await)))
}

#[debug_handler]
async fn delete_stock(
    State(state): State<Arc<AppState>>,
    Path(stock_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_stock(&stock_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Stock deleted successfully" })))
}

// === jobs ===

#[derive(Debug, Deserialize)]
struct JobItemPayload {
    item_id: String,
    required_quantity: i32,
}

#[derive(Debug, Deserialize)]
struct JobPayload {
    job_id: Option<String>,
    job_name: Option<String>,
    job_description: Option<String>,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    city: Option<String>,
    street: Option<String>,
    house_number: Option<String>,
    postal_code: Option<String>,
    start_datetime: Option<DateTime<Utc>>,
    end_datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    role_ids: Vec<String>,
    #[serde(default)]
    items: Vec<JobItemPayload>,
}

impl JobPayload {
    fn as_row<'a>(&'a self, job_id: &'a str) -> NewJob<'a> {
        NewJob {
            job_id,
            job_name: self.job_name.as_deref(),
            job_description: self.job_description.as_deref(),
            latitude: Some(self.latitude),
            longitude: Some(self.longitude),
            country: self.country.as_deref(),
            city: self.city.as_deref(),
            street: self.street.as_deref(),
            house_number: self.house_number.as_deref(),
            postal_code: self.postal_code.as_deref(),
            start_datetime: self.start_datetime,
            end_datetime: self.end_datetime,
        }
    }

    fn item_links(&self) -> Vec<(String, i32)> {
        self.items
            .iter()
            .map(|link| (link.item_id.clone(), link.required_quantity))
            .collect()
    }
}

async fn job_json(state: &AppState, job_id: &str) -> Option<Value> {
    let row = state.db.get_job(job_id).await?;
    let role_ids: Vec<String> = state
        .db
        .get_job_roles()
        .await
        .into_iter()
        .filter(|link| link.job_id == job_id)
        .map(|link| link.role_id)
        .collect();
    let items: Vec<Value> = state
        .db
        .get_job_items()
        .await
        .into_iter()
        .filter(|link| link.job_id == job_id)
        .map(|link| json!({ "item_id": link.item_id, "required_quantity": link.required_quantity }))
        .collect();
    let mut value = json!(row);
    value["role_ids"] = json!(role_ids);
    value["items"] = json!(items);
    Some(value)
}

#[debug_handler]
async fn list_jobs(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!(state.db.get_jobs().await))
}

#[debug_handler]
async fn get_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    match job_json(&state, &job_id).await {
        Some(value) => Ok(Json(value)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

#[debug_handler]
async fn create_job(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JobPayload>,
) -> Json<Value> {
    let job_id = new_id(payload.job_id.clone());
    state.db.insert_job(&payload.as_row(&job_id)).await;
    state.db.set_job_roles(&job_id, &payload.role_ids).await;
    state.db.set_job_items(&job_id, &payload.item_links()).await;

    // re-plan assignments off the request path
    state.planner.fetch_and_run_planner_async(CONFIG.max_time_seconds);

    Json(job_json(&state, &job_id).await.unwrap_or(Value::Null))
}

#[debug_handler]
async fn update_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
    Json(payload): Json<JobPayload>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.update_job(&job_id, &payload.as_row(&job_id)).await {
        return Err(StatusCode::NOT_FOUND);
    }
    state.db.set_job_roles(&job_id, &payload.role_ids).await;
    state.db.set_job_items(&job_id, &payload.item_links()).await;

    state.planner.fetch_and_run_planner_async(CONFIG.max_time_seconds);

    Ok(Json(job_json(&state, &job_id).await.unwrap_or(Value::Null)))
}

#[debug_handler]
async fn delete_job(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    if !state.db.delete_job(&job_id).await {
        return Err(StatusCode::NOT_FOUND);
    }
    // re-plan for the remaining jobs
    state.planner.fetch_and_run_planner_async(CONFIG.max_time_seconds);
    Ok(Json(json!({ "message": "Job deleted successfully" })))
}

// === planner ===

#[derive(Debug, Default, Deserialize)]
struct RunPlannerPayload {
    max_time_seconds: Option<f64>,
}

#[debug_handler]
async fn run_planner(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RunPlannerPayload>>,
) -> Result<Json<Value>, StatusCode> {
    let max_time = payload
        .and_then(|Json(p)| p.max_time_seconds)
        .unwrap_or(30.0)
        .clamp(1.0, 30.0);
    match state.planner.fetch_and_run_planner(max_time).await {
        Ok(result) => Ok(Json(json!(result))),
        Err(e) => {
            error!("Planner run failed: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

#[debug_handler]
async fn run_planner_async(
    State(state): State<Arc<AppState>>,
    payload: Option<Json<RunPlannerPayload>>,
) -> Json<StartedReplan> {
    let max_time = payload
        .and_then(|Json(p)| p.max_time_seconds)
        .unwrap_or(30.0)
        .clamp(1.0, 30.0);
    Json(state.planner.fetch_and_run_planner_async(max_time))
}

fn sample_input() -> PlannerInput {
    let now = Utc::now();
    let role = |name: &str| name.to_string();
    PlannerInput {
        branches: vec![
            Branch {
                branch_id: "branch_1".into(),
                latitude: 52.5200,
                longitude: 13.4050,
            },
            Branch {
                branch_id: "branch_2".into(),
                latitude: 52.3759,
                longitude: 13.0622,
            },
            Branch {
                branch_id: "branch_3".into(),
                latitude: 52.4537,
                longitude: 12.5510,
            },
        ],
        workers: vec![
            Worker {
                worker_id: "worker_1".into(),
                branch_id: "branch_1".into(),
                roles: vec![role("electrician"), role("general")],
            },
            Worker {
                worker_id: "worker_2".into(),
                branch_id: "branch_1".into(),
                roles: vec![role("plumber"), role("general")],
            },
            Worker {
                worker_id: "worker_3".into(),
                branch_id: "branch_2".into(),
                roles: vec![role("electrician"), role("plumber")],
            },
            Worker {
                worker_id: "worker_4".into(),
                branch_id: "branch_2".into(),
                roles: vec![role("general")],
            },
            Worker {
                worker_id: "worker_5".into(),
                branch_id: "branch_3".into(),
                roles: vec![role("electrician")],
            },
        ],
        stocks: vec![
            Stock {
                stock_id: "stock_1".into(),
                item_id: "item_cables".into(),
                branch_id: "branch_1".into(),
                quantity: 50,
            },
            Stock {
                stock_id: "stock_2".into(),
                item_id: "item_pipes".into(),
                branch_id: "branch_1".into(),
                quantity: 30,
            },
            Stock {
                stock_id: "stock_3".into(),
                item_id: "item_cables".into(),
                branch_id: "branch_2".into(),
                quantity: 40,
            },
            Stock {
                stock_id: "stock_4".into(),
                item_id: "item_tools".into(),
                branch_id: "branch_2".into(),
                quantity: 20,
            },
            Stock {
                stock_id: "stock_5".into(),
                item_id: "item_pipes".into(),
                branch_id: "branch_3".into(),
                quantity: 25,
            },
        ],
        jobs: vec![
            Job {
                job_id: "job_1".into(),
                latitude: 52.5100,
                longitude: 13.3900,
                start_datetime: now + Duration::hours(1),
                end_datetime: now + Duration::hours(4),
                required_roles: [(role("electrician"), 1), (role("general"), 1)]
                    .into_iter()
                    .collect(),
                required_items: [("item_cables".to_string(), 10), ("item_tools".to_string(), 2)]
                    .into_iter()
                    .collect(),
            },
            Job {
                job_id: "job_2".into(),
                latitude: 52.3900,
                longitude: 13.0800,
                start_datetime: now + Duration::hours(2),
                end_datetime: now + Duration::hours(5),
                required_roles: [(role("plumber"), 1)].into_iter().collect(),
                required_items: [("item_pipes".to_string(), 8)].into_iter().collect(),
            },
            Job {
                job_id: "job_3".into(),
                latitude: 52.4800,
                longitude: 13.2500,
                start_datetime: now + Duration::hours(5),
                end_datetime: now + Duration::hours(7),
                required_roles: [(role("electrician"), 2)].into_iter().collect(),
                required_items: [("item_cables".to_string(), 15)].into_iter().collect(),
            },
            Job {
                job_id: "job_4".into(),
                latitude: 52.5300,
                longitude: 13.4200,
                start_datetime: now + Duration::hours(1),
                end_datetime: now + Duration::hours(3),
                required_roles: [(role("general"), 1)].into_iter().collect(),
                required_items: [("item_tools".to_string(), 1)].into_iter().collect(),
            },
        ],
    }
}

// Run the planner over built-in sample data. No database involved; uses a
// throwaway warm-start cache so the live one is not polluted.
#[debug_handler]
async fn planner_test() -> Json<Value> {
    let input = sample_input();
    let config = PlannerConfig::from_env().with_max_time(10.0);
    let result = tokio::task::spawn_blocking(move || {
        let mut cache = SolutionCache::default();
        compute_plan(&input, &config, &mut cache)
    })
    .await
    .expect("planner test task failed");

    let (worker_rows, stock_rows) = format_for_database(&result);
    let jobs_assigned = result.num_assigned_jobs();
    let num_worker_rows = worker_rows.len();
    let num_stock_rows = stock_rows.len();
    Json(json!({
        "planner_result": result,
        "database_format": {
            "worker_job_records": worker_rows,
            "job_stock_records": stock_rows,
        },
        "summary": {
            "jobs_assigned": jobs_assigned,
            "total_worker_assignments": num_worker_rows,
            "total_stock_assignments": num_stock_rows,
        },
    }))
}

// === ask ===

#[derive(Debug, Deserialize)]
struct AskRequest {
    question: String,
    #[serde(default, rename = "pageContext")]
    page_context: String,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
}

const ASK_SYSTEM_PROMPT: &str = "You are a helpful assistant inside a data analytics dashboard. \
    Always answer shortly (max 3 sentences) and be precise. \
    If the data does not contain the answer, say so explicitly. \
    Do not make up answers.";

#[debug_handler]
async fn ask(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, (StatusCode, Json<Value>)> {
    let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "detail": "GOOGLE_API_KEY not set in environment" })),
        )
    })?;

    let prompt = format!(
        "{}\n\nPage data:\n{}\n\nUser question: {}",
        ASK_SYSTEM_PROMPT, request.page_context, request.question
    );
    let url = format!(
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent?key={}",
        api_key
    );
    let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

    let response: Value = async {
        state
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
    .await
    .map_err(|e: reqwest::Error| {
        error!("Ask request failed: {}", e);
        (
            StatusCode::BAD_GATEWAY,
            Json(json!({ "detail": format!("Something went wrong: {}", e) })),
        )
    })?;

    let answer = response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .unwrap_or("No response from model.")
        .to_string();
    Ok(Json(AskResponse { answer }))
}

impl WebApiServer {
    pub fn new(db: &DbClient, planner: &PlannerService) -> Self {
        Self {
            db: db.clone(),
            planner: planner.clone(),
        }
    }

    pub async fn run(&self) {
        let user_agent = format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        let http = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap();
        let state = Arc::new(AppState {
            db: self.db.clone(),
            planner: self.planner.clone(),
            http,
        });

        let app = Router::new()
            .route("/branches", get(list_branches).post(create_branch))
            .route(
                "/branches/{branch_id}",
                get(get_branch).put(update_branch).delete(delete_branch),
            )
            .route("/workers", get(list_workers).post(create_worker))
            .route(
                "/workers/{worker_id}",
                get(get_worker).put(update_worker).delete(delete_worker),
            )
            .route("/worker/{worker_id}/jobs", get(worker_jobs))
            .route("/roles", get(list_roles).post(create_role))
            .route(
                "/roles/{role_id}",
                get(get_role).put(update_role).delete(delete_role),
            )
            .route("/items", get(list_items).post(create_item))
            .route(
                "/items/{item_id}",
                get(get_item).put(update_item).delete(delete_item),
            )
            .route("/stocks", get(list_stocks).post(create_stock))
            .route(
                "/stocks/{stock_id}",
                get(get_stock).put(update_stock).delete(delete_stock),
            )
            .route("/jobs", get(list_jobs).post(create_job))
            .route(
                "/jobs/{job_id}",
                get(get_job).put(update_job).delete(delete_job),
            )
            .route("/planner/run", post(run_planner))
            .route("/planner/run_async", post(run_planner_async))
            .route("/planner/test", get(planner_test))
            .route("/ask", post(ask))
            .layer(CorsLayer::permissive())
            .with_state(state);

        let port: u16 = match std::env::var("HTTP_PORT") {
            Ok(val) if !val.is_empty() => val.parse().expect("Invalid HTTP_PORT"),
            _ => 8080,
        };
        info!("Starting server on port {}", port);
        let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
            .await
            .expect("Failed to bind server port");
        axum::serve(listener, app).await.unwrap();
    }
}
