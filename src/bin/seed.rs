use chrono::{Duration, Utc};
use dispatch::database::db_models::{
    NewBranch, NewItem, NewJob, NewRole, NewStock, NewWorker,
};
use dispatch::database::DbClient;
use dispatch::service::PlannerService;
use rand::Rng;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

fn id() -> String {
    Uuid::new_v4().to_string()
}

// Populates the database with a demo world around Berlin and runs one plan.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let db = DbClient::new().await;
    let mut rng = rand::rng();

    // branches
    let branches = [
        (
            "Berlin Central Warehouse",
            52.520008,
            13.404954,
            "Berlin",
            "Alexanderplatz",
            "1",
            "10178",
        ),
        (
            "Potsdam Distribution Center",
            52.390569,
            13.064473,
            "Potsdam",
            "Brandenburger Straße",
            "45",
            "14467",
        ),
        (
            "Brandenburg Logistics Hub",
            52.412067,
            12.546284,
            "Brandenburg an der Havel",
            "Hauptstraße",
            "12",
            "14770",
        ),
    ];
    let mut branch_ids = Vec::new();
    for (name, lat, lon, city, street, house_number, postal_code) in branches {
        let branch_id = id();
        db.insert_branch(&NewBranch {
            branch_id: &branch_id,
            branch_name: Some(name),
            latitude: Some(lat),
            longitude: Some(lon),
            country: Some("Germany"),
            city: Some(city),
            street: Some(street),
            house_number: Some(house_number),
            postal_code: Some(postal_code),
        })
        .await;
        branch_ids.push(branch_id);
    }

    // roles
    let roles = [
        ("Electrician", "Licensed electrician with certification for electrical installations"),
        ("Plumber", "Professional plumber with expertise in water and drainage systems"),
        ("Carpenter", "Skilled carpenter for woodwork, furniture assembly, and construction"),
        ("Painter", "Interior and exterior painting specialist with color expertise"),
        ("HVAC Technician", "Heating, ventilation, and air conditioning systems specialist"),
        ("General Laborer", "General construction and maintenance work, assists all trades"),
    ];
    let mut role_ids = Vec::new();
    for (name, description) in roles {
        let role_id = id();
        db.insert_role(&NewRole {
            role_id: &role_id,
            role_name: name,
            role_description: Some(description),
        })
        .await;
        role_ids.push(role_id);
    }

    // items, two per branch
    let items = [
        ("Power Drill", 0),
        ("Pipe Wrench Set", 0),
        ("Carpentry Tool Kit", 1),
        ("Paint Roller & Brush Set", 1),
        ("HVAC Diagnostic Tools", 2),
        ("Safety Equipment Pack", 2),
    ];
    let mut item_ids = Vec::new();
    for (name, branch_idx) in items {
        let item_id = id();
        db.insert_item(&NewItem {
            item_id: &item_id,
            item_name: name,
            item_description: None,
            fk_branch_id: Some(&branch_ids[branch_idx]),
        })
        .await;
        item_ids.push(item_id);
    }

    // every item is stocked at every branch in varying quantities
    for item_id in &item_ids {
        for branch_id in &branch_ids {
            let stock_id = id();
            db.insert_stock(&NewStock {
                stock_id: &stock_id,
                quantity: rng.random_range(5..=40),
                fk_branch_id: Some(branch_id),
                fk_item_id: Some(item_id),
            })
            .await;
        }
    }

    // workers: (first, last, phone, branch index, role indices)
    let workers = [
        ("Alice", "Johnson", "+49 30 12345678", 0, vec![0, 5]),
        ("Bob", "Smith", "+49 30 23456789", 0, vec![1, 5]),
        ("Charlie", "Brown", "+49 30 34567890", 0, vec![2]),
        ("Diana", "Prince", "+49 30 45678901", 0, vec![3, 5]),
        ("Evan", "Wright", "+49 30 56789012", 0, vec![0, 1]),
        ("Fiona", "Green", "+49 30 67890123", 0, vec![4]),
        ("Hannah", "Davis", "+49 331 12345678", 1, vec![0]),
        ("Ivan", "Garcia", "+49 331 23456789", 1, vec![1, 4]),
        ("Julia", "Martinez", "+49 331 34567890", 1, vec![3]),
        ("Kevin", "Rodriguez", "+49 331 45678901", 1, vec![2, 5]),
        ("Laura", "Wilson", "+49 331 56789012", 1, vec![0, 5]),
        ("Oliver", "Thomas", "+49 3381 12345678", 2, vec![2]),
        ("Paula", "Moore", "+49 3381 23456789", 2, vec![3, 5]),
        ("Quinn", "Jackson", "+49 3381 34567890", 2, vec![0, 4]),
        ("Rachel", "White", "+49 3381 45678901", 2, vec![1]),
    ];
    for (first_name, last_name, phone, branch_idx, role_indices) in workers {
        let worker_id = id();
        db.insert_worker(&NewWorker {
            worker_id: &worker_id,
            first_name: Some(first_name),
            last_name: Some(last_name),
            phone: Some(phone),
            fk_branch_id: Some(&branch_ids[branch_idx]),
        })
        .await;
        let links: Vec<String> = role_indices.iter().map(|&i| role_ids[i].clone()).collect();
        db.set_worker_roles(&worker_id, &links).await;
    }

    // jobs: (name, lat, lon, start offset h, duration h, role indices with
    // multiplicity, item requirements)
    let now = Utc::now();
    let jobs: Vec<(&str, f64, f64, i64, i64, Vec<usize>, Vec<(usize, i32)>)> = vec![
        (
            "Office rewiring",
            52.5100,
            13.3900,
            1,
            3,
            vec![0, 0, 5],
            vec![(0, 2), (5, 3)],
        ),
        (
            "Bathroom renovation",
            52.3900,
            13.0800,
            2,
            3,
            vec![1, 5],
            vec![(1, 1), (5, 2)],
        ),
        (
            "Roof truss repair",
            52.4800,
            13.2500,
            5,
            2,
            vec![2, 2],
            vec![(2, 2)],
        ),
        (
            "Facade repaint",
            52.5300,
            13.4200,
            1,
            2,
            vec![3],
            vec![(3, 4)],
        ),
        (
            "Server room cooling",
            52.4400,
            12.5700,
            6,
            4,
            vec![4, 5],
            vec![(4, 1), (5, 1)],
        ),
    ];
    for (name, lat, lon, start_h, duration_h, role_indices, item_reqs) in jobs {
        let job_id = id();
        let start = now + Duration::hours(start_h);
        db.insert_job(&NewJob {
            job_id: &job_id,
            job_name: Some(name),
            job_description: None,
            latitude: Some(lat),
            longitude: Some(lon),
            country: Some("Germany"),
            city: None,
            street: None,
            house_number: None,
            postal_code: None,
            start_datetime: Some(start),
            end_datetime: Some(start + Duration::hours(duration_h)),
        })
        .await;
        let role_links: Vec<String> =
            role_indices.iter().map(|&i| role_ids[i].clone()).collect();
        db.set_job_roles(&job_id, &role_links).await;
        let item_links: Vec<(String, i32)> = item_reqs
            .iter()
            .map(|&(i, qty)| (item_ids[i].clone(), qty))
            .collect();
        db.set_job_items(&job_id, &item_links).await;
    }

    println!("Seeded demo data, running initial plan...");
    let planner = PlannerService::new(&db);
    let result = planner
        .fetch_and_run_planner(30.0)
        .await
        .expect("Planner run failed");
    println!(
        "status: {}  jobs assigned: {}/{}",
        result.status,
        result.num_assigned_jobs(),
        result.jobs.len()
    );
}
