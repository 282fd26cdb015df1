use chrono::{DateTime, Utc};
use diesel::{AsChangeset, Insertable, Queryable, QueryableByName, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::branch)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BranchRow {
    pub branch_id: String,
    pub branch_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::branch)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewBranch<'a> {
    pub branch_id: &'a str,
    pub branch_name: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub street: Option<&'a str>,
    pub house_number: Option<&'a str>,
    pub postal_code: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::worker)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkerRow {
    pub worker_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub fk_branch_id: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::worker)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewWorker<'a> {
    pub worker_id: &'a str,
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub fk_branch_id: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::role)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleRow {
    pub role_id: String,
    pub role_name: String,
    pub role_description: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::role)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewRole<'a> {
    pub role_id: &'a str,
    pub role_name: &'a str,
    pub role_description: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::item)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ItemRow {
    pub item_id: String,
    pub item_name: String,
    pub item_description: Option<String>,
    pub fk_branch_id: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::item)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewItem<'a> {
    pub item_id: &'a str,
    pub item_name: &'a str,
    pub item_description: Option<&'a str>,
    pub fk_branch_id: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::stock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StockRow {
    pub stock_id: String,
    pub quantity: i32,
    pub fk_branch_id: Option<String>,
    pub fk_item_id: Option<String>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::stock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewStock<'a> {
    pub stock_id: &'a str,
    pub quantity: i32,
    pub fk_branch_id: Option<&'a str>,
    pub fk_item_id: Option<&'a str>,
}

#[derive(Debug, Clone, Queryable, QueryableByName, Selectable, Serialize)]
#[diesel(table_name = crate::schema::job)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRow {
    pub job_id: String,
    pub job_name: Option<String>,
    pub job_description: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
    pub house_number: Option<String>,
    pub postal_code: Option<String>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = crate::schema::job)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewJob<'a> {
    pub job_id: &'a str,
    pub job_name: Option<&'a str>,
    pub job_description: Option<&'a str>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub country: Option<&'a str>,
    pub city: Option<&'a str>,
    pub street: Option<&'a str>,
    pub house_number: Option<&'a str>,
    pub postal_code: Option<&'a str>,
    pub start_datetime: Option<DateTime<Utc>>,
    pub end_datetime: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::worker__role)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkerRoleRow {
    pub worker_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::job__role)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobRoleRow {
    pub id: i64,
    pub job_id: String,
    pub role_id: String,
}

#[derive(Debug, Clone, Queryable, Selectable, Serialize)]
#[diesel(table_name = crate::schema::job__item)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobItemRow {
    pub job_id: String,
    pub item_id: String,
    pub required_quantity: i32,
}

// Planner output rows, bulk-inserted on every successful solve.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::worker__job)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WorkerAssignmentRow {
    pub worker_id: String,
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Insertable, Serialize, Deserialize)]
#[diesel(table_name = crate::schema::job__stock)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct StockAssignmentRow {
    pub job_id: String,
    pub stock_id: String,
    pub assigned_quantity: i32,
}
