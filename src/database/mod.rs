pub mod db_models;

use crate::schema::*;
use diesel::ExpressionMethods as _;
use diesel::OptionalExtension as _;
use diesel::QueryDsl as _;
use diesel::QueryableByName;
use diesel::SelectableHelper as _;
use diesel::sql_types::Integer;
use diesel_async::pooled_connection::deadpool::Object;
use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncConnection as _;
use diesel_async::AsyncPgConnection;
use diesel_async::RunQueryDsl as _;
use diesel_async::SimpleAsyncConnection as _;
use scoped_futures::ScopedFutureExt as _;
use tracing::{debug, info};

use db_models::*;

#[derive(Clone)]
pub struct DbClient {
    db: Pool<AsyncPgConnection>,
}

impl DbClient {
    pub async fn new() -> DbClient {
        let database_url = std::env::var("POSTGRES_URI").expect("POSTGRES_URI must be set");
        let db = {
            let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
            Pool::builder(manager).max_size(5).build().unwrap()
        };
        // Check the connection
        {
            let mut conn = db.get().await.unwrap();
            #[derive(QueryableByName)]
            struct Ret {
                #[diesel(sql_type = Integer)]
                value: i32,
            }
            let result: Vec<Ret> = diesel::sql_query("SELECT 1 as value")
                .load(&mut conn)
                .await
                .unwrap();
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].value, 1);
            info!("Successfully connected to database");
        }
        let db = DbClient { db };
        db.create_tables().await;
        db
    }

    async fn create_tables(&self) {
        let sql = include_str!("../../planner_schema.sql");
        let mut conn = self.conn().await;
        conn.batch_execute(sql).await.expect("Schema setup failed");
    }

    pub async fn conn(&self) -> Object<AsyncPgConnection> {
        self.db
            .get()
            .await
            .expect("Timed out waiting for a database connection")
    }

    // === snapshot loads ===

    pub async fn get_branches(&self) -> Vec<BranchRow> {
        branch::table
            .select(BranchRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_workers(&self) -> Vec<WorkerRow> {
        worker::table
            .select(WorkerRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_roles(&self) -> Vec<RoleRow> {
        role::table
            .select(RoleRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_items(&self) -> Vec<ItemRow> {
        item::table
            .select(ItemRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_stocks(&self) -> Vec<StockRow> {
        stock::table
            .select(StockRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_jobs(&self) -> Vec<JobRow> {
        job::table
            .select(JobRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_worker_roles(&self) -> Vec<WorkerRoleRow> {
        worker__role::table
            .select(WorkerRoleRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_job_roles(&self) -> Vec<JobRoleRow> {
        job__role::table
            .select(JobRoleRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_job_items(&self) -> Vec<JobItemRow> {
        job__item::table
            .select(JobItemRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    // === single-entity reads ===

    pub async fn get_branch(&self, branch_id: &str) -> Option<BranchRow> {
        branch::table
            .filter(branch::branch_id.eq(branch_id))
            .select(BranchRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    pub async fn get_worker(&self, worker_id: &str) -> Option<WorkerRow> {
        worker::table
            .filter(worker::worker_id.eq(worker_id))
            .select(WorkerRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    pub async fn get_role(&self, role_id: &str) -> Option<RoleRow> {
        role::table
            .filter(role::role_id.eq(role_id))
            .select(RoleRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    pub async fn get_item(&self, item_id: &str) -> Option<ItemRow> {
        item::table
            .filter(item::item_id.eq(item_id))
            .select(ItemRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    pub async fn get_stock(&self, stock_id: &str) -> Option<StockRow> {
        stock::table
            .filter(stock::stock_id.eq(stock_id))
            .select(StockRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    pub async fn get_job(&self, job_id: &str) -> Option<JobRow> {
        job::table
            .filter(job::job_id.eq(job_id))
            .select(JobRow::as_select())
            .first(&mut self.conn().await)
            .await
            .optional()
            .expect("DB Query error")
    }

    // === CRUD used by the HTTP surface ===

    pub async fn insert_branch(&self, row: &NewBranch<'_>) {
        diesel::insert_into(branch::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_branch(&self, branch_id: &str, row: &NewBranch<'_>) -> bool {
        let updated = diesel::update(branch::table.filter(branch::branch_id.eq(branch_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_branch(&self, branch_id: &str) -> bool {
        let deleted = diesel::delete(branch::table.filter(branch::branch_id.eq(branch_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    pub async fn insert_worker(&self, row: &NewWorker<'_>) {
        diesel::insert_into(worker::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_worker(&self, worker_id: &str, row: &NewWorker<'_>) -> bool {
        let updated = diesel::update(worker::table.filter(worker::worker_id.eq(worker_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_worker(&self, worker_id: &str) -> bool {
        let deleted = diesel::delete(worker::table.filter(worker::worker_id.eq(worker_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    pub async fn insert_role(&self, row: &NewRole<'_>) {
        diesel::insert_into(role::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_role(&self, role_id: &str, row: &NewRole<'_>) -> bool {
        let updated = diesel::update(role::table.filter(role::role_id.eq(role_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_role(&self, role_id: &str) -> bool {
        let deleted = diesel::delete(role::table.filter(role::role_id.eq(role_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    pub async fn insert_item(&self, row: &NewItem<'_>) {
        diesel::insert_into(item::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_item(&self, item_id: &str, row: &NewItem<'_>) -> bool {
        let updated = diesel::update(item::table.filter(item::item_id.eq(item_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_item(&self, item_id: &str) -> bool {
        let deleted = diesel::delete(item::table.filter(item::item_id.eq(item_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    pub async fn insert_stock(&self, row: &NewStock<'_>) {
        diesel::insert_into(stock::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_stock(&self, stock_id: &str, row: &NewStock<'_>) -> bool {
        let updated = diesel::update(stock::table.filter(stock::stock_id.eq(stock_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_stock(&self, stock_id: &str) -> bool {
        let deleted = diesel::delete(stock::table.filter(stock::stock_id.eq(stock_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    pub async fn insert_job(&self, row: &NewJob<'_>) {
        diesel::insert_into(job::table)
            .values(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Insert error");
    }

    pub async fn update_job(&self, job_id: &str, row: &NewJob<'_>) -> bool {
        let updated = diesel::update(job::table.filter(job::job_id.eq(job_id)))
            .set(row)
            .execute(&mut self.conn().await)
            .await
            .expect("DB Update error");
        updated > 0
    }

    pub async fn delete_job(&self, job_id: &str) -> bool {
        let deleted = diesel::delete(job::table.filter(job::job_id.eq(job_id)))
            .execute(&mut self.conn().await)
            .await
            .expect("DB Delete error");
        deleted > 0
    }

    // === link tables ===

    pub async fn set_worker_roles(&self, worker_id: &str, role_ids: &[String]) {
        let mut conn = self.conn().await;
        diesel::delete(worker__role::table.filter(worker__role::worker_id.eq(worker_id)))
            .execute(&mut conn)
            .await
            .expect("DB Delete error");
        let inserts = role_ids
            .iter()
            .map(|role_id| {
                (
                    worker__role::worker_id.eq(worker_id),
                    worker__role::role_id.eq(role_id),
                )
            })
            .collect::<Vec<_>>();
        diesel::insert_into(worker__role::table)
            .values(&inserts)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .expect("DB Insert error");
    }

    // duplicate role ids are meaningful here: N rows = N workers of that role
    pub async fn set_job_roles(&self, job_id: &str, role_ids: &[String]) {
        let mut conn = self.conn().await;
        diesel::delete(job__role::table.filter(job__role::job_id.eq(job_id)))
            .execute(&mut conn)
            .await
            .expect("DB Delete error");
        let inserts = role_ids
            .iter()
            .map(|role_id| {
                (
                    job__role::job_id.eq(job_id),
                    job__role::role_id.eq(role_id),
                )
            })
            .collect::<Vec<_>>();
        diesel::insert_into(job__role::table)
            .values(&inserts)
            .execute(&mut conn)
            .await
            .expect("DB Insert error");
    }

    pub async fn set_job_items(&self, job_id: &str, items: &[(String, i32)]) {
        let mut conn = self.conn().await;
        diesel::delete(job__item::table.filter(job__item::job_id.eq(job_id)))
            .execute(&mut conn)
            .await
            .expect("DB Delete error");
        let inserts = items
            .iter()
            .map(|(item_id, required_quantity)| {
                (
                    job__item::job_id.eq(job_id),
                    job__item::item_id.eq(item_id),
                    job__item::required_quantity.eq(required_quantity),
                )
            })
            .collect::<Vec<_>>();
        diesel::insert_into(job__item::table)
            .values(&inserts)
            .execute(&mut conn)
            .await
            .expect("DB Insert error");
    }

    // === assignments ===

    pub async fn get_worker_assignments(&self) -> Vec<WorkerAssignmentRow> {
        worker__job::table
            .select(WorkerAssignmentRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_stock_assignments(&self) -> Vec<StockAssignmentRow> {
        job__stock::table
            .select(StockAssignmentRow::as_select())
            .load(&mut self.conn().await)
            .await
            .expect("DB Query error")
    }

    pub async fn get_jobs_for_worker(&self, worker_id: &str) -> Vec<JobRow> {
        let mut conn = self.conn().await;
        let job_ids: Vec<String> = worker__job::table
            .filter(worker__job::worker_id.eq(worker_id))
            .select(worker__job::job_id)
            .load(&mut conn)
            .await
            .expect("DB Query error");
        job::table
            .filter(job::job_id.eq_any(&job_ids))
            .select(JobRow::as_select())
            .load(&mut conn)
            .await
            .expect("DB Query error")
    }

    // Replace the assignments for the given jobs in one transaction; any
    // failure rolls the whole write-back back.
    pub async fn replace_assignments(
        &self,
        job_ids: &[String],
        worker_rows: &[WorkerAssignmentRow],
        stock_rows: &[StockAssignmentRow],
    ) -> Result<(), diesel::result::Error> {
        debug!(
            "Replacing assignments for {} jobs: {} worker rows, {} stock rows",
            job_ids.len(),
            worker_rows.len(),
            stock_rows.len()
        );
        let mut conn = self.conn().await;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(worker__job::table.filter(worker__job::job_id.eq_any(job_ids)))
                    .execute(conn)
                    .await?;
                diesel::delete(job__stock::table.filter(job__stock::job_id.eq_any(job_ids)))
                    .execute(conn)
                    .await?;
                for chunk in worker_rows.chunks(1000) {
                    diesel::insert_into(worker__job::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                for chunk in stock_rows.chunks(1000) {
                    diesel::insert_into(job__stock::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
    }
}
