use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use tokio::task;

use crate::modules::guardian_import::domain::entities::{ImportEventRecord, ImportEventStatus};
use crate::modules::guardian_import::domain::repositories::ImportEventRepository;
use crate::modules::guardian_import::infrastructure::models::ImportUserEventModel;
use crate::schema::import_user_event;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;
use crate::shared::Database;

pub struct ImportEventRepositoryImpl {
    db: Arc<Database>,
}

impl ImportEventRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImportEventRepository for ImportEventRepositoryImpl {
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ImportEventRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        let models = task::spawn_blocking(move || -> AppResult<Vec<ImportUserEventModel>> {
            let mut conn = db.get_connection()?;
            let rows = import_user_event::table
                .filter(import_user_event::import_user_event_id.eq_any(&ids))
                .order(import_user_event::import_user_event_id.asc())
                .select(ImportUserEventModel::as_select())
                .load(&mut conn)?;
            Ok(rows)
        })
        .await??;

        Ok(models.into_iter().map(ImportEventRecord::from).collect())
    }

    async fn mark_status(&self, ids: &[i64], status: ImportEventStatus) -> AppResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let db = Arc::clone(&self.db);
        let ids = ids.to_vec();

        let updated = task::spawn_blocking(move || -> AppResult<usize> {
            let mut conn = db.get_connection()?;
            let updated = diesel::update(
                import_user_event::table
                    .filter(import_user_event::import_user_event_id.eq_any(&ids)),
            )
            .set((
                import_user_event::status.eq(status.to_string()),
                import_user_event::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
            Ok(updated)
        })
        .await??;

        LogContext::db_operation("update", "import_user_event", None);
        Ok(updated)
    }
}
