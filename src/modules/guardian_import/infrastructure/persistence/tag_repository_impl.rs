use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use tokio::task;

use crate::log_warn;
use crate::modules::guardian_import::domain::entities::Tag;
use crate::modules::guardian_import::domain::repositories::TagRepository;
use crate::modules::guardian_import::infrastructure::models::UserTagModel;
use crate::schema::user_tag;
use crate::shared::errors::AppResult;
use crate::shared::Database;

pub struct TagRepositoryImpl {
    db: Arc<Database>,
}

impl TagRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for TagRepositoryImpl {
    async fn find_by_partner_internal_ids(
        &self,
        organization_id: &str,
        partner_internal_ids: &[String],
    ) -> AppResult<Vec<Tag>> {
        if partner_internal_ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let partner_internal_ids = partner_internal_ids.to_vec();

        let models = task::spawn_blocking(move || -> AppResult<Vec<UserTagModel>> {
            let mut conn = db.get_connection()?;
            let rows = user_tag::table
                .filter(user_tag::organization_id.eq(&organization_id))
                .filter(user_tag::deleted_at.is_null())
                .filter(user_tag::user_tag_partner_id.eq_any(&partner_internal_ids))
                .select(UserTagModel::as_select())
                .load(&mut conn)?;
            Ok(rows)
        })
        .await??;

        // Unknown tag types cannot be attached, so they read as unresolved
        Ok(models
            .into_iter()
            .filter_map(|model| {
                let id = model.user_tag_id;
                match model.into_tag() {
                    Ok(tag) => Some(tag),
                    Err(e) => {
                        log_warn!("Skipping tag {}: {}", id, e);
                        None
                    }
                }
            })
            .collect())
    }
}
