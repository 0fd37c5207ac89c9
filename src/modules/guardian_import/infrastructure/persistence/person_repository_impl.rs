use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tokio::task;

use crate::modules::guardian_import::domain::repositories::PersonRepository;
use crate::schema::{user_phone_number, users};
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;
use crate::shared::Database;

define_sql_function!(fn lower(x: Text) -> Text);

pub struct PersonRepositoryImpl {
    db: Arc<Database>,
}

impl PersonRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn lowercased(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_lowercase()).collect()
}

#[async_trait]
impl PersonRepository for PersonRepositoryImpl {
    async fn find_existing_emails(
        &self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<String>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let emails = lowercased(emails);

        task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let mut conn = db.get_connection()?;
            let found = users::table
                .filter(users::organization_id.eq(&organization_id))
                .filter(users::deleted_at.is_null())
                .filter(lower(users::email).eq_any(&emails))
                .select(lower(users::email))
                .load::<String>(&mut conn)?;
            Ok(found)
        })
        .await?
    }

    async fn find_existing_phone_numbers(
        &self,
        organization_id: &str,
        phone_numbers: &[String],
    ) -> AppResult<Vec<String>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let phone_numbers = phone_numbers.to_vec();

        task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let timer = TimedOperation::new("find_existing_phone_numbers");
            let mut conn = db.get_connection()?;

            let mut found = user_phone_number::table
                .filter(user_phone_number::organization_id.eq(&organization_id))
                .filter(user_phone_number::deleted_at.is_null())
                .filter(user_phone_number::phone_number.eq_any(&phone_numbers))
                .select(user_phone_number::phone_number)
                .load::<String>(&mut conn)?;

            // Legacy single-column numbers live on the user row
            let legacy = users::table
                .filter(users::organization_id.eq(&organization_id))
                .filter(users::deleted_at.is_null())
                .filter(users::phone_number.eq_any(&phone_numbers))
                .select(users::phone_number)
                .load::<Option<String>>(&mut conn)?;
            found.extend(legacy.into_iter().flatten());

            found.sort();
            found.dedup();
            timer.finish();
            Ok(found)
        })
        .await?
    }

    async fn find_existing_external_ids(
        &self,
        organization_id: &str,
        external_user_ids: &[String],
    ) -> AppResult<Vec<String>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let external_user_ids = external_user_ids.to_vec();

        task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let mut conn = db.get_connection()?;
            let found = users::table
                .filter(users::organization_id.eq(&organization_id))
                .filter(users::deleted_at.is_null())
                .filter(users::user_external_id.eq_any(&external_user_ids))
                .select(users::user_external_id)
                .load::<Option<String>>(&mut conn)?;
            Ok(found.into_iter().flatten().collect())
        })
        .await?
    }

    async fn find_existing_usernames(
        &self,
        organization_id: &str,
        usernames: &[String],
    ) -> AppResult<Vec<String>> {
        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let usernames = lowercased(usernames);

        task::spawn_blocking(move || -> AppResult<Vec<String>> {
            let mut conn = db.get_connection()?;
            let found = users::table
                .filter(users::organization_id.eq(&organization_id))
                .filter(users::deleted_at.is_null())
                .filter(lower(users::username).eq_any(&usernames))
                .select(lower(users::username))
                .load::<String>(&mut conn)?;
            Ok(found)
        })
        .await?
    }
}
