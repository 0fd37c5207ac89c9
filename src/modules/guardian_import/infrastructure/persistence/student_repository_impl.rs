use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tokio::task;

use crate::log_debug;
use crate::modules::guardian_import::domain::entities::Student;
use crate::modules::guardian_import::domain::repositories::StudentRepository;
use crate::modules::guardian_import::infrastructure::models::StudentModel;
use crate::schema::{students, users};
use crate::shared::errors::AppResult;
use crate::shared::Database;

define_sql_function!(fn lower(x: Text) -> Text);

pub struct StudentRepositoryImpl {
    db: Arc<Database>,
}

impl StudentRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl StudentRepository for StudentRepositoryImpl {
    async fn find_by_emails(
        &self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<Student>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let db = Arc::clone(&self.db);
        let organization_id = organization_id.to_string();
        let emails: Vec<String> = emails.iter().map(|e| e.to_lowercase()).collect();

        let models = task::spawn_blocking(move || -> AppResult<Vec<StudentModel>> {
            let mut conn = db.get_connection()?;
            let rows = students::table
                .inner_join(users::table)
                .filter(students::organization_id.eq(&organization_id))
                .filter(students::deleted_at.is_null())
                .filter(users::deleted_at.is_null())
                .filter(lower(users::email).eq_any(&emails))
                .select((students::student_id, users::email, users::name))
                .load::<StudentModel>(&mut conn)?;
            Ok(rows)
        })
        .await??;

        log_debug!("Resolved {} students by email", models.len());
        Ok(models.into_iter().map(Student::from).collect())
    }
}
