use async_trait::async_trait;

use crate::modules::guardian_import::domain::entities::Student;
use crate::shared::errors::AppResult;

#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Batch lookup by email, case-insensitive. Unknown emails are simply missing
    /// from the result; order is not guaranteed.
    async fn find_by_emails(&self, organization_id: &str, emails: &[String])
        -> AppResult<Vec<Student>>;
}
