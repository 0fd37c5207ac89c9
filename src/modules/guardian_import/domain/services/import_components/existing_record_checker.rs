use std::collections::HashSet;
use std::sync::Arc;

use crate::modules::guardian_import::domain::entities::{GuardianCandidate, GuardianColumn};
use crate::modules::guardian_import::domain::repositories::PersonRepository;
use crate::modules::guardian_import::domain::value_objects::{
    ImportContext, ImportError, ImportErrorCode,
};
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::TimedOperation;

/// Checks the batch against people already stored for the organization
pub struct ExistingRecordChecker {
    person_repository: Arc<dyn PersonRepository>,
}

impl ExistingRecordChecker {
    pub fn new(person_repository: Arc<dyn PersonRepository>) -> Self {
        Self { person_repository }
    }

    /// Email, phone and external id collisions are reported for every row.
    /// Usernames are checked only when those are clean, and the first
    /// collision ends the check.
    pub async fn check(
        &self,
        candidates: &[GuardianCandidate],
        context: &ImportContext,
    ) -> AppResult<Vec<ImportError>> {
        let timer = TimedOperation::new("existing_record_check");
        let organization_id = context.organization_id.as_str();

        let emails: Vec<String> = unique(candidates.iter().map(|c| c.person.email_key()));
        let phone_numbers: Vec<String> = unique(
            candidates
                .iter()
                .flat_map(|c| c.phone_keys())
                .map(|(_, number)| number.to_string()),
        );
        let external_ids: Vec<String> = unique(
            candidates
                .iter()
                .filter_map(|c| c.person.external_user_id.as_str())
                .map(str::to_string),
        );

        let taken_emails = lowercase_set(if emails.is_empty() {
            Vec::new()
        } else {
            self.person_repository
                .find_existing_emails(organization_id, &emails)
                .await?
        });
        let taken_phones: HashSet<String> = if phone_numbers.is_empty() {
            HashSet::new()
        } else {
            self.person_repository
                .find_existing_phone_numbers(organization_id, &phone_numbers)
                .await?
                .into_iter()
                .collect()
        };
        let taken_external_ids: HashSet<String> = if external_ids.is_empty() {
            HashSet::new()
        } else {
            self.person_repository
                .find_existing_external_ids(organization_id, &external_ids)
                .await?
                .into_iter()
                .collect()
        };

        let mut errors = Vec::new();
        for candidate in candidates {
            let registered = |column| {
                ImportError::new(candidate.row_index, column, ImportErrorCode::AlreadyRegistered)
            };

            if taken_emails.contains(&candidate.person.email_key()) {
                errors.push(registered(GuardianColumn::Email));
            }
            if let Some((column, _)) = candidate
                .phone_keys()
                .into_iter()
                .find(|(_, number)| taken_phones.contains(*number))
            {
                errors.push(registered(column));
            }
            if let Some(external_id) = candidate.person.external_user_id.as_str() {
                if taken_external_ids.contains(external_id) {
                    errors.push(registered(GuardianColumn::ExternalUserId));
                }
            }
        }

        if errors.is_empty() && context.username_login_enabled {
            if let Some(error) = self.first_taken_username(candidates, organization_id).await? {
                errors.push(error);
            }
        }

        timer.finish_with_info(&format!("{} rows, {} conflicts", candidates.len(), errors.len()));
        Ok(errors)
    }

    async fn first_taken_username(
        &self,
        candidates: &[GuardianCandidate],
        organization_id: &str,
    ) -> AppResult<Option<ImportError>> {
        let usernames: Vec<String> = unique(candidates.iter().map(|c| c.person.username.to_lowercase()));
        if usernames.is_empty() {
            return Ok(None);
        }

        let taken = lowercase_set(
            self.person_repository
                .find_existing_usernames(organization_id, &usernames)
                .await?,
        );

        Ok(candidates
            .iter()
            .find(|c| taken.contains(&c.person.username.to_lowercase()))
            .map(|c| {
                ImportError::new(
                    c.row_index,
                    GuardianColumn::Username,
                    ImportErrorCode::AlreadyRegistered,
                )
            }))
    }
}

/// Deduplicate keys while keeping first-seen order
fn unique(keys: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    keys.filter(|key| seen.insert(key.clone())).collect()
}

fn lowercase_set(values: Vec<String>) -> HashSet<String> {
    values.into_iter().map(|v| v.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_keeps_first_seen_order() {
        let keys = vec!["b", "a", "b", "c", "a"].into_iter().map(String::from);
        assert_eq!(unique(keys), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_lowercase_set() {
        let set = lowercase_set(vec!["A@X.com".to_string()]);
        assert!(set.contains("a@x.com"));
    }
}
