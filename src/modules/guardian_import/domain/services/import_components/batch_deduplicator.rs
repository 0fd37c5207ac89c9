use std::collections::HashSet;

use crate::modules::guardian_import::domain::entities::{GuardianCandidate, GuardianColumn};
use crate::modules::guardian_import::domain::value_objects::{ImportError, ImportErrorCode};

/// Detects keys repeated across rows of the same upload.
///
/// The first occurrence of a key wins; every later row carrying it gets a
/// `DuplicateInBatch` error. Key spaces are independent, so one row may be
/// reported once per key space.
pub struct BatchDeduplicator;

impl BatchDeduplicator {
    pub fn check(candidates: &[GuardianCandidate], username_login_enabled: bool) -> Vec<ImportError> {
        let mut emails = HashSet::new();
        let mut phone_numbers: HashSet<&str> = HashSet::new();
        let mut external_ids: HashSet<&str> = HashSet::new();
        let mut usernames: HashSet<&str> = HashSet::new();
        let mut errors = Vec::new();

        for candidate in candidates {
            let duplicate = |column| {
                ImportError::new(candidate.row_index, column, ImportErrorCode::DuplicateInBatch)
            };
            let person = &candidate.person;

            if !emails.insert(person.email_key()) {
                errors.push(duplicate(GuardianColumn::Email));
            }

            let row_phones = candidate.phone_keys();
            if let Some((column, _)) = row_phones
                .iter()
                .find(|(_, number)| phone_numbers.contains(number))
            {
                errors.push(duplicate(*column));
            }
            phone_numbers.extend(row_phones.iter().map(|(_, number)| *number));

            if let Some(external_id) = person.external_user_id.as_str() {
                if !external_ids.insert(external_id) {
                    errors.push(duplicate(GuardianColumn::ExternalUserId));
                }
            }

            if username_login_enabled && !usernames.insert(person.username.as_str()) {
                errors.push(duplicate(GuardianColumn::Username));
            }
        }

        errors
    }
}
