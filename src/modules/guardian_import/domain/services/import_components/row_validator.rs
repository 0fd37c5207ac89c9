use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use uuid::Uuid;

use crate::log_debug;
use crate::modules::guardian_import::domain::entities::person::{
    combine_full_name, combine_phonetic_name, split_full_name,
};
use crate::modules::guardian_import::domain::entities::{
    FieldCell, GuardianCandidate, GuardianColumn, ImportRow, PersonRecord, PhoneNumberKind,
    PhoneNumberRecord, StudentLink, Tag,
};
use crate::modules::guardian_import::domain::repositories::{StudentRepository, TagRepository};
use crate::modules::guardian_import::domain::value_objects::{
    FamilyRelationship, ImportContext, ImportError, ImportErrorCode,
};
use crate::shared::errors::AppResult;
use crate::shared::utils::Validator;

/// Separator for multi-valued cells (`student_email`, `relationship`, `parent_tag`)
pub const MULTI_VALUE_SEPARATOR: char = ';';

#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(GuardianCandidate),
    Rejected(ImportError),
}

/// Turns one raw row into a guardian candidate, or the first error found in it.
///
/// Lookup failures are infrastructure errors and abort the whole import.
pub struct RowValidator {
    student_repository: Arc<dyn StudentRepository>,
    tag_repository: Arc<dyn TagRepository>,
    login_email_domain: String,
}

impl RowValidator {
    pub fn new(
        student_repository: Arc<dyn StudentRepository>,
        tag_repository: Arc<dyn TagRepository>,
        login_email_domain: &str,
    ) -> Self {
        Self {
            student_repository,
            tag_repository,
            login_email_domain: login_email_domain.to_string(),
        }
    }

    /// Validate every row, collecting one error per failing row
    pub async fn validate_batch(
        &self,
        rows: &[ImportRow],
        context: &ImportContext,
    ) -> AppResult<(Vec<GuardianCandidate>, Vec<ImportError>)> {
        let mut candidates = Vec::with_capacity(rows.len());
        let mut errors = Vec::new();

        for row in rows {
            match self.validate(row, context).await? {
                RowOutcome::Accepted(candidate) => candidates.push(candidate),
                RowOutcome::Rejected(error) => {
                    log_debug!("Rejected {}", error);
                    errors.push(error);
                }
            }
        }

        Ok((candidates, errors))
    }

    pub async fn validate(&self, row: &ImportRow, context: &ImportContext) -> AppResult<RowOutcome> {
        let reject = |column: GuardianColumn, code: ImportErrorCode| -> AppResult<RowOutcome> {
            Ok(RowOutcome::Rejected(ImportError::new(row.index, column, code)))
        };

        // Mandatory fields
        let (last_name, first_name) =
            match (row.get(GuardianColumn::LastName), row.get(GuardianColumn::FirstName)) {
                (FieldCell::Value(last), FieldCell::Value(first)) => (last.clone(), first.clone()),
                (_, first) => match row.get(GuardianColumn::Name).as_str() {
                    Some(full_name) => split_full_name(full_name),
                    None if !first.is_present() => {
                        return reject(GuardianColumn::FirstName, ImportErrorCode::MissingMandatoryField)
                    }
                    None => {
                        return reject(GuardianColumn::LastName, ImportErrorCode::MissingMandatoryField)
                    }
                },
            };

        let Some(email) = row.get(GuardianColumn::Email).as_str() else {
            return reject(GuardianColumn::Email, ImportErrorCode::MissingMandatoryField);
        };

        if !Validator::is_valid_email(email) {
            return reject(GuardianColumn::Email, ImportErrorCode::InvalidFormat);
        }

        // Student / relationship pairing
        let student_links = match self.resolve_student_links(row, context).await? {
            Ok(links) => links,
            Err(error) => return Ok(RowOutcome::Rejected(error)),
        };

        let phone_number = row.get(GuardianColumn::PhoneNumber);
        if let Some(number) = phone_number.as_str() {
            if !Validator::is_valid_phone_for_country(number, &context.country_code) {
                return reject(GuardianColumn::PhoneNumber, ImportErrorCode::InvalidFormat);
            }
        }

        let tags = match self.resolve_tags(row, context).await? {
            Some(tags) => tags,
            None => return reject(GuardianColumn::ParentTag, ImportErrorCode::InvalidFormat),
        };

        let id = Uuid::new_v4();
        let (username, login_email) = if context.username_login_enabled {
            let Some(username) = row.get(GuardianColumn::Username).as_str() else {
                return reject(GuardianColumn::Username, ImportErrorCode::MissingMandatoryField);
            };
            if !Validator::is_valid_username(username) {
                return reject(GuardianColumn::Username, ImportErrorCode::InvalidFormat);
            }
            (
                username.to_lowercase(),
                format!("{}@{}", id, self.login_email_domain),
            )
        } else {
            (email.to_lowercase(), email.to_string())
        };

        let last_name_phonetic = row.get(GuardianColumn::LastNamePhonetic).clone();
        let first_name_phonetic = row.get(GuardianColumn::FirstNamePhonetic).clone();
        let full_name_phonetic = combine_phonetic_name(&last_name_phonetic, &first_name_phonetic);

        let person = PersonRecord {
            id,
            organization_id: context.organization_id.clone(),
            email: email.to_string(),
            username,
            login_email,
            external_user_id: row.get(GuardianColumn::ExternalUserId).clone(),
            full_name: combine_full_name(&last_name, &first_name),
            first_name,
            last_name,
            first_name_phonetic,
            last_name_phonetic,
            full_name_phonetic,
            phone_number: phone_number.clone(),
            country: context.country_code.clone(),
            remarks: row.get(GuardianColumn::Remarks).clone(),
        };

        // Contact numbers
        let primary = row.get(GuardianColumn::PrimaryPhoneNumber).as_str();
        let secondary = row.get(GuardianColumn::SecondaryPhoneNumber).as_str();

        if primary.is_some_and(|number| !Validator::is_valid_phone_number(number)) {
            return reject(GuardianColumn::PrimaryPhoneNumber, ImportErrorCode::InvalidFormat);
        }
        if secondary.is_some_and(|number| !Validator::is_valid_phone_number(number)) {
            return reject(GuardianColumn::SecondaryPhoneNumber, ImportErrorCode::InvalidFormat);
        }
        if primary.is_some() && primary == secondary {
            return reject(GuardianColumn::PrimaryPhoneNumber, ImportErrorCode::DuplicateInBatch);
        }

        let phone_numbers = [
            (primary, PhoneNumberKind::Primary),
            (secondary, PhoneNumberKind::Secondary),
        ]
        .into_iter()
        .filter_map(|(number, kind)| {
            number.map(|n| PhoneNumberRecord::new(id, n, kind, &context.organization_id))
        })
        .collect();

        Ok(RowOutcome::Accepted(GuardianCandidate {
            row_index: row.index,
            person,
            phone_numbers,
            student_links,
            tags,
        }))
    }

    /// `Ok(Err(_))` is a row error, `Err(_)` a lookup failure
    async fn resolve_student_links(
        &self,
        row: &ImportRow,
        context: &ImportContext,
    ) -> AppResult<Result<Vec<StudentLink>, ImportError>> {
        let student_cell = row.get(GuardianColumn::StudentEmail);
        let relationship_cell = row.get(GuardianColumn::Relationship);
        let row_error = |column: GuardianColumn,
                         code: ImportErrorCode|
         -> AppResult<Result<Vec<StudentLink>, ImportError>> {
            Ok(Err(ImportError::new(row.index, column, code)))
        };

        match (student_cell.is_present(), relationship_cell.is_present()) {
            (false, false) => return Ok(Ok(Vec::new())),
            (true, true) => {}
            _ => {
                return row_error(
                    GuardianColumn::StudentEmail,
                    ImportErrorCode::RelationshipMismatch,
                )
            }
        }

        let student_emails = student_cell.split(MULTI_VALUE_SEPARATOR);
        let relationship_tokens = relationship_cell.split(MULTI_VALUE_SEPARATOR);
        if student_emails.len() != relationship_tokens.len() {
            return row_error(
                GuardianColumn::StudentEmail,
                ImportErrorCode::RelationshipMismatch,
            );
        }

        let keys: Vec<String> = student_emails.iter().map(|e| e.to_lowercase()).collect();
        let unique_keys: HashSet<&String> = keys.iter().collect();
        if unique_keys.len() != keys.len() || keys.iter().any(|k| k.is_empty()) {
            return row_error(GuardianColumn::StudentEmail, ImportErrorCode::InvalidFormat);
        }

        let students = self
            .student_repository
            .find_by_emails(&context.organization_id, &keys)
            .await?;
        let by_email: HashMap<String, _> = students
            .into_iter()
            .map(|s| (s.email.to_lowercase(), s))
            .collect();

        let mut resolved = Vec::with_capacity(keys.len());
        for key in &keys {
            match by_email.get(key) {
                Some(student) => resolved.push(student),
                None => {
                    return row_error(GuardianColumn::StudentEmail, ImportErrorCode::InvalidFormat)
                }
            }
        }

        let mut links = Vec::with_capacity(resolved.len());
        for (student, token) in resolved.into_iter().zip(&relationship_tokens) {
            let Some(relationship) = FamilyRelationship::parse_token(token) else {
                return row_error(GuardianColumn::Relationship, ImportErrorCode::InvalidFormat);
            };
            links.push(StudentLink {
                student_id: student.id,
                student_name: student.full_name.clone(),
                relationship,
            });
        }

        Ok(Ok(links))
    }

    /// `None` when any requested tag is blank, repeated, unknown, archived or
    /// not a guardian tag
    async fn resolve_tags(
        &self,
        row: &ImportRow,
        context: &ImportContext,
    ) -> AppResult<Option<Vec<Tag>>> {
        let requested = row.get(GuardianColumn::ParentTag).split(MULTI_VALUE_SEPARATOR);
        if requested.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let unique: HashSet<&String> = requested.iter().collect();
        if unique.len() != requested.len() || requested.iter().any(|t| t.is_empty()) {
            return Ok(None);
        }

        let found = self
            .tag_repository
            .find_by_partner_internal_ids(&context.organization_id, &requested)
            .await?;

        let mut tags = Vec::with_capacity(requested.len());
        for partner_id in &requested {
            match found.iter().find(|t| &t.partner_internal_id == partner_id) {
                Some(tag) if tag.is_assignable_to_guardian() => tags.push(tag.clone()),
                _ => return Ok(None),
            }
        }

        Ok(Some(tags))
    }
}
