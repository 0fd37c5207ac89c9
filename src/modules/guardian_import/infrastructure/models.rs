use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::modules::guardian_import::domain::entities::{
    ImportEvent, ImportEventRecord, PersonRecord, PhoneNumberRecord, Student, Tag,
};
use crate::schema::{import_user_event, user_phone_number, user_tag, users};
use crate::shared::errors::{AppError, AppResult};

// ================== USER MODELS ==================

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUserModel {
    pub user_id: Uuid,
    pub organization_id: String,
    pub email: String,
    pub username: String,
    pub login_email: String,
    pub user_external_id: Option<String>,
    pub name: String,
    pub given_name: String,
    pub family_name: String,
    pub first_name_phonetic: Option<String>,
    pub last_name_phonetic: Option<String>,
    pub full_name_phonetic: Option<String>,
    pub phone_number: Option<String>,
    pub country: String,
    pub remarks: Option<String>,
    pub user_group: String,
}

impl From<&PersonRecord> for NewUserModel {
    fn from(person: &PersonRecord) -> Self {
        Self {
            user_id: person.id,
            organization_id: person.organization_id.clone(),
            email: person.email.clone(),
            username: person.username.clone(),
            login_email: person.login_email.clone(),
            user_external_id: person.external_user_id.clone().into_option(),
            name: person.full_name.clone(),
            given_name: person.first_name.clone(),
            family_name: person.last_name.clone(),
            first_name_phonetic: person.first_name_phonetic.clone().into_option(),
            last_name_phonetic: person.last_name_phonetic.clone().into_option(),
            full_name_phonetic: person.full_name_phonetic.clone().into_option(),
            phone_number: person.phone_number.clone().into_option(),
            country: person.country.clone(),
            remarks: person.remarks.clone().into_option(),
            user_group: person.user_group().to_string(),
        }
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = user_phone_number)]
pub struct NewPhoneNumberModel {
    pub user_phone_number_id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    pub phone_number_type: String,
    pub organization_id: String,
}

impl From<&PhoneNumberRecord> for NewPhoneNumberModel {
    fn from(phone: &PhoneNumberRecord) -> Self {
        Self {
            user_phone_number_id: phone.id,
            user_id: phone.owner_id,
            phone_number: phone.number.clone(),
            phone_number_type: phone.kind.as_str().to_string(),
            organization_id: phone.organization_id.clone(),
        }
    }
}

/// Student joined with its user row
#[derive(Queryable, Debug, Clone)]
pub struct StudentModel {
    pub student_id: Uuid,
    pub email: String,
    pub name: String,
}

impl From<StudentModel> for Student {
    fn from(model: StudentModel) -> Self {
        Student {
            id: model.student_id,
            email: model.email,
            full_name: model.name,
        }
    }
}

// ================== TAG MODELS ==================

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = user_tag)]
pub struct UserTagModel {
    pub user_tag_id: Uuid,
    pub name: String,
    pub user_tag_type: String,
    pub user_tag_partner_id: String,
    pub is_archived: bool,
}

impl UserTagModel {
    /// Tags with a type this crate does not know are skipped by the caller
    pub fn into_tag(self) -> AppResult<Tag> {
        let tag_type = self
            .user_tag_type
            .parse()
            .map_err(AppError::ValidationError)?;

        Ok(Tag {
            id: self.user_tag_id,
            name: self.name,
            partner_internal_id: self.user_tag_partner_id,
            tag_type,
            is_archived: self.is_archived,
        })
    }
}

// ================== IMPORT EVENT MODELS ==================

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = import_user_event)]
pub struct NewImportUserEvent {
    pub importer_id: String,
    pub user_id: Uuid,
    pub status: String,
    pub payload: JsonValue,
    pub organization_id: String,
}

impl NewImportUserEvent {
    pub fn from_event(event: &ImportEvent) -> AppResult<Self> {
        Ok(Self {
            importer_id: event.importer_id.clone(),
            user_id: event.user_id,
            status: event.status.to_string(),
            payload: serde_json::to_value(&event.payload)?,
            organization_id: event.organization_id.clone(),
        })
    }
}

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = import_user_event)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ImportUserEventModel {
    pub import_user_event_id: i64,
    pub importer_id: String,
    pub user_id: Uuid,
    pub status: String,
    pub payload: JsonValue,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<ImportUserEventModel> for ImportEventRecord {
    fn from(model: ImportUserEventModel) -> Self {
        ImportEventRecord {
            id: model.import_user_event_id,
            importer_id: model.importer_id,
            user_id: model.user_id,
            status: model.status,
            payload: model.payload,
            organization_id: model.organization_id,
            created_at: model.created_at,
        }
    }
}
