/// Test data builders for guardian import payloads and fixtures
use std::sync::Arc;
use uuid::Uuid;

use usermgmt::modules::guardian_import::domain::entities::{
    FieldCell, PersonRecord, PhoneNumberKind, PhoneNumberRecord, Student, Tag, TagType,
};
use usermgmt::modules::guardian_import::{ImportContext, ImportGuardiansHandler};
use usermgmt::shared::config::ImportSettings;

use super::fakes::{
    InMemoryPersonRepository, InMemoryStudentRepository, InMemoryTagRepository,
    InMemoryUnitOfWork, RecordingIdentityProvider, RecordingTaskQueue, SharedStore,
};

pub const ORGANIZATION_ID: &str = "org-1";

/// Builds a CSV upload column by column
pub struct CsvPayload {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvPayload {
    pub fn with_headers(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Header set covering the mandatory columns plus phones and tags
    pub fn standard() -> Self {
        Self::with_headers(&[
            "first_name",
            "last_name",
            "email",
            "primary_phone_number",
            "parent_tag",
            "student_email",
            "relationship",
        ])
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        self.rows.push(cells.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.headers).unwrap();
        for row in &self.rows {
            writer.write_record(row).unwrap();
        }
        writer.into_inner().unwrap()
    }
}

pub fn context() -> ImportContext {
    ImportContext::new(ORGANIZATION_ID, "COUNTRY_JP", "importer-1")
}

pub fn student(email: &str, name: &str) -> Student {
    Student {
        id: Uuid::new_v4(),
        email: email.to_string(),
        full_name: name.to_string(),
    }
}

pub fn parent_tag(partner_id: &str) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        name: format!("Tag {}", partner_id),
        partner_internal_id: partner_id.to_string(),
        tag_type: TagType::Parent,
        is_archived: false,
    }
}

/// A guardian already stored for the organization
pub fn registered_person(email: &str) -> PersonRecord {
    PersonRecord {
        id: Uuid::new_v4(),
        organization_id: ORGANIZATION_ID.to_string(),
        email: email.to_string(),
        username: email.to_lowercase(),
        login_email: email.to_string(),
        external_user_id: FieldCell::Absent,
        full_name: "Existing Guardian".to_string(),
        first_name: "Guardian".to_string(),
        last_name: "Existing".to_string(),
        first_name_phonetic: FieldCell::Absent,
        last_name_phonetic: FieldCell::Absent,
        full_name_phonetic: FieldCell::Absent,
        phone_number: FieldCell::Absent,
        country: "COUNTRY_JP".to_string(),
        remarks: FieldCell::Absent,
    }
}

/// A guardian already stored under `username`, for username-login imports
pub fn registered_username(email: &str, username: &str) -> PersonRecord {
    PersonRecord {
        username: username.to_string(),
        ..registered_person(email)
    }
}

/// Handler wired to in-memory ports, with handles to inspect them afterwards
pub struct ImportHarness {
    pub store: SharedStore,
    pub identity: Arc<RecordingIdentityProvider>,
    pub queue: Arc<RecordingTaskQueue>,
    pub handler: ImportGuardiansHandler,
}

pub struct ImportHarnessBuilder {
    registered: Vec<PersonRecord>,
    students: Vec<Student>,
    tags: Vec<Tag>,
    identity: RecordingIdentityProvider,
    queue: RecordingTaskQueue,
    stored_phones: Vec<String>,
    with_tenant: bool,
    with_role_group: bool,
}

impl Default for ImportHarnessBuilder {
    fn default() -> Self {
        Self {
            registered: Vec::new(),
            students: vec![
                student("kid1@school.example", "Tanaka Taro"),
                student("kid2@school.example", "Suzuki Jiro"),
            ],
            tags: vec![parent_tag("PT-1"), parent_tag("PT-2")],
            identity: RecordingIdentityProvider::default(),
            queue: RecordingTaskQueue::default(),
            stored_phones: Vec::new(),
            with_tenant: true,
            with_role_group: true,
        }
    }
}

impl ImportHarnessBuilder {
    pub fn with_registered(mut self, person: PersonRecord) -> Self {
        self.registered.push(person);
        self
    }

    pub fn with_identity(mut self, identity: RecordingIdentityProvider) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_queue(mut self, queue: RecordingTaskQueue) -> Self {
        self.queue = queue;
        self
    }

    /// A number already in the phone table, owned by someone outside the batch
    pub fn with_stored_phone(mut self, number: &str) -> Self {
        self.stored_phones.push(number.to_string());
        self
    }

    pub fn without_tenant(mut self) -> Self {
        self.with_tenant = false;
        self
    }

    pub fn without_role_group(mut self) -> Self {
        self.with_role_group = false;
        self
    }

    pub fn build(self) -> ImportHarness {
        let store = SharedStore::new();
        store.lock().phone_numbers = self
            .stored_phones
            .iter()
            .map(|number| {
                PhoneNumberRecord::new(Uuid::new_v4(), number, PhoneNumberKind::Primary, ORGANIZATION_ID)
            })
            .collect();
        let identity = Arc::new(self.identity);
        let queue = Arc::new(self.queue);

        let mut unit_of_work = InMemoryUnitOfWork::new(store.clone());
        if !self.with_tenant {
            unit_of_work = unit_of_work.without_tenant();
        }
        if !self.with_role_group {
            unit_of_work = unit_of_work.without_role_group();
        }

        let handler = ImportGuardiansHandler::new(
            &ImportSettings::default(),
            Arc::new(InMemoryPersonRepository::new(store.clone(), self.registered)),
            Arc::new(InMemoryStudentRepository(self.students)),
            Arc::new(InMemoryTagRepository(self.tags)),
            Arc::new(unit_of_work),
            identity.clone(),
            queue.clone(),
        );

        ImportHarness {
            store,
            identity,
            queue,
            handler,
        }
    }
}

impl ImportHarness {
    pub fn builder() -> ImportHarnessBuilder {
        ImportHarnessBuilder::default()
    }
}
