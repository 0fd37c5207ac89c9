/// In-memory implementations of every import port
///
/// All fakes share one `Store`, so a test can inspect what an import left
/// behind exactly as it would query the database.
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use usermgmt::modules::guardian_import::application::ports::{
    IdentityAccount, IdentityProvider, IdentityProviderError, ImportEventPublisher,
    ImportEventRepository, ImportNotificationTask, ImportTransaction, ImportUnitOfWork,
    PersonRepository, StudentRepository, TagRepository, TaskQueue,
};
use usermgmt::modules::guardian_import::domain::entities::{
    ImportEvent, ImportEventRecord, ImportEventStatus, PersonRecord, PhoneNumberRecord, Student,
    StudentLink, Tag, TaggedUser,
};
use usermgmt::modules::jobs::{Job, JobRecord, JobRepository, JobStatistics, JobStatus};
use usermgmt::shared::errors::{AppError, AppResult};

#[derive(Debug, Default, Clone)]
pub struct Store {
    pub persons: Vec<PersonRecord>,
    pub phone_numbers: Vec<PhoneNumberRecord>,
    pub memberships: Vec<(Uuid, Uuid)>,
    pub student_guardians: Vec<(Uuid, StudentLink)>,
    pub tagged_users: Vec<TaggedUser>,
    pub reserved_emails: Vec<(String, Uuid)>,
    pub events: Vec<ImportEventRecord>,
    pub next_event_id: i64,
    pub transactions_opened: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

#[derive(Debug, Default, Clone)]
pub struct SharedStore(Arc<Mutex<Store>>);

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, Store> {
        self.0.lock().unwrap()
    }

    pub fn snapshot(&self) -> Store {
        self.lock().clone()
    }
}

// ================== READ SIDE ==================

/// People already registered before the import runs, plus whatever commits
pub struct InMemoryPersonRepository {
    store: SharedStore,
    seeded: Vec<PersonRecord>,
}

impl InMemoryPersonRepository {
    pub fn new(store: SharedStore, seeded: Vec<PersonRecord>) -> Self {
        Self { store, seeded }
    }

    fn all_persons(&self) -> Vec<PersonRecord> {
        let mut persons = self.seeded.clone();
        persons.extend(self.store.lock().persons.iter().cloned());
        persons
    }
}

#[async_trait]
impl PersonRepository for InMemoryPersonRepository {
    async fn find_existing_emails(
        &self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<String>> {
        Ok(self
            .all_persons()
            .into_iter()
            .filter(|p| p.organization_id == organization_id)
            .filter(|p| emails.iter().any(|e| e.eq_ignore_ascii_case(&p.email)))
            .map(|p| p.email)
            .collect())
    }

    async fn find_existing_phone_numbers(
        &self,
        organization_id: &str,
        phone_numbers: &[String],
    ) -> AppResult<Vec<String>> {
        let stored = self.store.lock().phone_numbers.clone();
        let mut found: Vec<String> = stored
            .into_iter()
            .filter(|p| p.organization_id == organization_id)
            .filter(|p| phone_numbers.contains(&p.number))
            .map(|p| p.number)
            .collect();

        // Legacy single-column numbers live on the person
        found.extend(
            self.all_persons()
                .into_iter()
                .filter(|p| p.organization_id == organization_id)
                .filter_map(|p| p.phone_number.as_str().map(str::to_string))
                .filter(|number| phone_numbers.contains(number)),
        );

        found.sort();
        found.dedup();
        Ok(found)
    }

    async fn find_existing_external_ids(
        &self,
        organization_id: &str,
        external_user_ids: &[String],
    ) -> AppResult<Vec<String>> {
        Ok(self
            .all_persons()
            .into_iter()
            .filter(|p| p.organization_id == organization_id)
            .filter_map(|p| p.external_user_id.as_str().map(str::to_string))
            .filter(|id| external_user_ids.contains(id))
            .collect())
    }

    async fn find_existing_usernames(
        &self,
        organization_id: &str,
        usernames: &[String],
    ) -> AppResult<Vec<String>> {
        Ok(self
            .all_persons()
            .into_iter()
            .filter(|p| p.organization_id == organization_id)
            .filter(|p| usernames.iter().any(|u| u.eq_ignore_ascii_case(&p.username)))
            .map(|p| p.username)
            .collect())
    }
}

pub struct InMemoryStudentRepository(pub Vec<Student>);

#[async_trait]
impl StudentRepository for InMemoryStudentRepository {
    async fn find_by_emails(&self, _organization_id: &str, emails: &[String]) -> AppResult<Vec<Student>> {
        Ok(self
            .0
            .iter()
            .filter(|s| emails.iter().any(|e| e.eq_ignore_ascii_case(&s.email)))
            .cloned()
            .collect())
    }
}

pub struct InMemoryTagRepository(pub Vec<Tag>);

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_partner_internal_ids(
        &self,
        _organization_id: &str,
        partner_internal_ids: &[String],
    ) -> AppResult<Vec<Tag>> {
        Ok(self
            .0
            .iter()
            .filter(|t| partner_internal_ids.contains(&t.partner_internal_id))
            .cloned()
            .collect())
    }
}

// ================== WRITE SIDE ==================

/// Unit of work staging writes until commit
pub struct InMemoryUnitOfWork {
    store: SharedStore,
    role_group_id: Option<Uuid>,
    tenant_id: Option<String>,
}

impl InMemoryUnitOfWork {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            role_group_id: Some(Uuid::new_v4()),
            tenant_id: Some("tenant-1".to_string()),
        }
    }

    pub fn without_tenant(mut self) -> Self {
        self.tenant_id = None;
        self
    }

    pub fn without_role_group(mut self) -> Self {
        self.role_group_id = None;
        self
    }
}

#[async_trait]
impl ImportUnitOfWork for InMemoryUnitOfWork {
    async fn begin(&self) -> AppResult<Box<dyn ImportTransaction>> {
        let staged = {
            let mut store = self.store.lock();
            store.transactions_opened += 1;
            store.clone()
        };

        Ok(Box::new(InMemoryTransaction {
            store: self.store.clone(),
            staged,
            role_group_id: self.role_group_id,
            tenant_id: self.tenant_id.clone(),
        }))
    }
}

pub struct InMemoryTransaction {
    store: SharedStore,
    staged: Store,
    role_group_id: Option<Uuid>,
    tenant_id: Option<String>,
}

#[async_trait]
impl ImportTransaction for InMemoryTransaction {
    async fn find_role_group_id(&mut self, _organization_id: &str, _user_group: &str) -> AppResult<Option<Uuid>> {
        Ok(self.role_group_id)
    }

    async fn reserve_emails(
        &mut self,
        _organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<(String, Uuid)>> {
        let reserved: Vec<(String, Uuid)> = emails
            .iter()
            .map(|email| (email.clone(), Uuid::new_v4()))
            .collect();
        self.staged.reserved_emails.extend(reserved.iter().cloned());
        Ok(reserved)
    }

    async fn create_persons(&mut self, persons: &[PersonRecord]) -> AppResult<()> {
        self.staged.persons.extend(persons.iter().cloned());
        Ok(())
    }

    async fn upsert_phone_numbers(&mut self, phone_numbers: &[PhoneNumberRecord]) -> AppResult<()> {
        self.staged.phone_numbers.extend(phone_numbers.iter().cloned());
        Ok(())
    }

    async fn assign_role_group(
        &mut self,
        _organization_id: &str,
        user_group_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<()> {
        self.staged
            .memberships
            .extend(user_ids.iter().map(|id| (*id, user_group_id)));
        Ok(())
    }

    async fn upsert_student_guardians(
        &mut self,
        _organization_id: &str,
        guardian_id: Uuid,
        links: &[StudentLink],
    ) -> AppResult<()> {
        self.staged
            .student_guardians
            .extend(links.iter().map(|link| (guardian_id, link.clone())));
        Ok(())
    }

    async fn refresh_guardian_access_paths(&mut self, _organization_id: &str, _student_ids: &[Uuid]) -> AppResult<()> {
        Ok(())
    }

    async fn upsert_tagged_users(&mut self, tagged_users: &[TaggedUser]) -> AppResult<()> {
        self.staged.tagged_users.extend(tagged_users.iter().cloned());
        Ok(())
    }

    async fn find_identity_tenant_id(&mut self, _organization_id: &str) -> AppResult<Option<String>> {
        Ok(self.tenant_id.clone())
    }

    async fn append_import_events(&mut self, events: &[ImportEvent]) -> AppResult<Vec<i64>> {
        let mut ids = Vec::with_capacity(events.len());
        for event in events {
            self.staged.next_event_id += 1;
            let id = self.staged.next_event_id;
            self.staged.events.push(ImportEventRecord {
                id,
                importer_id: event.importer_id.clone(),
                user_id: event.user_id,
                status: event.status.to_string(),
                payload: serde_json::to_value(&event.payload)?,
                organization_id: event.organization_id.clone(),
                created_at: Utc::now(),
            });
            ids.push(id);
        }
        Ok(ids)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let InMemoryTransaction { store, staged, .. } = *self;
        let mut store = store.lock();
        let opened = store.transactions_opened;
        let rollbacks = store.rollbacks;
        let commits = store.commits + 1;
        *store = staged;
        store.transactions_opened = opened;
        store.rollbacks = rollbacks;
        store.commits = commits;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.store.lock().rollbacks += 1;
        Ok(())
    }
}

// ================== EXTERNAL SERVICES ==================

#[derive(Default)]
pub struct RecordingIdentityProvider {
    pub calls: Mutex<Vec<(String, Vec<IdentityAccount>)>>,
    failure: Option<IdentityProviderError>,
}

impl RecordingIdentityProvider {
    pub fn failing(failure: IdentityProviderError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(failure),
        }
    }

    pub fn calls(&self) -> Vec<(String, Vec<IdentityAccount>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IdentityProvider for RecordingIdentityProvider {
    async fn import_accounts(
        &self,
        tenant_id: &str,
        accounts: &[IdentityAccount],
    ) -> Result<(), IdentityProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((tenant_id.to_string(), accounts.to_vec()));
        match &self.failure {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

#[derive(Default)]
pub struct RecordingTaskQueue {
    pub tasks: Mutex<Vec<ImportNotificationTask>>,
    pub fail: bool,
}

impl RecordingTaskQueue {
    pub fn failing() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn tasks(&self) -> Vec<ImportNotificationTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueue for RecordingTaskQueue {
    async fn enqueue_import_notification(&self, task: ImportNotificationTask) -> AppResult<()> {
        if self.fail {
            return Err(AppError::DatabaseError("queue offline".to_string()));
        }
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

// ================== JOBS ==================

pub struct InMemoryEventRepository {
    store: SharedStore,
}

impl InMemoryEventRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ImportEventRepository for InMemoryEventRepository {
    async fn find_by_ids(&self, ids: &[i64]) -> AppResult<Vec<ImportEventRecord>> {
        Ok(self
            .store
            .lock()
            .events
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect())
    }

    async fn mark_status(&self, ids: &[i64], status: ImportEventStatus) -> AppResult<usize> {
        let mut store = self.store.lock();
        let mut updated = 0;
        for event in store.events.iter_mut().filter(|e| ids.contains(&e.id)) {
            event.status = status.to_string();
            updated += 1;
        }
        Ok(updated)
    }
}

/// Publisher failing for the first `failures` calls
#[derive(Default)]
pub struct RecordingPublisher {
    pub published: Mutex<Vec<i64>>,
    failures: Mutex<usize>,
}

impl RecordingPublisher {
    pub fn failing_times(failures: usize) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            failures: Mutex::new(failures),
        }
    }

    pub fn published(&self) -> Vec<i64> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImportEventPublisher for RecordingPublisher {
    async fn publish(&self, event: &ImportEventRecord) -> AppResult<()> {
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(AppError::ExternalServiceError("webhook returned 503".to_string()));
        }
        self.published.lock().unwrap().push(event.id);
        Ok(())
    }
}

/// Job queue with the same retry rules as the Postgres repository
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: Mutex<HashMap<Uuid, JobRecord>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<JobRecord> {
        self.jobs.lock().unwrap().values().cloned().collect()
    }

    fn set_status(&self, job_id: Uuid, status: JobStatus, error: Option<&str>) -> AppResult<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .get_mut(&job_id)
            .ok_or_else(|| AppError::NotFound(format!("job {}", job_id)))?;
        job.status = status.to_string();
        job.error = error.map(str::to_string);
        if status == JobStatus::Completed {
            job.completed_at = Some(Utc::now());
        }
        Ok(())
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn enqueue(&self, job: Job) -> AppResult<JobRecord> {
        let record = JobRecord {
            id: Uuid::new_v4(),
            job_type: job.job_type.to_string(),
            payload: job.payload,
            priority: job.priority,
            status: JobStatus::Pending.to_string(),
            attempts: 0,
            max_attempts: job.max_attempts,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error: None,
        };
        self.jobs.lock().unwrap().insert(record.id, record.clone());
        Ok(record)
    }

    async fn dequeue(&self) -> AppResult<Option<JobRecord>> {
        let mut jobs = self.jobs.lock().unwrap();
        let next = jobs
            .values_mut()
            .filter(|j| j.status == "pending" && j.attempts < j.max_attempts)
            .min_by_key(|j| (j.priority, j.created_at));

        Ok(next.map(|job| {
            job.status = JobStatus::Running.to_string();
            job.attempts += 1;
            job.started_at = Some(Utc::now());
            job.clone()
        }))
    }

    async fn mark_completed(&self, job_id: Uuid) -> AppResult<()> {
        self.set_status(job_id, JobStatus::Completed, None)
    }

    async fn mark_failed(&self, job_id: Uuid, error: &str) -> AppResult<()> {
        let can_retry = {
            let jobs = self.jobs.lock().unwrap();
            jobs.get(&job_id).map(|j| j.can_retry()).unwrap_or(false)
        };
        let status = if can_retry { JobStatus::Pending } else { JobStatus::Failed };
        self.set_status(job_id, status, Some(error))
    }

    async fn get_statistics(&self) -> AppResult<JobStatistics> {
        let jobs = self.jobs.lock().unwrap();
        let mut counts: HashMap<String, i64> = HashMap::new();
        for job in jobs.values() {
            *counts.entry(job.status.clone()).or_default() += 1;
        }
        Ok(JobStatistics::from_counts(counts))
    }
}
