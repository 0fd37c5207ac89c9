/// Postgres unit of work for the guardian import.
///
/// One pooled connection is checked out per transaction and moved into
/// `spawn_blocking` for every statement. A transaction dropped without
/// `commit` leaves the connection with an open transaction; the pool treats
/// such a connection as broken and discards it, which rolls the work back.
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::{Array, Text};
use diesel::upsert::excluded;
use tokio::task;
use uuid::Uuid;

use crate::modules::guardian_import::domain::entities::{
    ImportEvent, PersonRecord, PhoneNumberRecord, StudentLink, TaggedUser,
};
use crate::modules::guardian_import::domain::repositories::{ImportTransaction, ImportUnitOfWork};
use crate::modules::guardian_import::infrastructure::models::{
    NewImportUserEvent, NewPhoneNumberModel, NewUserModel,
};
use crate::schema::{
    import_user_event, organizations, parents, student_parents, tagged_user, user_group,
    user_group_member, user_phone_number, users, usr_email,
};
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::DbConnection;
use crate::shared::utils::logger::LogContext;
use crate::shared::Database;
use crate::log_debug;

pub struct PgImportUnitOfWork {
    db: Arc<Database>,
}

impl PgImportUnitOfWork {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ImportUnitOfWork for PgImportUnitOfWork {
    async fn begin(&self) -> AppResult<Box<dyn ImportTransaction>> {
        let db = Arc::clone(&self.db);

        let conn = task::spawn_blocking(move || -> AppResult<DbConnection> {
            let mut conn = db.get_connection()?;
            <AnsiTransactionManager as TransactionManager<PgConnection>>::begin_transaction(
                &mut *conn,
            )?;
            Ok(conn)
        })
        .await??;

        log_debug!("Import transaction started");
        Ok(Box::new(PgImportTransaction { conn: Some(conn) }))
    }
}

pub struct PgImportTransaction {
    conn: Option<DbConnection>,
}

impl PgImportTransaction {
    /// Run one blocking step on the transaction's connection
    async fn run<T, F>(&mut self, step: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> AppResult<T> + Send + 'static,
    {
        let mut conn = self
            .conn
            .take()
            .ok_or_else(|| AppError::InternalError("Import transaction already finished".into()))?;

        let (conn, result) = task::spawn_blocking(move || {
            let result = step(&mut *conn);
            (conn, result)
        })
        .await?;

        self.conn = Some(conn);
        result
    }

    async fn finish<F>(mut self: Box<Self>, end: F) -> AppResult<()>
    where
        F: FnOnce(&mut PgConnection) -> QueryResult<()> + Send + 'static,
    {
        let mut conn = self
            .conn
            .take()
            .ok_or_else(|| AppError::InternalError("Import transaction already finished".into()))?;

        task::spawn_blocking(move || -> AppResult<()> {
            end(&mut *conn)?;
            Ok(())
        })
        .await?
    }
}

#[async_trait]
impl ImportTransaction for PgImportTransaction {
    async fn find_role_group_id(
        &mut self,
        organization_id: &str,
        user_group: &str,
    ) -> AppResult<Option<Uuid>> {
        let organization_id = organization_id.to_string();
        let role = user_group.to_string();

        self.run(move |conn| {
            let id = user_group::table
                .filter(user_group::organization_id.eq(&organization_id))
                .filter(user_group::role.eq(&role))
                .filter(user_group::deleted_at.is_null())
                .order(user_group::created_at.asc())
                .select(user_group::user_group_id)
                .first::<Uuid>(conn)
                .optional()?;
            Ok(id)
        })
        .await
    }

    async fn reserve_emails(
        &mut self,
        organization_id: &str,
        emails: &[String],
    ) -> AppResult<Vec<(String, Uuid)>> {
        let rows: Vec<_> = emails
            .iter()
            .map(|email| {
                (
                    usr_email::email.eq(email.clone()),
                    usr_email::organization_id.eq(organization_id.to_string()),
                )
            })
            .collect();

        self.run(move |conn| {
            let reserved = diesel::insert_into(usr_email::table)
                .values(rows)
                .returning((usr_email::email, usr_email::usr_id))
                .get_results::<(String, Uuid)>(conn)?;
            Ok(reserved)
        })
        .await
    }

    async fn create_persons(&mut self, persons: &[PersonRecord]) -> AppResult<()> {
        let new_users: Vec<NewUserModel> = persons.iter().map(NewUserModel::from).collect();
        let new_parents: Vec<_> = persons
            .iter()
            .map(|p| {
                (
                    parents::parent_id.eq(p.id),
                    parents::organization_id.eq(p.organization_id.clone()),
                )
            })
            .collect();

        self.run(move |conn| {
            diesel::insert_into(users::table)
                .values(&new_users)
                .execute(conn)?;
            diesel::insert_into(parents::table)
                .values(new_parents)
                .execute(conn)?;
            Ok(())
        })
        .await?;

        LogContext::db_operation("insert", "users", None);
        Ok(())
    }

    async fn upsert_phone_numbers(&mut self, phone_numbers: &[PhoneNumberRecord]) -> AppResult<()> {
        let rows: Vec<NewPhoneNumberModel> =
            phone_numbers.iter().map(NewPhoneNumberModel::from).collect();

        self.run(move |conn| {
            diesel::insert_into(user_phone_number::table)
                .values(&rows)
                .on_conflict((user_phone_number::user_id, user_phone_number::phone_number_type))
                .do_update()
                .set((
                    user_phone_number::phone_number.eq(excluded(user_phone_number::phone_number)),
                    user_phone_number::updated_at.eq(Utc::now()),
                    user_phone_number::deleted_at.eq(None::<DateTime<Utc>>),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn assign_role_group(
        &mut self,
        organization_id: &str,
        user_group_id: Uuid,
        user_ids: &[Uuid],
    ) -> AppResult<()> {
        let rows: Vec<_> = user_ids
            .iter()
            .map(|user_id| {
                (
                    user_group_member::user_id.eq(*user_id),
                    user_group_member::user_group_id.eq(user_group_id),
                    user_group_member::organization_id.eq(organization_id.to_string()),
                )
            })
            .collect();

        self.run(move |conn| {
            diesel::insert_into(user_group_member::table)
                .values(rows)
                .on_conflict((user_group_member::user_id, user_group_member::user_group_id))
                .do_update()
                .set((
                    user_group_member::updated_at.eq(Utc::now()),
                    user_group_member::deleted_at.eq(None::<DateTime<Utc>>),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn upsert_student_guardians(
        &mut self,
        organization_id: &str,
        guardian_id: Uuid,
        links: &[StudentLink],
    ) -> AppResult<()> {
        let rows: Vec<_> = links
            .iter()
            .map(|link| {
                (
                    student_parents::student_id.eq(link.student_id),
                    student_parents::parent_id.eq(guardian_id),
                    student_parents::relationship.eq(link.relationship.as_str().to_string()),
                    student_parents::organization_id.eq(organization_id.to_string()),
                )
            })
            .collect();

        self.run(move |conn| {
            diesel::insert_into(student_parents::table)
                .values(rows)
                .on_conflict((student_parents::student_id, student_parents::parent_id))
                .do_update()
                .set((
                    student_parents::relationship.eq(excluded(student_parents::relationship)),
                    student_parents::updated_at.eq(Utc::now()),
                    student_parents::deleted_at.eq(None::<DateTime<Utc>>),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn refresh_guardian_access_paths(
        &mut self,
        organization_id: &str,
        student_ids: &[Uuid],
    ) -> AppResult<()> {
        let organization_id = organization_id.to_string();
        let student_ids = student_ids.to_vec();

        self.run(move |conn| {
            // Guardians inherit every location their students can access
            diesel::sql_query(
                "INSERT INTO user_access_paths (user_id, location_id, access_path, organization_id)
                 SELECT sp.parent_id, uap.location_id, uap.access_path, sp.organization_id
                 FROM student_parents sp
                 JOIN user_access_paths uap
                   ON uap.user_id = sp.student_id AND uap.deleted_at IS NULL
                 WHERE sp.student_id = ANY($1)
                   AND sp.organization_id = $2
                   AND sp.deleted_at IS NULL
                 ON CONFLICT (user_id, location_id) DO UPDATE
                 SET access_path = EXCLUDED.access_path,
                     updated_at = NOW(),
                     deleted_at = NULL",
            )
            .bind::<Array<diesel::sql_types::Uuid>, _>(student_ids)
            .bind::<Text, _>(organization_id)
            .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn upsert_tagged_users(&mut self, tagged_users: &[TaggedUser]) -> AppResult<()> {
        let rows: Vec<_> = tagged_users
            .iter()
            .map(|t| {
                (
                    tagged_user::user_id.eq(t.user_id),
                    tagged_user::tag_id.eq(t.tag_id),
                    tagged_user::organization_id.eq(t.organization_id.clone()),
                )
            })
            .collect();

        self.run(move |conn| {
            diesel::insert_into(tagged_user::table)
                .values(rows)
                .on_conflict((tagged_user::user_id, tagged_user::tag_id))
                .do_update()
                .set((
                    tagged_user::updated_at.eq(Utc::now()),
                    tagged_user::deleted_at.eq(None::<DateTime<Utc>>),
                ))
                .execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn find_identity_tenant_id(&mut self, organization_id: &str) -> AppResult<Option<String>> {
        let organization_id = organization_id.to_string();

        self.run(move |conn| {
            let tenant_id = organizations::table
                .filter(organizations::organization_id.eq(&organization_id))
                .select(organizations::identity_tenant_id)
                .first::<Option<String>>(conn)
                .optional()?;
            Ok(tenant_id.flatten().filter(|id| !id.trim().is_empty()))
        })
        .await
    }

    async fn append_import_events(&mut self, events: &[ImportEvent]) -> AppResult<Vec<i64>> {
        let rows = events
            .iter()
            .map(NewImportUserEvent::from_event)
            .collect::<AppResult<Vec<_>>>()?;

        self.run(move |conn| {
            let ids = diesel::insert_into(import_user_event::table)
                .values(&rows)
                .returning(import_user_event::import_user_event_id)
                .get_results::<i64>(conn)?;
            Ok(ids)
        })
        .await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.finish(|conn| {
            <AnsiTransactionManager as TransactionManager<PgConnection>>::commit_transaction(conn)
        })
        .await?;
        log_debug!("Import transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.finish(|conn| {
            <AnsiTransactionManager as TransactionManager<PgConnection>>::rollback_transaction(conn)
        })
        .await?;
        log_debug!("Import transaction rolled back");
        Ok(())
    }
}
