/// Ledger entries describing what an import created.
///
/// Rows are appended inside the import transaction and later delivered to
/// downstream consumers by the background worker.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportEventStatus {
    Waiting,
    Finished,
    Failed,
}

impl std::fmt::Display for ImportEventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportEventStatus::Waiting => write!(f, "waiting"),
            ImportEventStatus::Finished => write!(f, "finished"),
            ImportEventStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ImportEventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(ImportEventStatus::Waiting),
            "finished" => Ok(ImportEventStatus::Finished),
            "failed" => Ok(ImportEventStatus::Failed),
            _ => Err(format!("Invalid import event status: {}", s)),
        }
    }
}

/// Payload describing one created guardian, optionally linked to one student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianCreatedPayload {
    pub parent_id: Uuid,
    pub student_id: Option<Uuid>,
    pub student_name: Option<String>,
    pub organization_id: String,
}

/// New ledger entry (before insertion)
#[derive(Debug, Clone, PartialEq)]
pub struct ImportEvent {
    pub importer_id: String,
    pub user_id: Uuid,
    pub status: ImportEventStatus,
    pub payload: GuardianCreatedPayload,
    pub organization_id: String,
}

impl ImportEvent {
    pub fn guardian_created(
        importer_id: &str,
        parent_id: Uuid,
        student: Option<(Uuid, &str)>,
        organization_id: &str,
    ) -> Self {
        Self {
            importer_id: importer_id.to_string(),
            user_id: parent_id,
            status: ImportEventStatus::Waiting,
            payload: GuardianCreatedPayload {
                parent_id,
                student_id: student.map(|(id, _)| id),
                student_name: student.map(|(_, name)| name.to_string()),
                organization_id: organization_id.to_string(),
            },
            organization_id: organization_id.to_string(),
        }
    }
}

/// Ledger entry as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportEventRecord {
    pub id: i64,
    pub importer_id: String,
    pub user_id: Uuid,
    pub status: String,
    pub payload: serde_json::Value,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
}

impl ImportEventRecord {
    pub fn parse_status(&self) -> Result<ImportEventStatus, String> {
        self.status.parse()
    }

    pub fn parse_payload(&self) -> Result<GuardianCreatedPayload, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
