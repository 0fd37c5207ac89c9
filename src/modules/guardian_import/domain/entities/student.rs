use uuid::Uuid;

use crate::modules::guardian_import::domain::value_objects::FamilyRelationship;

/// A persisted student, as far as the import needs to know it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
}

/// Guardian-to-student association requested by one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentLink {
    pub student_id: Uuid,
    pub student_name: String,
    pub relationship: FamilyRelationship,
}
