use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneNumberKind {
    Primary,
    Secondary,
}

impl PhoneNumberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhoneNumberKind::Primary => "PARENT_PRIMARY_PHONE_NUMBER",
            PhoneNumberKind::Secondary => "PARENT_SECONDARY_PHONE_NUMBER",
        }
    }
}

/// A contact number owned by one guardian; at most one per kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneNumberRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub number: String,
    pub kind: PhoneNumberKind,
    pub organization_id: String,
}

impl PhoneNumberRecord {
    pub fn new(owner_id: Uuid, number: &str, kind: PhoneNumberKind, organization_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            number: number.to_string(),
            kind,
            organization_id: organization_id.to_string(),
        }
    }
}
