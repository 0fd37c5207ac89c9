use serde::Serialize;
use std::collections::HashMap;

use super::field_cell::FieldCell;

/// Columns understood by the guardian import template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardianColumn {
    ExternalUserId,
    /// Legacy single-cell name, `last first`
    Name,
    LastName,
    FirstName,
    LastNamePhonetic,
    FirstNamePhonetic,
    Username,
    Email,
    /// Legacy single phone column, checked against the organization's numbering plan
    PhoneNumber,
    StudentEmail,
    Relationship,
    ParentTag,
    PrimaryPhoneNumber,
    SecondaryPhoneNumber,
    Remarks,
}

impl GuardianColumn {
    pub const ALL: [GuardianColumn; 15] = [
        GuardianColumn::ExternalUserId,
        GuardianColumn::Name,
        GuardianColumn::LastName,
        GuardianColumn::FirstName,
        GuardianColumn::LastNamePhonetic,
        GuardianColumn::FirstNamePhonetic,
        GuardianColumn::Username,
        GuardianColumn::Email,
        GuardianColumn::PhoneNumber,
        GuardianColumn::StudentEmail,
        GuardianColumn::Relationship,
        GuardianColumn::ParentTag,
        GuardianColumn::PrimaryPhoneNumber,
        GuardianColumn::SecondaryPhoneNumber,
        GuardianColumn::Remarks,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            GuardianColumn::ExternalUserId => "external_user_id",
            GuardianColumn::Name => "name",
            GuardianColumn::LastName => "last_name",
            GuardianColumn::FirstName => "first_name",
            GuardianColumn::LastNamePhonetic => "last_name_phonetic",
            GuardianColumn::FirstNamePhonetic => "first_name_phonetic",
            GuardianColumn::Username => "username",
            GuardianColumn::Email => "email",
            GuardianColumn::PhoneNumber => "phone_number",
            GuardianColumn::StudentEmail => "student_email",
            GuardianColumn::Relationship => "relationship",
            GuardianColumn::ParentTag => "parent_tag",
            GuardianColumn::PrimaryPhoneNumber => "primary_phone_number",
            GuardianColumn::SecondaryPhoneNumber => "secondary_phone_number",
            GuardianColumn::Remarks => "remarks",
        }
    }

    /// Resolve a header cell; matching ignores case and surrounding whitespace
    pub fn from_header(header: &str) -> Option<Self> {
        let normalized = header.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|column| column.header() == normalized)
    }
}

impl std::fmt::Display for GuardianColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.header())
    }
}

static ABSENT: FieldCell = FieldCell::Absent;

/// One decoded data row of the payload
#[derive(Debug, Clone, Default)]
pub struct ImportRow {
    /// Zero-based position among data rows (the header row is not counted)
    pub index: usize,
    cells: HashMap<GuardianColumn, FieldCell>,
}

impl ImportRow {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: HashMap::new(),
        }
    }

    pub fn with_cell(mut self, column: GuardianColumn, cell: FieldCell) -> Self {
        self.set(column, cell);
        self
    }

    pub fn set(&mut self, column: GuardianColumn, cell: FieldCell) {
        self.cells.insert(column, cell);
    }

    /// A column that was not part of the payload reads as `Absent`
    pub fn get(&self, column: GuardianColumn) -> &FieldCell {
        self.cells.get(&column).unwrap_or(&ABSENT)
    }

    /// Position as shown to users: 1-based, after the header row
    pub fn row_number(&self) -> usize {
        self.index + 2
    }
}
