use serde::{Deserialize, Serialize};

/// Relationship of a guardian to a student, as coded in the import template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FamilyRelationship {
    Father,
    Mother,
    Grandfather,
    Grandmother,
    Uncle,
    Aunt,
    Other,
}

impl FamilyRelationship {
    /// Numeric template code; 0 (unset) and unknown codes yield `None`
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(FamilyRelationship::Father),
            2 => Some(FamilyRelationship::Mother),
            3 => Some(FamilyRelationship::Grandfather),
            4 => Some(FamilyRelationship::Grandmother),
            5 => Some(FamilyRelationship::Uncle),
            6 => Some(FamilyRelationship::Aunt),
            7 => Some(FamilyRelationship::Other),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            FamilyRelationship::Father => 1,
            FamilyRelationship::Mother => 2,
            FamilyRelationship::Grandfather => 3,
            FamilyRelationship::Grandmother => 4,
            FamilyRelationship::Uncle => 5,
            FamilyRelationship::Aunt => 6,
            FamilyRelationship::Other => 7,
        }
    }

    /// Parse one token of the `relationship` column
    pub fn parse_token(token: &str) -> Option<Self> {
        token.trim().parse::<i32>().ok().and_then(Self::from_code)
    }

    /// Stored form
    pub fn as_str(&self) -> &'static str {
        match self {
            FamilyRelationship::Father => "FAMILY_RELATIONSHIP_FATHER",
            FamilyRelationship::Mother => "FAMILY_RELATIONSHIP_MOTHER",
            FamilyRelationship::Grandfather => "FAMILY_RELATIONSHIP_GRANDFATHER",
            FamilyRelationship::Grandmother => "FAMILY_RELATIONSHIP_GRANDMOTHER",
            FamilyRelationship::Uncle => "FAMILY_RELATIONSHIP_UNCLE",
            FamilyRelationship::Aunt => "FAMILY_RELATIONSHIP_AUNT",
            FamilyRelationship::Other => "FAMILY_RELATIONSHIP_OTHER",
        }
    }
}

impl std::fmt::Display for FamilyRelationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
