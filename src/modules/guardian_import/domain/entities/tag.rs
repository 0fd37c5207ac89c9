use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagType {
    Parent,
    ParentDiscount,
    Student,
    StudentDiscount,
}

impl TagType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagType::Parent => "USER_TAG_TYPE_PARENT",
            TagType::ParentDiscount => "USER_TAG_TYPE_PARENT_DISCOUNT",
            TagType::Student => "USER_TAG_TYPE_STUDENT",
            TagType::StudentDiscount => "USER_TAG_TYPE_STUDENT_DISCOUNT",
        }
    }

    /// Only guardian tag types may be attached by this import
    pub fn is_guardian_type(&self) -> bool {
        matches!(self, TagType::Parent | TagType::ParentDiscount)
    }
}

impl std::str::FromStr for TagType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER_TAG_TYPE_PARENT" => Ok(TagType::Parent),
            "USER_TAG_TYPE_PARENT_DISCOUNT" => Ok(TagType::ParentDiscount),
            "USER_TAG_TYPE_STUDENT" => Ok(TagType::Student),
            "USER_TAG_TYPE_STUDENT_DISCOUNT" => Ok(TagType::StudentDiscount),
            _ => Err(format!("Invalid tag type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    /// Identifier used in the `parent_tag` column
    pub partner_internal_id: String,
    pub tag_type: TagType,
    pub is_archived: bool,
}

impl Tag {
    /// Attachable to a guardian right now
    pub fn is_assignable_to_guardian(&self) -> bool {
        !self.is_archived && self.tag_type.is_guardian_type()
    }
}

/// Tag association row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedUser {
    pub user_id: Uuid,
    pub tag_id: Uuid,
    pub organization_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(tag_type: TagType, is_archived: bool) -> Tag {
        Tag {
            id: Uuid::new_v4(),
            name: "Sibling discount".to_string(),
            partner_internal_id: "TAG-1".to_string(),
            tag_type,
            is_archived,
        }
    }

    #[test]
    fn test_guardian_tags_are_assignable() {
        assert!(tag(TagType::Parent, false).is_assignable_to_guardian());
        assert!(tag(TagType::ParentDiscount, false).is_assignable_to_guardian());
    }

    #[test]
    fn test_archived_or_student_tags_are_not_assignable() {
        assert!(!tag(TagType::Parent, true).is_assignable_to_guardian());
        assert!(!tag(TagType::Student, false).is_assignable_to_guardian());
    }

    #[test]
    fn test_tag_type_from_str() {
        assert_eq!(
            "USER_TAG_TYPE_PARENT_DISCOUNT".parse::<TagType>().unwrap(),
            TagType::ParentDiscount
        );
        assert!("USER_TAG_TYPE_UNKNOWN".parse::<TagType>().is_err());
    }
}
