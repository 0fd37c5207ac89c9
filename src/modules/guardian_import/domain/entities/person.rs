use uuid::Uuid;

use super::field_cell::FieldCell;

/// User group every imported guardian belongs to
pub const GUARDIAN_USER_GROUP: &str = "USER_GROUP_PARENT";

/// A guardian about to be created
#[derive(Debug, Clone, PartialEq)]
pub struct PersonRecord {
    /// Pre-generated; replaced by the store's durable id when emails are reserved
    pub id: Uuid,
    pub organization_id: String,
    pub email: String,
    pub username: String,
    pub login_email: String,
    pub external_user_id: FieldCell,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub first_name_phonetic: FieldCell,
    pub last_name_phonetic: FieldCell,
    pub full_name_phonetic: FieldCell,
    /// Legacy single phone column
    pub phone_number: FieldCell,
    pub country: String,
    pub remarks: FieldCell,
}

impl PersonRecord {
    pub fn user_group(&self) -> &'static str {
        GUARDIAN_USER_GROUP
    }

    /// Lower-cased email, the key used for case-insensitive uniqueness
    pub fn email_key(&self) -> String {
        self.email.to_lowercase()
    }

    /// Point a generated `<id>@<domain>` login email at the current id
    pub fn rebind_generated_login_email(&mut self) {
        if let Some((_, domain)) = self.login_email.split_once('@') {
            self.login_email = format!("{}@{}", self.id, domain);
        }
    }
}

/// `last first`, collapsing the gap when either part is blank
pub fn combine_full_name(last_name: &str, first_name: &str) -> String {
    format!("{} {}", last_name.trim(), first_name.trim())
        .trim()
        .to_string()
}

/// Split a legacy single-cell name: the first token is the last name,
/// the remainder the first name
pub fn split_full_name(full_name: &str) -> (String, String) {
    let trimmed = full_name.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((last, first)) => (last.to_string(), first.trim().to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// Phonetic full name follows the presence of its parts: any value wins,
/// otherwise `Empty` if a phonetic column was supplied, otherwise `Absent`
pub fn combine_phonetic_name(last: &FieldCell, first: &FieldCell) -> FieldCell {
    match (last.as_str(), first.as_str()) {
        (None, None) if last.is_absent() && first.is_absent() => FieldCell::Absent,
        (None, None) => FieldCell::Empty,
        (l, f) => FieldCell::value(combine_full_name(l.unwrap_or(""), f.unwrap_or(""))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_full_name() {
        assert_eq!(combine_full_name("Tanaka", "Hanako"), "Tanaka Hanako");
        assert_eq!(combine_full_name("Tanaka", ""), "Tanaka");
        assert_eq!(combine_full_name(" ", "Hanako"), "Hanako");
    }

    #[test]
    fn test_split_full_name() {
        assert_eq!(
            split_full_name("Tanaka Hanako"),
            ("Tanaka".to_string(), "Hanako".to_string())
        );
        assert_eq!(
            split_full_name("  Smith  Mary Ann "),
            ("Smith".to_string(), "Mary Ann".to_string())
        );
        assert_eq!(split_full_name("Cher"), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn test_rebind_generated_login_email_keeps_domain() {
        let mut person = PersonRecord {
            id: Uuid::new_v4(),
            organization_id: "org-1".to_string(),
            email: "parent@example.com".to_string(),
            username: "parent.one".to_string(),
            login_email: format!("{}@login.example", Uuid::new_v4()),
            external_user_id: FieldCell::Absent,
            full_name: "Tanaka Hanako".to_string(),
            first_name: "Hanako".to_string(),
            last_name: "Tanaka".to_string(),
            first_name_phonetic: FieldCell::Absent,
            last_name_phonetic: FieldCell::Absent,
            full_name_phonetic: FieldCell::Absent,
            phone_number: FieldCell::Absent,
            country: "JP".to_string(),
            remarks: FieldCell::Absent,
        };

        person.rebind_generated_login_email();

        assert_eq!(person.login_email, format!("{}@login.example", person.id));
    }

    #[test]
    fn test_combine_phonetic_name() {
        assert_eq!(
            combine_phonetic_name(&FieldCell::Absent, &FieldCell::Absent),
            FieldCell::Absent
        );
        assert_eq!(
            combine_phonetic_name(&FieldCell::Empty, &FieldCell::Absent),
            FieldCell::Empty
        );
        assert_eq!(
            combine_phonetic_name(&FieldCell::value("タナカ"), &FieldCell::Empty),
            FieldCell::value("タナカ")
        );
        assert_eq!(
            combine_phonetic_name(&FieldCell::value("タナカ"), &FieldCell::value("ハナコ")),
            FieldCell::value("タナカ ハナコ")
        );
    }
}
