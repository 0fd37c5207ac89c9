/// Who is importing, and for which organization.
///
/// Passed explicitly through every stage; nothing reads tenant state from
/// ambient request context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportContext {
    pub organization_id: String,
    /// Organization default country, e.g. `COUNTRY_JP`
    pub country_code: String,
    /// Guardians sign in with a username instead of their email
    pub username_login_enabled: bool,
    pub importer_id: String,
}

impl ImportContext {
    pub fn new(organization_id: &str, country_code: &str, importer_id: &str) -> Self {
        Self {
            organization_id: organization_id.to_string(),
            country_code: country_code.to_string(),
            username_login_enabled: false,
            importer_id: importer_id.to_string(),
        }
    }

    pub fn with_username_login(mut self, enabled: bool) -> Self {
        self.username_login_enabled = enabled;
        self
    }
}
