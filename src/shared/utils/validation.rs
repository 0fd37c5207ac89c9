use regex::Regex;
use std::sync::LazyLock;

use crate::shared::errors::AppError;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

static PHONE_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{7,20}$").expect("phone number pattern compiles"));

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._\-]{4,50}$").expect("username pattern compiles"));

pub struct Validator;

impl Validator {
    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_PATTERN.is_match(email)
    }

    /// Digits only, 7 to 20 of them
    pub fn is_valid_phone_number(phone_number: &str) -> bool {
        PHONE_NUMBER_PATTERN.is_match(phone_number)
    }

    pub fn is_valid_username(username: &str) -> bool {
        USERNAME_PATTERN.is_match(username)
    }

    /// Locale-aware check using the numbering plan of the given region.
    ///
    /// `country_code` accepts either a bare ISO region (`JP`) or the
    /// prefixed form stored on organizations (`COUNTRY_JP`).
    pub fn is_valid_phone_for_country(phone_number: &str, country_code: &str) -> bool {
        let region = country_code
            .trim()
            .trim_start_matches("COUNTRY_")
            .to_uppercase();

        let Ok(country) = region.parse::<phonenumber::country::Id>() else {
            return false;
        };

        match phonenumber::parse(Some(country), phone_number) {
            Ok(parsed) => phonenumber::is_valid(&parsed),
            Err(_) => false,
        }
    }

    pub fn validate_organization_id(organization_id: &str) -> Result<(), AppError> {
        if organization_id.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Organization id cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
