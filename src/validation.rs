// ✅ Input validation - email, password, migration input
// Pure checks, no side effects. The strict migration policy builds on these.

use crate::error::MigrationError;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$")
        .unwrap()
});

// Any line terminator (\n, \r, NEL, LS, PS) disqualifies the password
static PASSWORD_LENGTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\n\r\x{85}\x{2028}\x{2029}]{8,}$").unwrap());

static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}-?[0-9]{3}$").unwrap());

/// local-part@domain.tld with a 2..7 letter TLD
pub fn validate_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// At least 8 characters, one uppercase letter and one digit
///
/// Length counts characters (code points), not bytes: "ção" is 3.
/// A password spanning more than one line is rejected.
pub fn validate_password(password: &str) -> bool {
    PASSWORD_LENGTH.is_match(password)
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
}

/// CEP shape: NNNNN-NNN or NNNNNNNN, ASCII digits only
pub fn validate_postal_code(postal_code: &str) -> bool {
    POSTAL_CODE.is_match(postal_code)
}

pub fn validate_customer_name(name: &str) -> bool {
    !name.trim().is_empty()
}

/// Checks applied by `MigrationPolicy::Strict` before any subsystem call
pub fn validate_migration_input(name: &str, postal_code: &str) -> Result<(), MigrationError> {
    if !validate_customer_name(name) {
        return Err(MigrationError::validation("name", "must not be blank"));
    }

    if !validate_postal_code(postal_code) {
        return Err(MigrationError::validation(
            "postal_code",
            format!("'{}' is not a CEP (expected NNNNN-NNN)", postal_code),
        ));
    }

    Ok(())
}
