//! Common validation utilities.

use validator::ValidationError;

/// Minimum username length in characters.
pub const USERNAME_MIN_LENGTH: usize = 2;

/// Maximum username length in characters.
pub const USERNAME_MAX_LENGTH: usize = 20;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LENGTH: usize = 8;

lazy_static::lazy_static! {
    static ref USERNAME_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9._]+$").unwrap();
}

/// Normalizes a username as typed by a user: trims whitespace and lower-cases it.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Validates a normalized username.
///
/// Usernames may only contain lower-case latin letters, digits, dots and
/// underscores, and must be 2 to 20 characters long.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        let mut err = ValidationError::new("username_charset");
        err.message = Some(
            "Username may only contain latin letters, digits, dots and underscores".into(),
        );
        return Err(err);
    }

    let length = username.chars().count();
    if length < USERNAME_MIN_LENGTH {
        let mut err = ValidationError::new("username_too_short");
        err.message = Some("Username must be at least 2 characters long".into());
        return Err(err);
    }

    if length > USERNAME_MAX_LENGTH {
        let mut err = ValidationError::new("username_too_long");
        err.message = Some("Username must not be longer than 20 characters".into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a (trimmed) password is long enough.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() >= PASSWORD_MIN_LENGTH {
        Ok(())
    } else {
        let mut err = ValidationError::new("password_too_short");
        err.message = Some("Password must be at least 8 characters long".into());
        Err(err)
    }
}

/// Returns the human-readable message of a validation error.
pub fn error_message(err: &ValidationError) -> String {
    err.message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Liisa.K "), "liisa.k");
        assert_eq!(normalize_username("HAUG"), "haug");
    }

    #[test]
    fn test_validate_username_valid() {
        assert!(validate_username("liisa").is_ok());
        assert!(validate_username("a_b.c9").is_ok());
        assert!(validate_username("ab").is_ok());
        assert!(validate_username(&"x".repeat(20)).is_ok());
    }

    #[test]
    fn test_validate_username_invalid_characters() {
        for name in ["Liisa", "li isa", "liisa!", "mäger", "li-isa", ""] {
            let err = validate_username(name).unwrap_err();
            assert_eq!(err.code, "username_charset", "name {:?}", name);
        }
    }

    #[test]
    fn test_validate_username_length_bounds() {
        assert_eq!(validate_username("a").unwrap_err().code, "username_too_short");
        assert_eq!(
            validate_username(&"a".repeat(21)).unwrap_err().code,
            "username_too_long"
        );
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_error_message() {
        let err = validate_password("short").unwrap_err();
        assert_eq!(
            error_message(&err),
            "Password must be at least 8 characters long"
        );
        assert_eq!(error_message(&ValidationError::new("bare")), "bare");
    }
}
