//! Syntactic validation for the signup form.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating usernames (letters, digits, spaces and a few
    /// separators; must start with a letter or digit)
    static ref USERNAME_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9][A-Za-z0-9 ._-]*$"
    ).unwrap();

    /// Regex for validating email addresses (syntactic check only)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$"
    ).unwrap();
}

/// Validate a username
pub fn validate_username(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Username is required".to_string());
    }

    if name.len() > 100 {
        return Err("Username is too long (max 100 characters)".to_string());
    }

    if !USERNAME_REGEX.is_match(name) {
        return Err(
            "Username may contain letters, digits, spaces, dots, dashes and underscores"
                .to_string(),
        );
    }

    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 100 {
        return Err("Email is too long (max 100 characters)".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters".to_string());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("parth").is_ok());
        assert!(validate_username("Jane Doe").is_ok());
        assert!(validate_username("user_42").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("-leading-dash").is_err());
        assert!(validate_username(&"x".repeat(101)).is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("first.last+tag@example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn password_rules() {
        assert!(validate_password("12345678").is_ok());
        assert!(validate_password("1234567").is_err());
    }
}
