//! Input validation utilities

use crate::constants::{self, MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH, RESERVED_USERNAMES};

/// Validate username format
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let length = username.chars().count() as u64;
    if length < MIN_USERNAME_LENGTH {
        return Err("Username must be at least 3 characters long");
    }
    if length > MAX_USERNAME_LENGTH {
        return Err("Username must be 30 characters or less");
    }
    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username can only contain letters, numbers, underscores, and hyphens");
    }
    let lowered = username.to_lowercase();
    if RESERVED_USERNAMES.contains(&lowered.as_str()) {
        return Err("This username is reserved and cannot be used");
    }
    Ok(())
}

/// Validate user role
pub fn validate_role(role: &str) -> Result<(), &'static str> {
    if constants::roles::ALL.contains(&role) {
        Ok(())
    } else {
        Err("Invalid role")
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("stage-name").is_ok());
        assert!(validate_username("ab").is_err()); // Too short
        assert!(validate_username(&"a".repeat(31)).is_err()); // Too long
        assert!(validate_username("user@name").is_err()); // Invalid character
    }

    #[test]
    fn test_reserved_usernames_ignore_case() {
        assert!(validate_username("admin").is_err());
        assert!(validate_username("Support").is_err());
        assert!(validate_username("ROOT").is_err());
        assert!(validate_username("rooted").is_ok());
    }

    #[test]
    fn test_validate_role() {
        assert!(validate_role("member").is_ok());
        assert!(validate_role("admin").is_ok());
        assert!(validate_role("judge").is_err());
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  hi\u{0007} there \n"), "hi there");
    }
}
