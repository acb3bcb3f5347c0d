use crate::error::{AppError, Result};

/// Validates the login payload shape. Deliberately minimal: anything
/// beyond presence checks would leak which field was wrong.
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::InvalidCredentials);
    }

    if email.len() > 255 || password.len() > 128 {
        return Err(AppError::InvalidCredentials);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_fields() {
        assert!(validate_login("", "secret").is_err());
        assert!(validate_login("a@b.c", "").is_err());
        assert!(validate_login("  ", "secret").is_err());
    }

    #[test]
    fn accepts_plausible_input() {
        assert!(validate_login("admin@example.com", "secret").is_ok());
    }

    #[test]
    fn rejects_oversized_input() {
        let long = "x".repeat(300);
        assert!(validate_login(&long, "secret").is_err());
        assert!(validate_login("a@b.c", &long).is_err());
    }
}
