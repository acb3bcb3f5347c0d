use crate::error::{AppError, Result};

/// Colors the theme system knows how to render.
pub const VALID_COLORS: &[&str] = &[
    "teal", "blue", "green", "purple", "pink", "orange", "red", "indigo",
];

/// The allowed session duration range, in hours.
pub const MIN_SESSION_HOURS: i64 = 1;
pub const MAX_SESSION_HOURS: i64 = 12;

/// Validates a theme color name.
pub fn validate_primary_color(color: &str) -> Result<()> {
    if !VALID_COLORS.contains(&color) {
        return Err(AppError::Validation("Invalid primary color".to_string()));
    }
    Ok(())
}

/// Validates an incoming session duration, expressed in hours. Runs
/// before the hours-to-seconds conversion so out-of-range values never
/// reach the store.
pub fn validate_session_duration_hours(hours: i64) -> Result<()> {
    if !(MIN_SESSION_HOURS..=MAX_SESSION_HOURS).contains(&hours) {
        return Err(AppError::Validation(
            "Session duration must be between 1 and 12 hours".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_durations() {
        assert!(validate_session_duration_hours(0).is_err());
        assert!(validate_session_duration_hours(13).is_err());
        assert!(validate_session_duration_hours(-1).is_err());
    }

    #[test]
    fn accepts_range_boundaries() {
        assert!(validate_session_duration_hours(1).is_ok());
        assert!(validate_session_duration_hours(12).is_ok());
    }

    #[test]
    fn checks_color_against_palette() {
        assert!(validate_primary_color("teal").is_ok());
        assert!(validate_primary_color("indigo").is_ok());
        assert!(validate_primary_color("mauve").is_err());
        assert!(validate_primary_color("").is_err());
    }
}
