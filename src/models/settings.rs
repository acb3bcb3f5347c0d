use serde::Serialize;

/// Session duration used when no settings row exists or the store is
/// unreachable.
pub const DEFAULT_SESSION_DURATION_SECS: i64 = 3600;
/// Theme color used when no settings row exists.
pub const DEFAULT_PRIMARY_COLOR: &str = "teal";

/// The singleton settings row. `session_duration` is stored in seconds;
/// the external representation is hours (see [`SettingsView`]).
#[derive(Clone, Debug)]
pub struct Settings {
    pub id: i32,
    pub primary_color: String,
    pub session_duration: i64,
}

impl Settings {
    /// Converts to the external representation (duration in whole hours).
    pub fn to_view(&self) -> SettingsView {
        SettingsView {
            primary_color: self.primary_color.clone(),
            session_duration: self.session_duration / 3600,
        }
    }
}

/// Settings as exposed to callers: duration in hours, not seconds.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsView {
    pub primary_color: String,
    pub session_duration: i64,
}

/// Converts a validated hour count to the internally stored seconds.
pub fn hours_to_seconds(hours: i64) -> i64 {
    hours * 3600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_round_trips_through_hours() {
        let stored = hours_to_seconds(4);
        assert_eq!(stored, 14400);
        let settings = Settings {
            id: 1,
            primary_color: "teal".to_string(),
            session_duration: stored,
        };
        assert_eq!(settings.to_view().session_duration, 4);
    }

    #[test]
    fn view_floors_partial_hours() {
        let settings = Settings {
            id: 1,
            primary_color: "teal".to_string(),
            session_duration: 5400,
        };
        assert_eq!(settings.to_view().session_duration, 1);
    }
}
