use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(&self) -> &'static str {
        match self {
            Profile::Dev => "pocket-dev",
            Profile::Prod => "pocket",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "pocket-dev" instead of "pocket"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "pocket", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path
/// If profile is Dev, uses "pocket-dev" instead of "pocket"
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "pocket", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

/// Parse a user-entered moment into UTC.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM` / `YYYY-MM-DDTHH:MM` in the local zone,
/// or a bare `YYYY-MM-DD` meaning local midnight.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>, String> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| parse_date(input).ok().and_then(|d| d.and_hms_opt(0, 0, 0)))
        .ok_or_else(|| format!("Invalid date/time '{}': expected YYYY-MM-DD [HH:MM]", input))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| format!("'{}' does not exist in the local time zone", input))
}

/// Format an instant for display in the local zone
pub fn format_local(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_is_taken_verbatim() {
        let dt = parse_datetime("2025-03-01T09:30:00+02:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-01T07:30:00+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("tomorrow-ish").is_err());
        assert!(parse_date("2025-13-01").is_err());
    }

    #[test]
    fn expand_path_leaves_absolute_paths() {
        assert_eq!(expand_path("/var/lib/pocket.db"), PathBuf::from("/var/lib/pocket.db"));
    }
}
