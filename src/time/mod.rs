use chrono::{Local, SecondsFormat};

/// Returns the current local wall-clock time using a `strftime` pattern.
pub fn get_formatted_time(pattern: &str) -> String {
    Local::now().format(pattern).to_string()
}

/// Returns the current local time as ISO 8601 with microseconds and the UTC offset,
/// e.g. `2024-06-01T13:37:00.123456+02:00`.
pub fn get_iso8601_time() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
