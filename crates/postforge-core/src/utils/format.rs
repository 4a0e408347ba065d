use chrono::{DateTime, Utc};

/// Format an optional timestamp for display
pub fn format_datetime(value: &Option<DateTime<Utc>>) -> String {
    match value {
        Some(dt) => dt.format("%b %d, %Y").to_string(),
        None => "unknown".to_string(),
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}
