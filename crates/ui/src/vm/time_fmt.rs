use chrono::{DateTime, Utc};

/// Short UTC stamp for completion lists.
#[must_use]
pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d %H:%M UTC").to_string()
}
