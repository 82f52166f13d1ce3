pub mod validation;

pub use validation::{is_valid_email, validate_new_user, ValidatedBody, ValidationError};

use chrono::{DateTime, SecondsFormat, Utc};

/// `2024-03-01T12:30:00.000Z`
pub fn iso8601(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}
