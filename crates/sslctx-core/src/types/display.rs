//! Display normalization for untrusted certificate fields.

use chrono::{DateTime, Local, TimeZone, Utc};
use std::fmt;

/// Label used when a distinguished name has no `CN=` component
pub const UNKNOWN_COMMON_NAME: &str = "Unknown common name";

/// `YYYY-MM-DD HH:mm:ss`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Extract the common name from a distinguished name.
///
/// Takes the first comma-separated component starting with `CN=`. DNs come
/// from remote peers, so a missing CN yields [`UNKNOWN_COMMON_NAME`].
#[must_use]
pub fn parse_common_name(dn: &str) -> &str {
    dn.split(',')
        .map(str::trim)
        .find_map(|component| component.strip_prefix("CN="))
        .map_or(UNKNOWN_COMMON_NAME, str::trim)
}

/// Render an instant as `YYYY-MM-DD HH:mm:ss` in the given time zone
pub fn format_timestamp<Tz>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    instant.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string()
}

/// Render an instant as `YYYY-MM-DD HH:mm:ss` in the local time zone
#[must_use]
pub fn format_local_timestamp(instant: &DateTime<Utc>) -> String {
    format_timestamp(instant, &Local)
}
