//! Time-zone resolution and display formatting.

use chrono::Utc;
use chrono_tz::Tz;

use crate::types::Timestamp;

/// Zone the expo itself runs in.
pub const EXPO_TIME_ZONE: &str = "America/New_York";

/// Fixed zone choices offered next to the client's own zone.
pub const TIME_ZONE_CHOICES: &[(&str, &str)] = &[
    ("America/New_York", "Expo time (America/New_York)"),
    ("America/Chicago", "America/Chicago"),
    ("America/Denver", "America/Denver"),
    ("America/Los_Angeles", "America/Los_Angeles"),
    ("UTC", "UTC"),
];

/// Pick the zone to display times in.
///
/// Order: `requested` if it names a valid IANA zone, then `local`, then UTC.
/// Blank strings count as absent.
pub fn resolve_time_zone(requested: Option<&str>, local: Option<&str>) -> Tz {
    [requested, local]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .find_map(|name| name.parse::<Tz>().ok())
        .unwrap_or(Tz::UTC)
}

/// Medium date, short time: `Mar 1, 2024, 9:00 AM`.
pub fn format_medium(ts: Timestamp, tz: Tz) -> String {
    ts.with_timezone(&tz)
        .format("%b %-d, %Y, %-I:%M %p")
        .to_string()
}

/// Full date, short time: `Friday, March 1, 2024 at 9:00 AM`.
pub fn format_full(ts: Timestamp, tz: Tz) -> String {
    ts.with_timezone(&tz)
        .format("%A, %B %-d, %Y at %-I:%M %p")
        .to_string()
}

/// UTC basic-format timestamp used by iCalendar: `20240301T140000Z`.
pub fn to_ics_utc(ts: Timestamp) -> String {
    ts.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string()
}
