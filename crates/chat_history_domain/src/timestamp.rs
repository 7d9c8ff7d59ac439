use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Parses the timestamp forms chat clients send: RFC 3339, ISO 8601 with or
/// without an offset (no offset means UTC), or a bare calendar date.
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = OffsetDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(parsed.assume_utc());
    }
    Date::parse(value, &Iso8601::DEFAULT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

pub fn is_valid_timestamp(value: &str) -> bool {
    parse_timestamp(value).is_some()
}

/// RFC 3339 in UTC, truncated to milliseconds.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(UtcOffset::UTC);
    let at = at
        .replace_nanosecond(u32::from(at.millisecond()) * 1_000_000)
        .unwrap_or(at);
    at.format(&Rfc3339).unwrap_or_default()
}

pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

pub fn unix_millis_now() -> u64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    u64::try_from(nanos / 1_000_000).unwrap_or_default()
}
