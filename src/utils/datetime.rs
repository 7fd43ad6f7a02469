use jiff::Timestamp;

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Whole hours between `published` and `now`, rounded and never below one.
/// A missing or future timestamp counts as "just published".
pub fn age_hours(published: Option<Timestamp>, now: Timestamp) -> i64 {
    let published = published.unwrap_or(now);
    let delta = now.as_second().saturating_sub(published.as_second());
    let hours = (delta as f64 / SECONDS_PER_HOUR).round() as i64;
    hours.max(1)
}

/// Short relative label such as "3h ago".
pub fn format_age(published: Option<Timestamp>, now: Timestamp) -> String {
    format!("{}h ago", age_hours(published, now))
}

/// Parse a provider timestamp (RFC 3339). Unparseable input yields `None`.
pub fn parse_published(raw: &str) -> Option<Timestamp> {
    raw.trim().parse::<Timestamp>().ok()
}
