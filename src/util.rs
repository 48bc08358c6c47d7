use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Resolve a local date + wall-clock time to a zone-aware DateTime, handling DST gaps.
///
/// During a spring-forward gap, `earliest()` returns `None`. We fall back to
/// `latest()` (the post-transition instant), and as a last resort use UTC.
pub fn resolve_local_datetime(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let naive = NaiveDateTime::new(date, time);

    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt;
    }

    // The wall-clock time was skipped. Shift forward an hour past the gap.
    let shifted = naive + chrono::Duration::hours(1);
    if let Some(dt) = tz.from_local_datetime(&shifted).latest() {
        log::warn!(
            "DST gap detected for {} in {}; using post-transition time",
            naive,
            tz
        );
        return dt;
    }

    log::warn!(
        "Could not resolve local datetime {} in {}; falling back to UTC",
        naive,
        tz
    );
    chrono::Utc.from_utc_datetime(&naive).with_timezone(tz)
}

/// Local midnight of `date`.
pub fn start_of_day(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    resolve_local_datetime(tz, date, NaiveTime::MIN)
}

/// Weekday index with Sunday = 0, matching the Hebrew week.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
