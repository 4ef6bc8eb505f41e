use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};

// ── Weekdays ──────────────────────────────────────────────────────────────────

/// English weekday labels, Sunday first.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Column position of `ts`'s weekday in [`WEEKDAY_NAMES`].
pub fn weekday_index(ts: &NaiveDateTime) -> usize {
    ts.weekday().num_days_from_sunday() as usize
}

/// English name of `ts`'s weekday, e.g. `"Wednesday"`.
pub fn weekday_name(ts: &NaiveDateTime) -> &'static str {
    WEEKDAY_NAMES[weekday_index(ts)]
}

// ── Timestamp assembly ────────────────────────────────────────────────────────

/// Combine the digit groups of a `day/month/year hour:minute` stamp.
///
/// The year is taken literally, so `"23"` means the year 23. Returns `None`
/// when the groups do not form a real calendar date and wall-clock time.
pub fn build_timestamp(
    day: u32,
    month: u32,
    year: i32,
    hour: u32,
    minute: u32,
) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_opt(hour, minute, 0)?;
    Some(NaiveDateTime::new(date, time))
}

/// Parse the textual groups captured from a chat line.
///
/// Any group that is not plain ASCII digits yields `None`.
pub fn timestamp_from_parts(
    day: &str,
    month: &str,
    year: &str,
    hour: &str,
    minute: &str,
) -> Option<NaiveDateTime> {
    build_timestamp(
        day.parse().ok()?,
        month.parse().ok()?,
        year.parse().ok()?,
        hour.parse().ok()?,
        minute.parse().ok()?,
    )
}
