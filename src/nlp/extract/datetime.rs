//! Date and time slots.
//!
//! Dates resolve against an injected `today`; nothing here reads the clock.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::nlp::constants::{self, NEXT_MARKERS, RELATIVE_DAYS, WEEKDAYS};
use crate::nlp::tokenize::{re_numeric_date, re_time};
use crate::types::{Token, TokenType};
use crate::util::{resolve_local_datetime, start_of_day, weekday_index};

/// Date and wall-clock times mentioned in a command, before zone resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateTimeSlot {
    pub date: Option<NaiveDate>,
    pub start: Option<NaiveTime>,
    pub end: Option<NaiveTime>,
    /// `כל היום` / `יום מלא`
    pub all_day: bool,
}

impl DateTimeSlot {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.start.is_none() && !self.all_day
    }
}

enum DateMention {
    Day(NaiveDate),
    /// Weekday without `הבא`; resolved the same way but flagged.
    GuessedWeekday(NaiveDate),
    AllDay,
    Invalid,
}

pub fn extract_datetime(tokens: &[Token], today: NaiveDate, warnings: &mut Vec<String>) -> DateTimeSlot {
    let mut slot = DateTimeSlot::default();

    for token in tokens {
        match token.kind {
            TokenType::Date => match parse_date(&token.text, today) {
                DateMention::AllDay => slot.all_day = true,
                DateMention::Invalid => {
                    warnings.push(format!("תאריך לא תקין \"{}\" התעלם", token.text));
                }
                DateMention::Day(date) | DateMention::GuessedWeekday(date)
                    if slot.date.is_some() =>
                {
                    log::debug!("Ignoring extra date {} ({})", token.text, date);
                    warnings.push(format!("התאריך הנוסף \"{}\" התעלם", token.text));
                }
                DateMention::Day(date) => slot.date = Some(date),
                DateMention::GuessedWeekday(date) => {
                    warnings.push(format!(
                        "\"{}\" פורש כ-{}; ציין \"הבא\" לדיוק",
                        token.text,
                        date.format("%d.%m.%Y")
                    ));
                    slot.date = Some(date);
                }
            },
            TokenType::Time => match parse_time(&token.text) {
                Some((start, Some(end))) => {
                    if slot.start.is_some() {
                        warnings.push(format!("טווח השעות הנוסף \"{}\" התעלם", token.text));
                    } else {
                        slot.start = Some(start);
                        slot.end = Some(end);
                    }
                }
                Some((time, None)) => {
                    if slot.start.is_none() {
                        slot.start = Some(time);
                    } else if slot.end.is_none() {
                        slot.end = Some(time);
                    } else {
                        warnings.push(format!("השעה הנוספת \"{}\" התעלמה", token.text));
                    }
                }
                None => warnings.push(format!("שעה לא תקינה \"{}\" התעלמה", token.text)),
            },
            _ => {}
        }
    }

    slot
}

fn parse_date(text: &str, today: NaiveDate) -> DateMention {
    if let Some(parts) = numeric_date_parts(text) {
        return match resolve_day_month(parts, today) {
            Some(date) => DateMention::Day(date),
            None => DateMention::Invalid,
        };
    }

    if let Some(offset) = constants::lookup(RELATIVE_DAYS, text) {
        return DateMention::Day(today + Duration::days(offset));
    }

    if text == "כל היום" || text == "יום מלא" {
        return DateMention::AllDay;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let weekday = words
        .iter()
        .find_map(|w| constants::weekday_of(w));
    let Some(weekday) = weekday else {
        return DateMention::Invalid;
    };

    let date = next_weekday(today, weekday);
    if words.iter().any(|w| NEXT_MARKERS.contains(w)) {
        DateMention::Day(date)
    } else {
        DateMention::GuessedWeekday(date)
    }
}

/// Day, month and optional year of a `D.M[.Y]` word.
pub type DateParts = (u32, u32, Option<i32>);

pub fn numeric_date_parts(text: &str) -> Option<DateParts> {
    let caps = re_numeric_date().captures(text)?;
    let day = caps[1].parse().ok()?;
    let month = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        Some(y) if y.as_str().len() == 2 => Some(2000 + y.as_str().parse::<i32>().ok()?),
        Some(y) => Some(y.as_str().parse().ok()?),
        None => None,
    };
    Some((day, month, year))
}

/// Resolve `D.M[.Y]`. Without a year the date is this year's, or next
/// year's once it has already passed `reference`.
pub fn resolve_day_month((day, month, year): DateParts, reference: NaiveDate) -> Option<NaiveDate> {
    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }
    let this_year = NaiveDate::from_ymd_opt(reference.year(), month, day)?;
    if this_year < reference {
        NaiveDate::from_ymd_opt(reference.year() + 1, month, day)
    } else {
        Some(this_year)
    }
}

/// Next occurrence of `weekday` strictly after `today`.
pub fn next_weekday(today: NaiveDate, weekday: u8) -> NaiveDate {
    let current = weekday_index(today) as i64;
    let mut days = (weekday as i64 - current).rem_euclid(7);
    if days == 0 {
        days = 7;
    }
    today + Duration::days(days)
}

/// Start time and optional end of a time token (`ל-15:00`, `14:00-15:30`).
pub fn parse_time(text: &str) -> Option<(NaiveTime, Option<NaiveTime>)> {
    let caps = re_time().captures(text)?;
    let start = hm(&caps[1], &caps[2])?;
    let end = match (caps.get(3), caps.get(4)) {
        (Some(h), Some(m)) => Some(hm(h.as_str(), m.as_str())?),
        _ => None,
    };
    Some((start, end))
}

fn hm(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

/// Zone-aware start and end. An end at or before the start runs past
/// midnight; without an end the event lasts `duration_minutes`.
pub fn resolve_span(
    tz: &Tz,
    date: NaiveDate,
    start: NaiveTime,
    end: Option<NaiveTime>,
    duration_minutes: u32,
) -> (DateTime<Tz>, DateTime<Tz>) {
    let start_dt = resolve_local_datetime(tz, date, start);
    let end_dt = match end {
        Some(end) => {
            let end_date = if end <= start {
                date + Duration::days(1)
            } else {
                date
            };
            resolve_local_datetime(tz, end_date, end)
        }
        None => start_dt + Duration::minutes(duration_minutes as i64),
    };
    (start_dt, end_dt)
}

/// Local midnight to the following midnight.
pub fn all_day_span(tz: &Tz, date: NaiveDate) -> (DateTime<Tz>, DateTime<Tz>) {
    (
        start_of_day(tz, date),
        start_of_day(tz, date + Duration::days(1)),
    )
}

/// Hebrew weekday name for index 0–6.
pub fn weekday_name(weekday: u8) -> Option<&'static str> {
    WEEKDAYS
        .iter()
        .find(|(_, idx)| *idx == weekday)
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalize::normalize;
    use crate::nlp::tokenize::tokenize;
    use chrono::{TimeZone, Timelike};

    /// Tuesday
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    fn extract(text: &str) -> (DateTimeSlot, Vec<String>) {
        let tokens = tokenize(&normalize(text));
        let mut warnings = Vec::new();
        let slot = extract_datetime(&tokens, today(), &mut warnings);
        (slot, warnings)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_relative_days() {
        assert_eq!(extract("מחר").0.date, Some(date(2026, 3, 11)));
        assert_eq!(extract("מחרתיים").0.date, Some(date(2026, 3, 12)));
        assert_eq!(extract("היום").0.date, Some(today()));
    }

    #[test]
    fn test_next_weekday_is_strictly_after_today() {
        // Today is Tuesday, so next Tuesday is a week away.
        let (slot, warnings) = extract("שלישי הבא");
        assert_eq!(slot.date, Some(date(2026, 3, 17)));
        assert!(warnings.is_empty());

        let (slot, _) = extract("יום חמישי הבא");
        assert_eq!(slot.date, Some(date(2026, 3, 12)));
    }

    #[test]
    fn test_weekday_without_next_marker_warns() {
        let (slot, warnings) = extract("ביום רביעי");
        assert_eq!(slot.date, Some(date(2026, 3, 11)));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("הבא"));
    }

    #[test]
    fn test_day_month_rolls_to_next_year() {
        assert_eq!(extract("31.12").0.date, Some(date(2026, 12, 31)));
        assert_eq!(extract("1.2").0.date, Some(date(2027, 2, 1)));
        assert_eq!(extract("10.3").0.date, Some(today()));
        assert_eq!(extract("5.1.28").0.date, Some(date(2028, 1, 5)));
    }

    #[test]
    fn test_invalid_date_is_ignored_with_warning() {
        let (slot, warnings) = extract("31.2 פגישה");
        assert_eq!(slot.date, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_extra_dates_are_ignored() {
        let (slot, warnings) = extract("מחר 31.12");
        assert_eq!(slot.date, Some(date(2026, 3, 11)));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_time_range_and_two_single_times() {
        let (slot, _) = extract("14:00-15:30");
        assert_eq!(slot.start, Some(time(14, 0)));
        assert_eq!(slot.end, Some(time(15, 30)));

        let (slot, _) = extract("מ-10:00 עד 11:15");
        assert_eq!(slot.start, Some(time(10, 0)));
        assert_eq!(slot.end, Some(time(11, 15)));
    }

    #[test]
    fn test_invalid_time_is_ignored() {
        let (slot, warnings) = extract("25:00");
        assert_eq!(slot.start, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_all_day_marker() {
        let (slot, _) = extract("15.11 יום מלא");
        assert!(slot.all_day);
        assert_eq!(slot.date, Some(date(2026, 11, 15)));
        assert_eq!(slot.start, None);
    }

    #[test]
    fn test_overnight_range_ends_next_day() {
        let tz = chrono_tz::Asia::Jerusalem;
        let (start, end) = resolve_span(&tz, today(), time(23, 0), Some(time(1, 0)), 60);
        assert_eq!(start, tz.with_ymd_and_hms(2026, 3, 10, 23, 0, 0).unwrap());
        assert_eq!(end, tz.with_ymd_and_hms(2026, 3, 11, 1, 0, 0).unwrap());
    }

    #[test]
    fn test_single_time_uses_duration() {
        let tz = chrono_tz::Asia::Jerusalem;
        let (start, end) = resolve_span(&tz, today(), time(9, 0), None, 90);
        assert_eq!(start.hour(), 9);
        assert_eq!(end.hour(), 10);
        assert_eq!(end.minute(), 30);
    }

    #[test]
    fn test_all_day_span_covers_local_day() {
        let tz = chrono_tz::Asia::Jerusalem;
        let (start, end) = all_day_span(&tz, date(2026, 11, 15));
        assert_eq!(start, tz.with_ymd_and_hms(2026, 11, 15, 0, 0, 0).unwrap());
        assert_eq!(end, tz.with_ymd_and_hms(2026, 11, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(2), Some("שלישי"));
        assert_eq!(weekday_name(7), None);
    }
}
