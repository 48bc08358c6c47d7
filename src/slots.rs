//! Free-slot suggestions over a caller-supplied list of busy events.
//!
//! Each local day in the search range is clipped to working hours (or the
//! requested part of day), busy intervals are merged, and every gap long
//! enough yields one slot starting at its first aligned instant.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::config::NlpConfig;
use crate::error::NlpError;
use crate::types::{CandidateEvent, SuggestSlotsOptions, TimeSlot};
use crate::util::{resolve_local_datetime, start_of_day};

type Interval = (DateTime<Tz>, DateTime<Tz>);

pub fn suggest_slots(
    busy: &[CandidateEvent],
    options: &SuggestSlotsOptions,
    now: DateTime<FixedOffset>,
    config: &NlpConfig,
) -> Result<Vec<TimeSlot>, NlpError> {
    let tz = config.tz();
    let duration = options
        .duration_minutes
        .unwrap_or(config.default_duration_minutes);
    if duration == 0 {
        return Err(NlpError::InvalidTimeRange);
    }

    let time_min = options.time_min.unwrap_or(now).with_timezone(&tz);
    let time_max = match options.time_max {
        Some(max) => max.with_timezone(&tz),
        None => time_min
            .checked_add_signed(Duration::days(config.slots.default_search_days as i64))
            .ok_or(NlpError::InvalidTimeRange)?,
    };
    if time_max <= time_min {
        return Err(NlpError::InvalidTimeRange);
    }

    let max_suggestions = options
        .max_suggestions
        .unwrap_or(config.slots.default_max_suggestions);
    let (day_start_hour, day_end_hour) = match options.part_of_day {
        Some(part) => part.hours(),
        None => (
            config.slots.work_hours_start as u32,
            config.slots.work_hours_end as u32,
        ),
    };
    let granularity = config.slots.granularity_minutes.max(1);

    let intervals: Vec<Interval> = busy
        .iter()
        .map(|e| (e.start.with_timezone(&tz), e.end.with_timezone(&tz)))
        .filter(|(start, end)| end > start)
        .collect();
    let merged = merge_intervals(intervals);

    let mut suggestions = Vec::new();
    let mut day = time_min.date_naive();
    let last_day = time_max.date_naive();

    while day <= last_day && suggestions.len() < max_suggestions {
        let window_start = local_hour(&tz, day, day_start_hour).max(time_min);
        let window_end = local_hour(&tz, day, day_end_hour).min(time_max);

        if window_end > window_start {
            for (gap_start, gap_end) in free_gaps(&merged, window_start, window_end) {
                let start = align_up(gap_start, granularity);
                let end = start + Duration::minutes(duration as i64);
                if end <= gap_end {
                    suggestions.push(TimeSlot {
                        start: start.fixed_offset(),
                        end: end.fixed_offset(),
                        length_minutes: duration,
                    });
                    if suggestions.len() >= max_suggestions {
                        break;
                    }
                }
            }
        }

        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    log::debug!(
        "Suggested {} slots of {} minutes between {} and {}",
        suggestions.len(),
        duration,
        time_min,
        time_max
    );
    Ok(suggestions)
}

/// Local `hour:00` on `date`; hour 24 is the next midnight.
fn local_hour(tz: &Tz, date: NaiveDate, hour: u32) -> DateTime<Tz> {
    match NaiveTime::from_hms_opt(hour, 0, 0) {
        Some(time) => resolve_local_datetime(tz, date, time),
        None => start_of_day(tz, date + Duration::days(1)),
    }
}

fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.sort_by_key(|(start, _)| *start);
    let mut merged: Vec<Interval> = Vec::new();

    for (start, end) in intervals {
        if let Some((_, current_end)) = merged.last_mut() {
            if start <= *current_end {
                if end > *current_end {
                    *current_end = end;
                }
                continue;
            }
        }
        merged.push((start, end));
    }

    merged
}

/// Free intervals inside `[window_start, window_end)` given merged busy time.
fn free_gaps(busy: &[Interval], window_start: DateTime<Tz>, window_end: DateTime<Tz>) -> Vec<Interval> {
    let mut gaps = Vec::new();
    let mut cursor = window_start;

    for (start, end) in busy {
        if *end <= window_start || *start >= window_end {
            continue;
        }
        if *start > cursor {
            gaps.push((cursor, (*start).min(window_end)));
        }
        if *end > cursor {
            cursor = *end;
        }
    }

    if window_end > cursor {
        gaps.push((cursor, window_end));
    }
    gaps
}

/// Round up to the next multiple of `minutes` past local midnight.
fn align_up(dt: DateTime<Tz>, minutes: u32) -> DateTime<Tz> {
    let dt = dt.with_nanosecond(0).unwrap_or(dt);
    let step = minutes as i64 * 60;
    let remainder = dt.num_seconds_from_midnight() as i64 % step;
    if remainder == 0 {
        dt
    } else {
        dt + Duration::seconds(step - remainder)
    }
}
