//! Payload assembly and validation.
//!
//! The builders turn extracted slots into typed create/update payloads. The
//! `validate_*` functions hold the payload invariants and are public so a
//! caller can run them on payloads it built itself (a form submission).

use chrono::{DateTime, Duration, NaiveDate};
use chrono_tz::Tz;

use crate::config::NlpConfig;
use crate::error::NlpError;
use crate::nlp::extract::{
    all_day_span, resolve_day_month, resolve_span, RecurrenceSlot, Slots,
};
use crate::nlp::tokenize::re_email;
use crate::types::{
    CandidateEvent, CreateEventRequest, RecurrencePattern, RecurrenceType, UpdateEventRequest,
};
use crate::util::{resolve_local_datetime, weekday_index};

/// Reference time and settings shared by the builders.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub tz: Tz,
    pub now: DateTime<Tz>,
    pub config: &'a NlpConfig,
}

impl BuildContext<'_> {
    fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// `until` and `times` are mutually exclusive; `times` must be positive.
pub fn validate_recurrence(pattern: &RecurrencePattern) -> Result<(), NlpError> {
    if pattern.until.is_some() && pattern.times.is_some() {
        return Err(NlpError::RecurrenceConflict);
    }
    if pattern.times == Some(0) {
        return Err(NlpError::InvalidRecurrence("times must be positive".to_string()));
    }
    if pattern.weekday.is_some_and(|d| d > 6) {
        return Err(NlpError::InvalidRecurrence(format!(
            "weekday {} is outside 0-6",
            pattern.weekday.unwrap_or_default()
        )));
    }
    Ok(())
}

fn validate_guests<'a>(emails: impl IntoIterator<Item = &'a String>) -> Result<(), NlpError> {
    match emails.into_iter().find(|e| !re_email().is_match(e)) {
        Some(bad) => Err(NlpError::InvalidGuest(bad.clone())),
        None => Ok(()),
    }
}

/// Recurrence first, independent of everything else, then title, time
/// range and guest addresses.
pub fn validate_create_request(event: &CreateEventRequest) -> Result<(), NlpError> {
    if let Some(pattern) = &event.recurrence {
        validate_recurrence(pattern)?;
    }
    if event.title.trim().is_empty() {
        return Err(NlpError::MissingTitle);
    }
    if event.start > event.end || (event.start == event.end && !event.is_all_day()) {
        return Err(NlpError::InvalidTimeRange);
    }
    validate_guests(event.guests.iter().flatten())
}

pub fn validate_update_request(changes: &UpdateEventRequest) -> Result<(), NlpError> {
    if let (Some(add), Some(remove)) = (&changes.guests_add, &changes.guests_remove) {
        if let Some(both) = add.iter().find(|e| remove.contains(e)) {
            return Err(NlpError::GuestConflict(both.clone()));
        }
    }
    if let (Some(start), Some(end)) = (changes.start, changes.end) {
        if start >= end {
            return Err(NlpError::InvalidTimeRange);
        }
    }
    if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(NlpError::MissingTitle);
    }
    validate_guests(
        changes
            .guests_add
            .iter()
            .flatten()
            .chain(changes.guests_remove.iter().flatten()),
    )
}

// ============================================================================
// Recurrence
// ============================================================================

/// Recurrence pattern anchored on the event's first day.
///
/// Both an end date and a count is a conflict. An end date or count with
/// no repetition keyword is dropped with a warning.
pub fn build_recurrence(
    slot: &RecurrenceSlot,
    first_day: NaiveDate,
    warnings: &mut Vec<String>,
) -> Result<Option<RecurrencePattern>, NlpError> {
    if slot.until.is_some() && slot.times.is_some() {
        return Err(NlpError::RecurrenceConflict);
    }

    let Some(kind) = slot.kind else {
        if !slot.is_empty() {
            warnings.push("תאריך סיום או מספר חזרות ללא חזרתיות התעלמו".to_string());
        }
        return Ok(None);
    };

    let until = match slot.until {
        Some(parts) => match resolve_day_month(parts, first_day) {
            Some(date) => Some(date),
            None => {
                warnings.push(format!("תאריך סיום לא תקין {}.{} התעלם", parts.0, parts.1));
                None
            }
        },
        None => None,
    };

    let pattern = RecurrencePattern {
        kind,
        weekday: (kind == RecurrenceType::Weekly).then(|| weekday_index(first_day)),
        until,
        times: slot.times,
    };
    validate_recurrence(&pattern)?;
    Ok(Some(pattern))
}

// ============================================================================
// Create
// ============================================================================

pub fn build_create(
    title: String,
    slots: &Slots,
    ctx: &BuildContext<'_>,
    warnings: &mut Vec<String>,
) -> Result<CreateEventRequest, NlpError> {
    // Recurrence conflicts are reported regardless of other slots.
    if slots.recurrence.until.is_some() && slots.recurrence.times.is_some() {
        return Err(NlpError::RecurrenceConflict);
    }
    if title.trim().is_empty() {
        return Err(NlpError::MissingTitle);
    }

    let dt = &slots.datetime;
    if dt.is_empty() {
        return Err(NlpError::MissingTime);
    }

    let today = ctx.today();
    let mut duration_minutes = None;

    let (start, end, all_day) = match dt.start {
        Some(start_time) => {
            if dt.all_day {
                warnings.push("צוינה שעה; האירוע אינו לכל היום".to_string());
            }
            let date = match dt.date {
                Some(date) => date,
                None if resolve_local_datetime(&ctx.tz, today, start_time) < ctx.now => {
                    warnings.push(format!(
                        "השעה {} כבר עברה היום; נקבע למחר",
                        start_time.format("%H:%M")
                    ));
                    today + Duration::days(1)
                }
                None => today,
            };

            if dt.end.is_some() && slots.duration_minutes.is_some() {
                warnings.push("צוין טווח שעות; המשך התעלם".to_string());
            } else {
                duration_minutes = slots.duration_minutes;
            }
            let minutes = slots
                .duration_minutes
                .unwrap_or(ctx.config.default_duration_minutes);
            let (start, end) = resolve_span(&ctx.tz, date, start_time, dt.end, minutes);
            (start, end, None)
        }
        None => {
            let date = dt.date.unwrap_or(today);
            let (start, end) = all_day_span(&ctx.tz, date);
            (start, end, Some(true))
        }
    };

    let recurrence = build_recurrence(&slots.recurrence, start.date_naive(), warnings)?;
    let guests = &slots.guests.all;

    let event = CreateEventRequest {
        title: title.trim().to_string(),
        start: start.fixed_offset(),
        end: end.fixed_offset(),
        description: slots.fields.description.clone(),
        location: slots.fields.location.clone(),
        color: slots.color,
        reminders: slots.reminders.clone(),
        guests: (!guests.is_empty()).then(|| guests.clone()),
        all_day,
        duration_minutes,
        recurrence,
    };

    validate_create_request(&event)?;
    Ok(event)
}

// ============================================================================
// Update
// ============================================================================

/// Only what the command mentions ends up in the changes.
///
/// Times move the resolved event: a time without a date stays on the
/// event's day, and a date without a time keeps the event's time of day.
/// Without an explicit end the length is the command's duration, else the
/// event's current length, else the configured default.
pub fn build_update(
    slots: &Slots,
    target: Option<&CandidateEvent>,
    ctx: &BuildContext<'_>,
    warnings: &mut Vec<String>,
) -> Result<UpdateEventRequest, NlpError> {
    let mut changes = UpdateEventRequest {
        title: slots.fields.rename.as_ref().map(|r| r.title.clone()),
        description: slots.fields.description.clone(),
        location: slots.fields.location.clone(),
        color: slots.color,
        reminders: slots.reminders.clone(),
        ..Default::default()
    };

    let guests = &slots.guests;
    changes.guests_add = (!guests.add.is_empty()).then(|| guests.add.clone());
    changes.guests_remove = (!guests.remove.is_empty()).then(|| guests.remove.clone());

    let current = target.map(|c| {
        (
            c.start.with_timezone(&ctx.tz),
            c.end.with_timezone(&ctx.tz),
        )
    });
    let current_minutes = current
        .map(|(s, e)| (e - s).num_minutes())
        .filter(|m| *m > 0)
        .map(|m| m as u32);

    let dt = &slots.datetime;
    let base_date = dt
        .date
        .or(current.map(|(s, _)| s.date_naive()))
        .unwrap_or_else(|| ctx.today());

    match (dt.start, current) {
        (Some(start_time), _) => {
            let minutes = slots
                .duration_minutes
                .or(current_minutes)
                .unwrap_or(ctx.config.default_duration_minutes);
            let (start, end) = resolve_span(&ctx.tz, base_date, start_time, dt.end, minutes);
            changes.start = Some(start.fixed_offset());
            changes.end = Some(end.fixed_offset());
        }
        (None, _) if dt.all_day => {
            let (start, end) = all_day_span(&ctx.tz, base_date);
            changes.start = Some(start.fixed_offset());
            changes.end = Some(end.fixed_offset());
            changes.all_day = Some(true);
        }
        (None, Some((cur_start, cur_end))) if dt.date.is_some() => {
            let minutes = slots.duration_minutes.or(current_minutes).unwrap_or(0);
            let start = resolve_local_datetime(&ctx.tz, base_date, cur_start.time());
            let end = if minutes > 0 {
                start + Duration::minutes(minutes as i64)
            } else {
                start + (cur_end - cur_start)
            };
            changes.start = Some(start.fixed_offset());
            changes.end = Some(end.fixed_offset());
        }
        (None, None) if dt.date.is_some() => {
            warnings.push("האירוע אינו ידוע; התאריך נקבע לכל היום".to_string());
            let (start, end) = all_day_span(&ctx.tz, base_date);
            changes.start = Some(start.fixed_offset());
            changes.end = Some(end.fixed_offset());
            changes.all_day = Some(true);
        }
        (None, Some((cur_start, _))) => {
            if let Some(minutes) = slots.duration_minutes {
                changes.end = Some((cur_start + Duration::minutes(minutes as i64)).fixed_offset());
            }
        }
        (None, None) => {
            if slots.duration_minutes.is_some() {
                warnings.push("לא ניתן לשנות משך לאירוע לא ידוע; המשך התעלם".to_string());
            }
        }
    }

    if changes.is_empty() {
        return Err(NlpError::NoChanges);
    }
    validate_update_request(&changes)?;
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::extract::{extract_slots, ExtractContext};
    use crate::nlp::normalize::normalize;
    use crate::nlp::tokenize::tokenize;
    use crate::types::{EventColor, Operation};
    use chrono::{FixedOffset, TimeZone, Timelike};

    const TZ: Tz = chrono_tz::Asia::Jerusalem;

    fn now() -> DateTime<Tz> {
        // Tuesday
        TZ.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap()
    }

    fn slots(text: &str, operation: Operation) -> Slots {
        let ctx = ExtractContext {
            today: now().date_naive(),
            operation,
            id_token: None,
        };
        extract_slots(&tokenize(&normalize(text)), &ctx)
    }

    fn create(title: &str, text: &str) -> (Result<CreateEventRequest, NlpError>, Vec<String>) {
        let config = NlpConfig::default();
        let ctx = BuildContext {
            tz: TZ,
            now: now(),
            config: &config,
        };
        let mut warnings = Vec::new();
        let result = build_create(title.to_string(), &slots(text, Operation::Create), &ctx, &mut warnings);
        (result, warnings)
    }

    fn update(
        text: &str,
        target: Option<&CandidateEvent>,
    ) -> (Result<UpdateEventRequest, NlpError>, Vec<String>) {
        let config = NlpConfig::default();
        let ctx = BuildContext {
            tz: TZ,
            now: now(),
            config: &config,
        };
        let mut warnings = Vec::new();
        let result = build_update(&slots(text, Operation::Update), target, &ctx, &mut warnings);
        (result, warnings)
    }

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        TZ.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().fixed_offset()
    }

    fn sample_event() -> CreateEventRequest {
        CreateEventRequest {
            title: "פגישה".to_string(),
            start: local(2026, 3, 11, 9, 0),
            end: local(2026, 3, 11, 10, 0),
            description: None,
            location: None,
            color: None,
            reminders: None,
            guests: None,
            all_day: None,
            duration_minutes: None,
            recurrence: None,
        }
    }

    fn target() -> CandidateEvent {
        CandidateEvent {
            id: "evt-1".to_string(),
            title: "פגישה".to_string(),
            start: local(2026, 3, 12, 10, 0),
            end: local(2026, 3, 12, 10, 45),
            recurring: false,
        }
    }

    #[test]
    fn test_recurrence_conflict_checked_first() {
        let mut event = sample_event();
        event.title = String::new();
        event.recurrence = Some(RecurrencePattern {
            kind: RecurrenceType::Weekly,
            weekday: Some(3),
            until: NaiveDate::from_ymd_opt(2026, 12, 31),
            times: Some(5),
        });
        assert!(matches!(
            validate_create_request(&event),
            Err(NlpError::RecurrenceConflict)
        ));

        // Same through the builder, even with no title or time at all
        let (result, _) = create("", "כל שבוע עד 31.12 10 פעמים");
        assert!(matches!(result, Err(NlpError::RecurrenceConflict)));
    }

    #[test]
    fn test_invalid_recurrence_values() {
        let pattern = RecurrencePattern {
            kind: RecurrenceType::Daily,
            weekday: None,
            until: None,
            times: Some(0),
        };
        assert!(matches!(
            validate_recurrence(&pattern),
            Err(NlpError::InvalidRecurrence(_))
        ));
        let pattern = RecurrencePattern {
            kind: RecurrenceType::Weekly,
            weekday: Some(9),
            until: None,
            times: None,
        };
        assert!(validate_recurrence(&pattern).is_err());
    }

    #[test]
    fn test_validate_create_rejects_inverted_range_and_bad_guest() {
        let mut event = sample_event();
        event.end = event.start - Duration::minutes(30);
        assert!(matches!(
            validate_create_request(&event),
            Err(NlpError::InvalidTimeRange)
        ));

        let mut event = sample_event();
        event.guests = Some(vec!["not-an-email".to_string()]);
        assert!(matches!(
            validate_create_request(&event),
            Err(NlpError::InvalidGuest(_))
        ));
        assert!(validate_create_request(&sample_event()).is_ok());
    }

    #[test]
    fn test_validate_update_guest_sets_disjoint() {
        let changes = UpdateEventRequest {
            guests_add: Some(vec!["a@x.io".to_string()]),
            guests_remove: Some(vec!["a@x.io".to_string()]),
            ..Default::default()
        };
        assert!(matches!(
            validate_update_request(&changes),
            Err(NlpError::GuestConflict(_))
        ));
    }

    #[test]
    fn test_create_full_command() {
        let (result, warnings) = create(
            "פגישת צוות",
            "מחר 09:00 פגישת צוות שעתיים עם dani@example.com תזכורות 30,10 צבע כחול",
        );
        let event = result.unwrap();
        assert_eq!(event.start, local(2026, 3, 11, 9, 0));
        assert_eq!(event.end, local(2026, 3, 11, 11, 0));
        assert_eq!(event.duration_minutes, Some(120));
        assert_eq!(event.guests, Some(vec!["dani@example.com".to_string()]));
        assert_eq!(event.reminders, Some(vec![30, 10]));
        assert_eq!(event.color, Some(EventColor::Blue));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_missing_title_then_missing_time() {
        let (result, _) = create("", "מחר 09:00");
        assert!(matches!(result, Err(NlpError::MissingTitle)));
        let (result, _) = create("פגישה", "פגישה");
        assert!(matches!(result, Err(NlpError::MissingTime)));
    }

    #[test]
    fn test_date_only_is_all_day() {
        let (result, _) = create("האקתון", "15.11 יום מלא האקתון");
        let event = result.unwrap();
        assert_eq!(event.all_day, Some(true));
        assert_eq!(event.start, local(2026, 11, 15, 0, 0));
        assert_eq!(event.end, local(2026, 11, 16, 0, 0));
    }

    #[test]
    fn test_past_time_rolls_to_tomorrow() {
        let (result, warnings) = create("ריצה", "07:00 ריצה");
        let event = result.unwrap();
        assert_eq!(event.start, local(2026, 3, 11, 7, 0));
        assert_eq!(warnings.len(), 1);

        let (result, warnings) = create("ריצה", "18:00 ריצה");
        assert_eq!(result.unwrap().start, local(2026, 3, 10, 18, 0));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_weekly_recurrence_takes_start_weekday() {
        let (result, _) = create("סינק מוצר", "שלישי הבא 14:00-15:30 סינק מוצר כל שבוע עד 31.12");
        let event = result.unwrap();
        let pattern = event.recurrence.unwrap();
        assert_eq!(pattern.kind, RecurrenceType::Weekly);
        assert_eq!(pattern.weekday, Some(2));
        assert_eq!(pattern.until, NaiveDate::from_ymd_opt(2026, 12, 31));
        assert_eq!(pattern.times, None);
        assert_eq!(event.start, local(2026, 3, 17, 14, 0));
        assert_eq!(event.end, local(2026, 3, 17, 15, 30));
    }

    #[test]
    fn test_range_overrides_duration_with_warning() {
        let (result, warnings) = create("סדנה", "מחר 10:00-12:00 סדנה שעה");
        let event = result.unwrap();
        assert_eq!(event.end, local(2026, 3, 11, 12, 0));
        assert_eq!(event.duration_minutes, None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_until_without_recurrence_is_dropped() {
        let mut warnings = Vec::new();
        let slot = RecurrenceSlot {
            kind: None,
            until: Some((31, 12, None)),
            times: None,
            explicit: true,
        };
        let day = NaiveDate::from_ymd_opt(2026, 3, 11).unwrap();
        assert_eq!(build_recurrence(&slot, day, &mut warnings).unwrap(), None);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_update_time_only_uses_event_date() {
        let candidate = target();
        let (result, _) = update("העבר פגישה ל-15:00-16:00", Some(&candidate));
        let changes = result.unwrap();
        assert_eq!(changes.start, Some(local(2026, 3, 12, 15, 0)));
        assert_eq!(changes.end, Some(local(2026, 3, 12, 16, 0)));
        assert_eq!(changes.changed_fields(), vec!["start", "end"]);
    }

    #[test]
    fn test_update_start_keeps_event_length() {
        let candidate = target();
        let (result, _) = update("העבר פגישה ל-15:00", Some(&candidate));
        let changes = result.unwrap();
        let end = changes.end.unwrap();
        assert_eq!(end.hour(), 15);
        assert_eq!(end.minute(), 45);
    }

    #[test]
    fn test_update_date_only_keeps_time_of_day() {
        let candidate = target();
        let (result, _) = update("העבר פגישה למחר", Some(&candidate));
        let changes = result.unwrap();
        assert_eq!(changes.start, Some(local(2026, 3, 11, 10, 0)));
        assert_eq!(changes.end, Some(local(2026, 3, 11, 10, 45)));
        assert_eq!(changes.all_day, None);
    }

    #[test]
    fn test_update_location_and_guests() {
        let candidate = target();
        let (result, _) = update("עדכן פגישה מיקום משרד 3 הוסף a@x.io", Some(&candidate));
        let changes = result.unwrap();
        assert_eq!(changes.location.as_deref(), Some("משרד 3"));
        assert_eq!(changes.guests_add, Some(vec!["a@x.io".to_string()]));
        assert_eq!(changes.start, None);
    }

    #[test]
    fn test_update_without_changes() {
        let candidate = target();
        let (result, _) = update("עדכן פגישה", Some(&candidate));
        assert!(matches!(result, Err(NlpError::NoChanges)));
    }
}
