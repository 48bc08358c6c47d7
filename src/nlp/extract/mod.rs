//! Slot extraction.
//!
//! Each extractor is a pure function over the token stream; none of them
//! sees the others' results. `extract_slots` runs them all and gathers the
//! warnings in token order per extractor.

mod color;
mod datetime;
mod duration;
mod fields;
mod guests;
mod reminders;
mod recurrence;

pub use color::extract_color;
pub use datetime::{
    all_day_span, extract_datetime, next_weekday, parse_time, resolve_day_month, resolve_span,
    weekday_name, DateParts, DateTimeSlot,
};
pub use duration::{duration_minutes, extract_duration};
pub use fields::{extract_fields, FieldSlots, Rename};
pub use guests::{extract_guests, GuestSlots};
pub use recurrence::{extract_recurrence, RecurrenceSlot};
pub use reminders::extract_reminders;

use chrono::NaiveDate;

use crate::types::{EventColor, Operation, Token};

/// Everything the command mentioned, before payload assembly.
#[derive(Debug, Clone, Default)]
pub struct Slots {
    pub datetime: DateTimeSlot,
    pub duration_minutes: Option<u32>,
    pub color: Option<EventColor>,
    pub reminders: Option<Vec<u32>>,
    pub guests: GuestSlots,
    pub recurrence: RecurrenceSlot,
    pub fields: FieldSlots,
    pub warnings: Vec<String>,
}

/// Inputs shared by the extractors.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext {
    /// Local date of the reference instant
    pub today: NaiveDate,
    pub operation: Operation,
    /// Token already used as an explicit event id
    pub id_token: Option<usize>,
}

pub fn extract_slots(tokens: &[Token], ctx: &ExtractContext) -> Slots {
    let mut warnings = Vec::new();

    let datetime = extract_datetime(tokens, ctx.today, &mut warnings);
    let duration_minutes = extract_duration(tokens, &mut warnings);
    let color = extract_color(tokens, &mut warnings);
    let reminders = extract_reminders(tokens, &mut warnings);
    let guests = extract_guests(tokens, ctx.id_token, &mut warnings);
    let recurrence = extract_recurrence(tokens, &mut warnings);
    let fields = extract_fields(tokens, ctx.operation == Operation::Update, &mut warnings);

    log::debug!(
        "Slots: date={:?} start={:?} end={:?} duration={:?} guests={} recurrence={:?}",
        datetime.date,
        datetime.start,
        datetime.end,
        duration_minutes,
        guests.all.len(),
        recurrence.kind
    );

    Slots {
        datetime,
        duration_minutes,
        color,
        reminders,
        guests,
        recurrence,
        fields,
        warnings,
    }
}
