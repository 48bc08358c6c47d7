use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, NlpError};

// ============================================================================
// Tokens
// ============================================================================

/// Classification assigned to a token by the tokenizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenType {
    Date,
    Time,
    Duration,
    Color,
    Reminder,
    Number,
    Email,
    Recurrence,
    Action,
    GuestKeyword,
    Text,
}

impl TokenType {
    /// Slot tokens carry structured data and never belong to a title.
    pub fn is_slot(&self) -> bool {
        matches!(
            self,
            TokenType::Date
                | TokenType::Time
                | TokenType::Duration
                | TokenType::Color
                | TokenType::Reminder
                | TokenType::Email
                | TokenType::Recurrence
                | TokenType::GuestKeyword
        )
    }
}

/// A classified span of the normalized command text.
///
/// `index` is a character offset into the normalized string. A token may
/// cover several words when a multi-word phrase matched (`כל שבוע`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub index: usize,
    #[serde(rename = "type")]
    pub kind: TokenType,
}

impl Token {
    pub fn new(text: impl Into<String>, index: usize, kind: TokenType) -> Self {
        Self {
            text: text.into(),
            index,
            kind,
        }
    }
}

// ============================================================================
// Event payloads
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

/// Fixed calendar color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
    Purple,
    Pink,
}

impl EventColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Red => "red",
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Yellow => "yellow",
            EventColor::Orange => "orange",
            EventColor::Purple => "purple",
            EventColor::Pink => "pink",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
}

/// Repetition rule. `until` and `times` are mutually exclusive; neither
/// means the event repeats indefinitely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    /// 0 = Sunday … 6 = Saturday (weekly only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekday: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<u32>,
}

/// Payload for creating an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
    /// Minutes before start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    /// Set only when the command named an explicit duration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrencePattern>,
}

impl CreateEventRequest {
    pub fn is_all_day(&self) -> bool {
        self.all_day.unwrap_or(false)
    }
}

/// Partial changes to an existing event. Recurrence is never editable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<EventColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_add: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests_remove: Option<Vec<String>>,
}

impl UpdateEventRequest {
    /// Names (as they appear on the wire) of every populated field.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.start.is_some() {
            fields.push("start");
        }
        if self.end.is_some() {
            fields.push("end");
        }
        if self.description.is_some() {
            fields.push("description");
        }
        if self.location.is_some() {
            fields.push("location");
        }
        if self.color.is_some() {
            fields.push("color");
        }
        if self.reminders.is_some() {
            fields.push("reminders");
        }
        if self.all_day.is_some() {
            fields.push("allDay");
        }
        if self.guests_add.is_some() {
            fields.push("guestsAdd");
        }
        if self.guests_remove.is_some() {
            fields.push("guestsRemove");
        }
        fields
    }

    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }
}

// ============================================================================
// Matching
// ============================================================================

/// An existing event supplied by the caller (already time-filtered).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateEvent {
    pub id: String,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    #[serde(default)]
    pub recurring: bool,
}

/// A candidate decorated with its similarity to the extracted title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisambiguationCandidate {
    pub id: String,
    pub title: String,
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    /// 0.0–1.0
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Disambiguation {
    pub query: String,
    pub candidates: Vec<DisambiguationCandidate>,
}

// ============================================================================
// Parse contract
// ============================================================================

/// Input to a parse call. `now` anchors every relative date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseRequest {
    pub text: String,
    /// Caller-side switch: parse and validate, but do not apply.
    #[serde(default)]
    pub parse_only: bool,
    pub now: DateTime<FixedOffset>,
    #[serde(default)]
    pub candidate_events: Vec<CandidateEvent>,
    /// Resolves an earlier disambiguation: the id the user picked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_event_id: Option<String>,
}

impl ParseRequest {
    pub fn new(text: impl Into<String>, now: DateTime<FixedOffset>) -> Self {
        Self {
            text: text.into(),
            parse_only: false,
            now,
            candidate_events: Vec::new(),
            selected_event_id: None,
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateEvent>) -> Self {
        self.candidate_events = candidates;
        self
    }
}

/// The single result of a parse call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpInterpretation {
    pub success: bool,
    pub tokens: Vec<Token>,
    pub operation: Option<Operation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<CreateEventRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changes: Option<UpdateEventRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    pub error: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disambiguate: Option<Disambiguation>,
    pub warnings: Vec<String>,
}

impl NlpInterpretation {
    fn base(tokens: Vec<Token>, operation: Option<Operation>, warnings: Vec<String>) -> Self {
        Self {
            success: false,
            tokens,
            operation,
            event: None,
            changes: None,
            event_id: None,
            error: None,
            message: None,
            disambiguate: None,
            warnings,
        }
    }

    pub fn created(tokens: Vec<Token>, event: CreateEventRequest, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            event: Some(event),
            ..Self::base(tokens, Some(Operation::Create), warnings)
        }
    }

    pub fn updated(
        tokens: Vec<Token>,
        event_id: String,
        changes: UpdateEventRequest,
        warnings: Vec<String>,
    ) -> Self {
        Self {
            success: true,
            event_id: Some(event_id),
            changes: Some(changes),
            ..Self::base(tokens, Some(Operation::Update), warnings)
        }
    }

    pub fn deleted(tokens: Vec<Token>, event_id: String, warnings: Vec<String>) -> Self {
        Self {
            success: true,
            event_id: Some(event_id),
            ..Self::base(tokens, Some(Operation::Delete), warnings)
        }
    }

    /// Failure carrying the error code; ambiguity also carries the candidates.
    pub fn failed(
        tokens: Vec<Token>,
        operation: Option<Operation>,
        err: NlpError,
        warnings: Vec<String>,
    ) -> Self {
        let code = err.code();
        let message = Some(err.user_message().to_string());
        let disambiguate = match err {
            NlpError::Ambiguous { disambiguation } => Some(disambiguation),
            _ => None,
        };
        Self {
            error: Some(code),
            message,
            disambiguate,
            ..Self::base(tokens, operation, warnings)
        }
    }
}

// ============================================================================
// Slot suggestions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartOfDay {
    #[serde(rename = "morning", alias = "בבוקר")]
    Morning,
    #[serde(rename = "noon", alias = "צהריים")]
    Noon,
    #[serde(rename = "afternoon", alias = "אחר הצהריים")]
    Afternoon,
    #[serde(rename = "evening", alias = "בערב")]
    Evening,
}

impl PartOfDay {
    /// Local-hour window `[start, end)`.
    pub fn hours(&self) -> (u32, u32) {
        match self {
            PartOfDay::Morning => (8, 12),
            PartOfDay::Noon => (12, 14),
            PartOfDay::Afternoon => (14, 17),
            PartOfDay::Evening => (17, 21),
        }
    }

    /// Accepts both the English names and the Hebrew phrases.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "morning" | "בבוקר" | "בוקר" => Some(PartOfDay::Morning),
            "noon" | "צהריים" | "בצהריים" => Some(PartOfDay::Noon),
            "afternoon" | "אחר הצהריים" | "אחה\"צ" => Some(PartOfDay::Afternoon),
            "evening" | "בערב" | "ערב" => Some(PartOfDay::Evening),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestSlotsOptions {
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub time_min: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub time_max: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub part_of_day: Option<PartOfDay>,
    #[serde(default)]
    pub max_suggestions: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
    pub length_minutes: u32,
}
