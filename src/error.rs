//! Error types for command interpretation
//!
//! Every failure is eventually reported as data inside an `NlpInterpretation`;
//! `NlpError` is the internal `?`-friendly form. Errors are classified by
//! what the user can do about them:
//! - Reprompt: the sentence lacked something (title, time, a clear target)
//! - Rejected: the request is well-formed but not allowed (recurrence edits)
//! - Invalid: the payload breaks an invariant

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Disambiguation;

/// Error types for parsing and validation
#[derive(Debug, Clone, Error)]
pub enum NlpError {
    // Reprompt
    #[error("No event title found in command")]
    MissingTitle,

    #[error("No date or time found in command")]
    MissingTime,

    #[error("No event matches \"{query}\"")]
    NotFound { query: String },

    #[error("Several events match \"{}\"", .disambiguation.query)]
    Ambiguous { disambiguation: Disambiguation },

    #[error("Could not determine an operation: {0}")]
    Unclassified(String),

    #[error("Nothing to change in update command")]
    NoChanges,

    // Rejected
    #[error("Changing the recurrence of an existing event is not supported")]
    UnsupportedRecurrenceEdit,

    // Invalid
    #[error("Recurrence cannot set both an end date and an occurrence count")]
    RecurrenceConflict,

    #[error("Invalid recurrence: {0}")]
    InvalidRecurrence(String),

    #[error("Event must end after it starts")]
    InvalidTimeRange,

    #[error("Invalid guest email: {0}")]
    InvalidGuest(String),

    #[error("Guest {0} is both added and removed")]
    GuestConflict(String),
}

/// Stable, serializable error code carried in interpretations and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingTitle,
    MissingTime,
    NotFound,
    Ambiguous,
    Unclassified,
    NoChanges,
    UnsupportedRecurrenceEdit,
    RecurrenceConflict,
    InvalidRecurrence,
    InvalidTimeRange,
    InvalidGuest,
    GuestConflict,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingTitle => "MISSING_TITLE",
            ErrorCode::MissingTime => "MISSING_TIME",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Ambiguous => "AMBIGUOUS",
            ErrorCode::Unclassified => "UNCLASSIFIED",
            ErrorCode::NoChanges => "NO_CHANGES",
            ErrorCode::UnsupportedRecurrenceEdit => "UNSUPPORTED_RECURRENCE_EDIT",
            ErrorCode::RecurrenceConflict => "RECURRENCE_CONFLICT",
            ErrorCode::InvalidRecurrence => "INVALID_RECURRENCE",
            ErrorCode::InvalidTimeRange => "INVALID_TIME_RANGE",
            ErrorCode::InvalidGuest => "INVALID_GUEST",
            ErrorCode::GuestConflict => "GUEST_CONFLICT",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NlpError {
    pub fn code(&self) -> ErrorCode {
        match self {
            NlpError::MissingTitle => ErrorCode::MissingTitle,
            NlpError::MissingTime => ErrorCode::MissingTime,
            NlpError::NotFound { .. } => ErrorCode::NotFound,
            NlpError::Ambiguous { .. } => ErrorCode::Ambiguous,
            NlpError::Unclassified(_) => ErrorCode::Unclassified,
            NlpError::NoChanges => ErrorCode::NoChanges,
            NlpError::UnsupportedRecurrenceEdit => ErrorCode::UnsupportedRecurrenceEdit,
            NlpError::RecurrenceConflict => ErrorCode::RecurrenceConflict,
            NlpError::InvalidRecurrence(_) => ErrorCode::InvalidRecurrence,
            NlpError::InvalidTimeRange => ErrorCode::InvalidTimeRange,
            NlpError::InvalidGuest(_) => ErrorCode::InvalidGuest,
            NlpError::GuestConflict(_) => ErrorCode::GuestConflict,
        }
    }

    /// Hebrew message suitable for showing to the user
    pub fn user_message(&self) -> &'static str {
        match self {
            NlpError::MissingTitle => "לא נמצאה כותרת לאירוע",
            NlpError::MissingTime => "לא נמצא תאריך או שעה לאירוע",
            NlpError::NotFound { .. } => "לא נמצא אירוע מתאים",
            NlpError::Ambiguous { .. } => "נמצאו כמה אירועים מתאימים, יש לבחור אחד",
            NlpError::Unclassified(_) => "לא הצלחתי להבין את הפקודה",
            NlpError::NoChanges => "לא נמצאו שינויים לביצוע",
            NlpError::UnsupportedRecurrenceEdit => "לא ניתן לשנות חזרתיות של אירוע קיים",
            NlpError::RecurrenceConflict => "לא ניתן להגדיר גם תאריך סיום וגם מספר חזרות",
            NlpError::InvalidRecurrence(_) => "הגדרת החזרתיות אינה תקינה",
            NlpError::InvalidTimeRange => "שעת הסיום חייבת להיות אחרי שעת ההתחלה",
            NlpError::InvalidGuest(_) => "כתובת מייל של משתתף אינה תקינה",
            NlpError::GuestConflict(_) => "משתתף לא יכול להתווסף ולהימחק באותה פקודה",
        }
    }
}

/// Errors raised while loading configuration from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Could not find home directory")]
    NoHomeDir,
}
