//! Boundary responses: what a caller sends back over the wire.

use serde::Serialize;

use crate::error::{ErrorCode, NlpError};
use crate::nlp::extract::weekday_name;
use crate::types::{
    CreateEventRequest, Disambiguation, NlpInterpretation, Operation, RecurrencePattern,
    RecurrenceType, TimeSlot,
};

/// Minimal `{ok, error, message}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiResponse {
    pub fn from_validation(result: Result<(), NlpError>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
                message: None,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.code()),
                message: Some(err.user_message().to_string()),
            },
        }
    }
}

/// Response to a `parseNlp` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseNlpResponse {
    pub ok: bool,
    pub action: &'static str,
    pub parse_only: bool,
    pub operation: Option<Operation>,
    pub interpreted: NlpInterpretation,
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<CreateEventRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changed_fields: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_event_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disambiguation: Option<Disambiguation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ParseNlpResponse {
    pub fn from_interpretation(interp: NlpInterpretation, parse_only: bool) -> Self {
        let changed_fields = interp
            .changes
            .as_ref()
            .map(|c| c.changed_fields().into_iter().map(String::from).collect());
        let deleted_event_id = match interp.operation {
            Some(Operation::Delete) if interp.success => interp.event_id.clone(),
            _ => None,
        };
        let message = if interp.success {
            Some(summarize(&interp, parse_only))
        } else {
            interp.message.clone()
        };

        Self {
            ok: interp.success,
            action: "parseNlp",
            parse_only,
            operation: interp.operation,
            warnings: interp.warnings.clone(),
            event: interp.event.clone(),
            changed_fields,
            deleted_event_id,
            disambiguation: interp.disambiguate.clone(),
            error: interp.error,
            message,
            interpreted: interp,
        }
    }
}

/// Response to a `suggestSlots` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestSlotsResponse {
    pub ok: bool,
    pub action: &'static str,
    pub suggestions: Vec<TimeSlot>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SuggestSlotsResponse {
    pub fn from_result(result: Result<Vec<TimeSlot>, NlpError>) -> Self {
        match result {
            Ok(suggestions) => Self {
                ok: true,
                action: "suggestSlots",
                count: suggestions.len(),
                suggestions,
                error: None,
                message: None,
            },
            Err(err) => Self {
                ok: false,
                action: "suggestSlots",
                suggestions: Vec::new(),
                count: 0,
                error: Some(err.code()),
                message: Some(err.user_message().to_string()),
            },
        }
    }
}

/// One-line Hebrew summary of a successful interpretation.
fn summarize(interp: &NlpInterpretation, parse_only: bool) -> String {
    let body = match (interp.operation, &interp.event, &interp.changes) {
        (Some(Operation::Create), Some(event), _) => describe_event(event),
        (Some(Operation::Update), _, Some(changes)) => format!(
            "עדכון אירוע {}: {}",
            interp.event_id.as_deref().unwrap_or_default(),
            changes.changed_fields().join(", ")
        ),
        (Some(Operation::Delete), _, _) => format!(
            "מחיקת אירוע {}",
            interp.event_id.as_deref().unwrap_or_default()
        ),
        _ => String::new(),
    };

    if parse_only {
        format!("תצוגה מקדימה: {}", body)
    } else {
        body
    }
}

fn describe_event(event: &CreateEventRequest) -> String {
    let mut text = format!("אירוע חדש \"{}\" ב-{}", event.title, event.start.format("%d.%m.%Y"));
    if event.is_all_day() {
        text.push_str(" (כל היום)");
    } else {
        text.push_str(&format!(
            " {}-{}",
            event.start.format("%H:%M"),
            event.end.format("%H:%M")
        ));
    }
    if let Some(pattern) = &event.recurrence {
        text.push_str(", ");
        text.push_str(&describe_recurrence(pattern));
    }
    text
}

/// Hebrew description of a recurrence rule, e.g. `כל שבוע ביום שלישי עד 31.12.2026`.
pub fn describe_recurrence(pattern: &RecurrencePattern) -> String {
    let mut text = match pattern.kind {
        RecurrenceType::Daily => "כל יום".to_string(),
        RecurrenceType::Weekly => match pattern.weekday.and_then(weekday_name) {
            Some(day) => format!("כל שבוע ביום {}", day),
            None => "כל שבוע".to_string(),
        },
    };
    if let Some(until) = pattern.until {
        text.push_str(&format!(" עד {}", until.format("%d.%m.%Y")));
    }
    if let Some(times) = pattern.times {
        text.push_str(&format!(" ({} פעמים)", times));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NlpConfig;
    use crate::nlp::parse_command;
    use crate::types::{CandidateEvent, ParseRequest};
    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};

    fn local(d: u32, h: u32) -> DateTime<FixedOffset> {
        chrono_tz::Asia::Jerusalem
            .with_ymd_and_hms(2026, 3, d, h, 0, 0)
            .unwrap()
            .fixed_offset()
    }

    fn parse(text: &str, candidates: Vec<CandidateEvent>) -> NlpInterpretation {
        let request = ParseRequest::new(text, local(10, 8)).with_candidates(candidates);
        parse_command(&request, &NlpConfig::default())
    }

    fn candidate(id: &str, title: &str) -> CandidateEvent {
        CandidateEvent {
            id: id.to_string(),
            title: title.to_string(),
            start: local(12, 10),
            end: local(12, 11),
            recurring: false,
        }
    }

    #[test]
    fn test_create_response() {
        let interp = parse("מחר 09:00 פגישת צוות", Vec::new());
        let response = ParseNlpResponse::from_interpretation(interp, true);
        assert!(response.ok);
        assert!(response.parse_only);
        assert_eq!(response.event.as_ref().unwrap().title, "פגישת צוות");
        let message = response.message.unwrap();
        assert!(message.contains("פגישת צוות"));
        assert!(message.contains("11.03.2026"));

        let json = serde_json::to_value(ParseNlpResponse::from_interpretation(
            parse("מחר 09:00 פגישת צוות", Vec::new()),
            false,
        ))
        .unwrap();
        assert_eq!(json["action"], "parseNlp");
        assert_eq!(json["interpreted"]["operation"], "create");
        assert!(json.get("changedFields").is_none());
    }

    #[test]
    fn test_update_response_lists_changed_fields() {
        let interp = parse("העבר פגישה ל-15:00", vec![candidate("e1", "פגישה")]);
        let response = ParseNlpResponse::from_interpretation(interp, false);
        assert_eq!(
            response.changed_fields,
            Some(vec!["start".to_string(), "end".to_string()])
        );
        assert_eq!(response.deleted_event_id, None);
    }

    #[test]
    fn test_delete_response_carries_id() {
        let interp = parse("מחק פגישה", vec![candidate("e1", "פגישה")]);
        let response = ParseNlpResponse::from_interpretation(interp, false);
        assert_eq!(response.deleted_event_id.as_deref(), Some("e1"));
    }

    #[test]
    fn test_failure_response_keeps_code_and_candidates() {
        let interp = parse(
            "מחק פגישה עם דוקטור",
            vec![candidate("e1", "פגישה עם דוקטור"), candidate("e2", "פגישה עם דוקטורית")],
        );
        let response = ParseNlpResponse::from_interpretation(interp, false);
        assert!(!response.ok);
        assert_eq!(response.error, Some(ErrorCode::Ambiguous));
        assert_eq!(response.disambiguation.unwrap().candidates.len(), 2);
        assert!(response.message.is_some());
    }

    #[test]
    fn test_recurrence_descriptions() {
        let weekly = RecurrencePattern {
            kind: RecurrenceType::Weekly,
            weekday: Some(2),
            until: NaiveDate::from_ymd_opt(2026, 12, 31),
            times: None,
        };
        assert_eq!(describe_recurrence(&weekly), "כל שבוע ביום שלישי עד 31.12.2026");

        let daily = RecurrencePattern {
            kind: RecurrenceType::Daily,
            weekday: None,
            until: None,
            times: Some(5),
        };
        assert_eq!(describe_recurrence(&daily), "כל יום (5 פעמים)");
    }

    #[test]
    fn test_validation_envelope() {
        assert!(ApiResponse::from_validation(Ok(())).ok);
        let response = ApiResponse::from_validation(Err(NlpError::RecurrenceConflict));
        assert_eq!(response.error, Some(ErrorCode::RecurrenceConflict));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], "RECURRENCE_CONFLICT");
    }
}
