//! Hebrew command interpretation pipeline.
//!
//! text → normalize → tokenize → classify → extract slots →
//! (title + matching for update/delete) → build & validate → interpretation.
//!
//! Every stage is a pure function of its inputs. The reference time comes
//! from the request, and candidate events are supplied by the caller, so a
//! parse never touches the clock, the network or the calendar.

pub mod builder;
pub mod classify;
pub mod constants;
pub mod extract;
pub mod matcher;
pub mod normalize;
pub mod title;
pub mod tokenize;

use std::collections::HashSet;

use crate::config::NlpConfig;
use crate::error::NlpError;
use crate::types::{
    CandidateEvent, CreateEventRequest, NlpInterpretation, Operation, ParseRequest, Token,
    UpdateEventRequest,
};

pub use builder::{
    build_recurrence, validate_create_request, validate_recurrence, validate_update_request,
    BuildContext,
};
pub use classify::classify;
pub use extract::{extract_slots, ExtractContext, Slots};
pub use matcher::{
    find_explicit_target, levenshtein, rank_candidates, resolve_target, similarity,
    ExplicitTarget,
};
pub use normalize::normalize;
pub use title::extract_title;
pub use tokenize::tokenize;

enum Outcome {
    Created(CreateEventRequest),
    Updated(String, UpdateEventRequest),
    Deleted(String),
}

/// Interpret one command. Never panics and never fails: errors are
/// reported inside the returned interpretation.
pub fn parse_command(request: &ParseRequest, config: &NlpConfig) -> NlpInterpretation {
    let normalized = normalize(&request.text);
    let tokens = tokenize(&normalized);
    log::debug!("Normalized '{}' into {} tokens", normalized, tokens.len());

    let operation = match classify(&tokens) {
        Ok(operation) => operation,
        Err(err) => {
            log::debug!("Classification failed: {}", err);
            return NlpInterpretation::failed(tokens, None, err, Vec::new());
        }
    };
    log::debug!("Operation: {}", operation.as_str());

    let mut warnings = Vec::new();
    match interpret(request, config, &tokens, operation, &mut warnings) {
        Ok(Outcome::Created(event)) => NlpInterpretation::created(tokens, event, warnings),
        Ok(Outcome::Updated(id, changes)) => {
            NlpInterpretation::updated(tokens, id, changes, warnings)
        }
        Ok(Outcome::Deleted(id)) => NlpInterpretation::deleted(tokens, id, warnings),
        Err(err) => {
            log::debug!("Interpretation failed: {}", err);
            NlpInterpretation::failed(tokens, Some(operation), err, warnings)
        }
    }
}

fn interpret(
    request: &ParseRequest,
    config: &NlpConfig,
    tokens: &[Token],
    operation: Operation,
    warnings: &mut Vec<String>,
) -> Result<Outcome, NlpError> {
    let tz = config.tz();
    let now = request.now.with_timezone(&tz);

    let explicit = match operation {
        Operation::Create => None,
        _ => find_explicit_target(tokens, request, operation),
    };
    let id_token = explicit.as_ref().and_then(|t| t.token);

    let slots = extract_slots(
        tokens,
        &ExtractContext {
            today: now.date_naive(),
            operation,
            id_token,
        },
    );
    warnings.extend(slots.warnings.iter().cloned());

    let mut excluded: HashSet<usize> = slots.fields.consumed.clone();
    excluded.extend(id_token);

    let ctx = BuildContext {
        tz,
        now,
        config,
    };

    match operation {
        Operation::Create => {
            let title = extract_title(tokens, operation, &excluded, warnings);
            log::debug!("Create title: '{}'", title);
            builder::build_create(title, &slots, &ctx, warnings).map(Outcome::Created)
        }
        Operation::Update => {
            // Recurrence edits are refused before any matching happens.
            if slots.recurrence.explicit {
                return Err(NlpError::UnsupportedRecurrenceEdit);
            }
            let subject = match slots.fields.rename.as_ref().and_then(|r| r.subject.clone()) {
                Some(subject) => subject,
                None => extract_title(tokens, operation, &excluded, warnings),
            };
            let (id, target) = resolve(request, config, explicit, &subject)?;
            let changes = builder::build_update(&slots, target, &ctx, warnings)?;
            log::debug!("Update {}: {:?}", id, changes.changed_fields());
            Ok(Outcome::Updated(id, changes))
        }
        Operation::Delete => {
            let subject = extract_title(tokens, operation, &excluded, warnings);
            let (id, target) = resolve(request, config, explicit, &subject)?;
            if !slots.recurrence.is_empty() || target.is_some_and(|t| t.recurring) {
                warnings.push("האירוע חוזר; כל המופעים שלו יימחקו".to_string());
            }
            log::debug!("Delete {}", id);
            Ok(Outcome::Deleted(id))
        }
    }
}

/// The event an update/delete applies to, by explicit id or by title.
fn resolve<'a>(
    request: &'a ParseRequest,
    config: &NlpConfig,
    explicit: Option<ExplicitTarget>,
    subject: &str,
) -> Result<(String, Option<&'a CandidateEvent>), NlpError> {
    let candidates = &request.candidate_events;

    if let Some(target) = explicit {
        log::debug!("Explicit target {}", target.id);
        let event = candidates.iter().find(|c| c.id == target.id);
        return Ok((target.id, event));
    }

    if subject.is_empty() {
        return Err(NlpError::MissingTitle);
    }

    let event = resolve_target(subject, candidates, &config.matching)?;
    Ok((event.id.clone(), Some(event)))
}
