//! Target resolution: match an extracted subject to the caller's candidate
//! events.
//!
//! Scoring is normalized Levenshtein similarity over characters. The
//! decision policy auto-selects only a confident, clearly leading match and
//! otherwise hands a short ranked list back to the caller.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::MatchingConfig;
use crate::error::NlpError;
use crate::nlp::constants::{DAILY_WORDS, STOP_WORDS, SUBJECT_STOP_WORDS, WEEKLY_WORDS};
use crate::nlp::normalize::normalize;
use crate::nlp::tokenize::re_email;
use crate::types::{
    CandidateEvent, Disambiguation, DisambiguationCandidate, Operation, ParseRequest, Token,
    TokenType,
};

/// Edit distance in characters, capped at `cap`.
///
/// Returns `cap` as soon as the true distance is known to reach it.
pub fn levenshtein(a: &str, b: &str, cap: usize) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.len().abs_diff(b.len()) >= cap {
        return cap;
    }
    if a.len().max(b.len()) <= cap {
        let a: String = a.iter().collect();
        let b: String = b.iter().collect();
        return strsim::levenshtein(&a, &b).min(cap);
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut cur = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        cur[0] = i + 1;
        let mut row_min = cur[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            cur[j + 1] = (prev[j + 1] + 1).min(cur[j] + 1).min(prev[j] + cost);
            row_min = row_min.min(cur[j + 1]);
        }
        if row_min >= cap {
            return cap;
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    prev[b.len()].min(cap)
}

/// Similarity in `[0, 1]` with the default distance cap.
pub fn similarity(a: &str, b: &str) -> f64 {
    similarity_capped(a, b, MatchingConfig::default().distance_cap)
}

/// `1 - distance / max_len` over normalized, lower-cased text. Two empty
/// strings are identical. A distance that hits the cap scores 0.
pub fn similarity_capped(a: &str, b: &str, cap: usize) -> f64 {
    let a = normalize(a).to_lowercase();
    let b = normalize(b).to_lowercase();

    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(&a, &b, cap);
    if distance >= cap {
        return 0.0;
    }
    1.0 - distance as f64 / max_len as f64
}

fn strip_stop_words(title: &str) -> String {
    normalize(title)
        .split_whitespace()
        .filter(|w| !STOP_WORDS.contains(w) && !SUBJECT_STOP_WORDS.contains(w))
        .filter(|w| !DAILY_WORDS.contains(w) && !WEEKLY_WORDS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Subject phrases have their connectives and recurrence adjectives removed,
/// so compare against both the raw title and the title without them.
fn candidate_score(query: &str, title: &str, cap: usize) -> f64 {
    let raw = similarity_capped(query, title, cap);
    let stripped = similarity_capped(query, &strip_stop_words(title), cap);
    raw.max(stripped)
}

/// Every candidate scored against `query`, best first. Ties keep input order.
pub fn rank_candidates(
    query: &str,
    candidates: &[CandidateEvent],
    config: &MatchingConfig,
) -> Vec<DisambiguationCandidate> {
    let mut ranked: Vec<DisambiguationCandidate> = candidates
        .iter()
        .map(|c| DisambiguationCandidate {
            id: c.id.clone(),
            title: c.title.clone(),
            start: c.start,
            end: c.end,
            score: candidate_score(query, &c.title, config.distance_cap),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}

/// Pick the event `query` refers to.
///
/// - nothing scores at least `min_score`: `NotFound`
/// - the top score reaches `high_confidence` and leads the runner-up by at
///   least `ambiguity_margin`: that event
/// - otherwise `Ambiguous` with the plausible candidates (those within the
///   margin of a confident top, or every candidate above the floor when the
///   top is not confident), at most `max_candidates`
pub fn resolve_target<'a>(
    query: &str,
    candidates: &'a [CandidateEvent],
    config: &MatchingConfig,
) -> Result<&'a CandidateEvent, NlpError> {
    let ranked = rank_candidates(query, candidates, config);

    let Some(top) = ranked.first() else {
        return Err(NlpError::NotFound {
            query: query.to_string(),
        });
    };
    if top.score < config.min_score {
        log::debug!("Best match for '{}' scored {:.3}; below floor", query, top.score);
        return Err(NlpError::NotFound {
            query: query.to_string(),
        });
    }

    let top_score = top.score;
    let lead = ranked.get(1).map(|second| top_score - second.score);
    let confident = top_score >= config.high_confidence;

    if confident && lead.is_none_or(|l| l >= config.ambiguity_margin) {
        log::debug!("Matched '{}' to {} ({:.3})", query, top.id, top_score);
        return candidates
            .iter()
            .find(|c| c.id == top.id)
            .ok_or_else(|| NlpError::NotFound {
                query: query.to_string(),
            });
    }

    let floor = if confident {
        config.min_score.max(top_score - config.ambiguity_margin)
    } else {
        config.min_score
    };
    let shortlist: Vec<DisambiguationCandidate> = ranked
        .into_iter()
        .filter(|c| c.score >= floor)
        .take(config.max_candidates)
        .collect();

    log::debug!(
        "'{}' is ambiguous: {} candidates (top {:.3})",
        query,
        shortlist.len(),
        top_score
    );
    Err(NlpError::Ambiguous {
        disambiguation: Disambiguation {
            query: query.to_string(),
            candidates: shortlist,
        },
    })
}

/// Google Calendar style event id, optionally with an instance suffix.
fn re_event_id() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-v0-9]{20,}(?:_\d{8}T\d{6}Z)?$").unwrap())
}

/// An event named directly rather than by title.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplicitTarget {
    pub id: String,
    /// Token that carried the id, if any
    pub token: Option<usize>,
}

/// Look for an explicit event reference, which bypasses fuzzy matching.
///
/// Checked in order: the id the caller already selected, a token equal to a
/// candidate id, an email in a delete, an email right after the verb in an
/// update, and finally anything shaped like a calendar event id.
pub fn find_explicit_target(
    tokens: &[Token],
    request: &ParseRequest,
    operation: Operation,
) -> Option<ExplicitTarget> {
    if let Some(id) = request.selected_event_id.as_deref().filter(|id| !id.is_empty()) {
        return Some(ExplicitTarget {
            id: id.to_string(),
            token: None,
        });
    }

    let body = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind != TokenType::Action);

    for (i, token) in body.clone() {
        if request.candidate_events.iter().any(|c| c.id == token.text) {
            return Some(explicit(token, i));
        }
    }

    match operation {
        Operation::Delete => {
            if let Some((i, token)) = body.clone().find(|(_, t)| t.kind == TokenType::Email) {
                return Some(explicit(token, i));
            }
        }
        Operation::Update => {
            if let Some(token) = tokens.get(1).filter(|t| re_email().is_match(&t.text)) {
                return Some(explicit(token, 1));
            }
        }
        Operation::Create => return None,
    }

    body.clone()
        .find(|(_, t)| re_event_id().is_match(&t.text))
        .map(|(i, token)| explicit(token, i))
}

fn explicit(token: &Token, index: usize) -> ExplicitTarget {
    ExplicitTarget {
        id: token.text.clone(),
        token: Some(index),
    }
}
