use crate::nlp::constants::{DAILY_WORDS, TIMES_WORDS, UNTIL_WORDS, WEEKLY_WORDS};
use crate::types::{RecurrenceType, Token, TokenType};

use super::datetime::{numeric_date_parts, DateParts};

/// Recurrence phrases as written. The end date stays unresolved until the
/// event date is known.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecurrenceSlot {
    pub kind: Option<RecurrenceType>,
    pub until: Option<DateParts>,
    pub times: Option<u32>,
    /// Set by `כל שבוע`, `עד D.M` or `N פעמים`, not by an adjective such
    /// as `שבועית` that may just be part of a title.
    pub explicit: bool,
}

impl RecurrenceSlot {
    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.until.is_none() && self.times.is_none()
    }
}

pub fn extract_recurrence(tokens: &[Token], warnings: &mut Vec<String>) -> RecurrenceSlot {
    let mut slot = RecurrenceSlot::default();

    for token in tokens.iter().filter(|t| t.kind == TokenType::Recurrence) {
        let words: Vec<&str> = token.text.split_whitespace().collect();
        let first = words.first().copied().unwrap_or_default();
        let last = words.last().copied().unwrap_or_default();
        slot.explicit |= words.len() > 1;

        let kind = if last == "יום" || DAILY_WORDS.contains(&first) {
            Some(RecurrenceType::Daily)
        } else if last == "שבוע" || WEEKLY_WORDS.contains(&first) {
            Some(RecurrenceType::Weekly)
        } else {
            None
        };

        if let Some(kind) = kind {
            if slot.kind.is_some_and(|k| k != kind) {
                warnings.push(format!("חזרתיות סותרת \"{}\" התעלמה", token.text));
            } else {
                slot.kind = Some(kind);
            }
        } else if UNTIL_WORDS.contains(&first) {
            slot.until = numeric_date_parts(last);
        } else if TIMES_WORDS.contains(&last) {
            match first.parse::<u32>() {
                Ok(times) => slot.times = Some(times),
                Err(_) => warnings.push(format!("מספר חזרות לא תקין \"{}\"", token.text)),
            }
        }
    }

    slot
}
