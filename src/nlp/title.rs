//! Title reconstruction from the tokens left after slot extraction.

use std::collections::HashSet;

use crate::nlp::constants::{STOP_WORDS, SUBJECT_STOP_WORDS};
use crate::types::{Operation, Token, TokenType};
use crate::util::collapse_whitespace;

/// Join the remaining words in their original order.
///
/// For a create this is the new event's title: numbers are kept and so are
/// words like `עם` (`פגישה עם דוקטור`). For update/delete it is the subject
/// used to find an existing event, so connective words are dropped as well
/// and stray numbers are reported.
///
/// `excluded` holds token indices already consumed elsewhere (field phrases,
/// an explicit event id).
pub fn extract_title(
    tokens: &[Token],
    operation: Operation,
    excluded: &HashSet<usize>,
    warnings: &mut Vec<String>,
) -> String {
    let subject_mode = operation != Operation::Create;
    let mut words = Vec::new();

    for (i, token) in tokens.iter().enumerate() {
        if excluded.contains(&i) {
            continue;
        }
        let text = token.text.as_str();
        match token.kind {
            TokenType::Text => {
                if STOP_WORDS.contains(&text) || (subject_mode && SUBJECT_STOP_WORDS.contains(&text)) {
                    continue;
                }
                words.push(text);
            }
            TokenType::Number if subject_mode => {
                warnings.push(format!("המספר \"{}\" התעלם", text));
            }
            TokenType::Number => words.push(text),
            _ => {}
        }
    }

    collapse_whitespace(&words.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalize::normalize;
    use crate::nlp::tokenize::tokenize;

    fn title(text: &str, operation: Operation) -> (String, Vec<String>) {
        let tokens = tokenize(&normalize(text));
        let mut warnings = Vec::new();
        let title = extract_title(&tokens, operation, &HashSet::new(), &mut warnings);
        (title, warnings)
    }

    #[test]
    fn test_subject_drops_connectives() {
        assert_eq!(title("מחק פגישה עם דוקטור", Operation::Delete).0, "פגישה דוקטור");
        assert_eq!(title("העבר את הפגישה של דנה ל-15:00", Operation::Update).0, "הפגישה דנה");
    }

    #[test]
    fn test_create_title_keeps_connectives_and_numbers() {
        let (title, warnings) = title("מחר 10:00 פגישה עם דוקטור בחדר 5", Operation::Create);
        assert_eq!(title, "פגישה עם דוקטור בחדר 5");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_create_title_excludes_every_slot() {
        let text = "מחר 09:00 פגישת צוות שעתיים עם dani@example.com תזכורות 30,10 צבע כחול";
        assert_eq!(title(text, Operation::Create).0, "פגישת צוות");
    }

    #[test]
    fn test_stray_number_in_subject_warns() {
        let (title, warnings) = title("מחק פגישה 3", Operation::Delete);
        assert_eq!(title, "פגישה");
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_excluded_tokens_are_skipped() {
        let tokens = tokenize("עדכן פגישה מיקום משרד");
        let mut warnings = Vec::new();
        let excluded = HashSet::from([2, 3]);
        assert_eq!(
            extract_title(&tokens, Operation::Update, &excluded, &mut warnings),
            "פגישה"
        );
    }
}
