use crate::nlp::tokenize::re_number_list;
use crate::types::{Token, TokenType};

/// Minute offsets from every reminder token, in order. Duplicates are kept.
pub fn extract_reminders(tokens: &[Token], warnings: &mut Vec<String>) -> Option<Vec<u32>> {
    let mut values = Vec::new();

    for token in tokens.iter().filter(|t| t.kind == TokenType::Reminder) {
        let lists = token
            .text
            .split_whitespace()
            .filter(|w| re_number_list().is_match(w));
        for value in lists.flat_map(|list| list.split(',')) {
            match value.parse::<u32>() {
                Ok(minutes) => values.push(minutes),
                Err(_) => warnings.push(format!("תזכורת לא תקינה \"{}\" התעלמה", value)),
            }
        }
    }

    (!values.is_empty()).then_some(values)
}
