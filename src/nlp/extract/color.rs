use crate::nlp::constants;
use crate::types::{EventColor, Token, TokenType};

/// Color from `צבע <name>` or a bare color word. An unknown name is
/// dropped with a warning.
pub fn extract_color(tokens: &[Token], warnings: &mut Vec<String>) -> Option<EventColor> {
    let mut color = None;
    for token in tokens.iter().filter(|t| t.kind == TokenType::Color) {
        let name = token.text.split_whitespace().last().unwrap_or_default();
        match constants::color_of(name) {
            Some(c) if color.is_none() => color = Some(c),
            Some(_) => warnings.push(format!("צבע נוסף \"{}\" התעלם", name)),
            None => warnings.push(format!("צבע לא מוכר \"{}\" התעלם", name)),
        }
    }
    color
}
