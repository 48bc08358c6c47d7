use crate::nlp::constants::{HOUR_UNITS, MINUTE_UNITS};
use crate::types::{Token, TokenType};

/// Minutes named by the first duration token. Later ones are ignored.
pub fn extract_duration(tokens: &[Token], warnings: &mut Vec<String>) -> Option<u32> {
    let mut found = None;
    for token in tokens.iter().filter(|t| t.kind == TokenType::Duration) {
        match (found, duration_minutes(&token.text)) {
            (None, Some(minutes)) => found = Some(minutes),
            (Some(_), _) => warnings.push(format!("משך נוסף \"{}\" התעלם", token.text)),
            (None, None) => warnings.push(format!("משך לא תקין \"{}\" התעלם", token.text)),
        }
    }
    found
}

/// `שעתיים` → 120, `1.5 שעות` → 90, `45 דקות` → 45.
pub fn duration_minutes(text: &str) -> Option<u32> {
    match text {
        "שעה" => return Some(60),
        "שעתיים" => return Some(120),
        "חצי שעה" => return Some(30),
        "רבע שעה" => return Some(15),
        "שעה וחצי" => return Some(90),
        "שעה ורבע" => return Some(75),
        _ => {}
    }

    let (amount, unit) = text.split_once(' ')?;
    let amount: f64 = amount.parse().ok()?;
    let minutes = if HOUR_UNITS.contains(&unit) {
        amount * 60.0
    } else if MINUTE_UNITS.contains(&unit) {
        amount
    } else {
        return None;
    };

    let minutes = minutes.round();
    (minutes > 0.0 && minutes <= u32::MAX as f64).then_some(minutes as u32)
}
