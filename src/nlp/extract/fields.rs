//! Free-text field phrases: `מיקום <…>`, `תיאור <…>` and, for updates,
//! `כותרת [של] <old> ל <new>`.
//!
//! A phrase starts at its keyword and runs over text and number tokens
//! until the next slot token, field keyword or guest verb.

use std::collections::HashSet;

use crate::nlp::constants::{
    DESCRIPTION_KEYWORDS, GUEST_KEYWORD, GUEST_ADD_WORDS, GUEST_REMOVE_WORDS, LOCATION_KEYWORDS,
    OF_WORDS, RENAME_SEPARATORS, TITLE_KEYWORDS,
};
use crate::types::{Token, TokenType};

#[derive(Debug, Clone, PartialEq)]
pub struct Rename {
    /// The existing title, when the phrase names it
    pub subject: Option<String>,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSlots {
    pub location: Option<String>,
    pub description: Option<String>,
    pub rename: Option<Rename>,
    /// Token indices that belong to a field phrase, keywords included
    pub consumed: HashSet<usize>,
}

#[derive(Clone, Copy)]
enum Field {
    Location,
    Description,
    Title,
}

fn field_of(text: &str, allow_rename: bool) -> Option<Field> {
    if LOCATION_KEYWORDS.contains(&text) {
        Some(Field::Location)
    } else if DESCRIPTION_KEYWORDS.contains(&text) {
        Some(Field::Description)
    } else if allow_rename && TITLE_KEYWORDS.contains(&text) {
        Some(Field::Title)
    } else {
        None
    }
}

pub fn extract_fields(tokens: &[Token], allow_rename: bool, warnings: &mut Vec<String>) -> FieldSlots {
    let mut slots = FieldSlots::default();
    let mut i = 0;

    while i < tokens.len() {
        let field = match tokens[i].kind {
            TokenType::Text => field_of(&tokens[i].text, allow_rename),
            _ => None,
        };
        let Some(field) = field else {
            i += 1;
            continue;
        };

        let mut j = i + 1;
        while j < tokens.len()
            && matches!(tokens[j].kind, TokenType::Text | TokenType::Number)
            && !ends_phrase(&tokens[j].text, allow_rename)
        {
            j += 1;
        }
        slots.consumed.extend(i..j);

        let words: Vec<&str> = tokens[i + 1..j].iter().map(|t| t.text.as_str()).collect();
        if words.is_empty() {
            warnings.push(format!("\"{}\" ללא ערך התעלם", tokens[i].text));
        } else {
            match field {
                Field::Location => slots.location = Some(words.join(" ")),
                Field::Description => slots.description = Some(words.join(" ")),
                Field::Title => match split_rename(&words) {
                    Some(rename) => slots.rename = Some(rename),
                    None => warnings.push("לא נמצאה כותרת חדשה".to_string()),
                },
            }
        }
        i = j;
    }

    slots
}

/// `עם` is allowed inside a phrase (`בית קפה עם נוף`); the other guest verbs are not.
fn ends_phrase(text: &str, allow_rename: bool) -> bool {
    field_of(text, allow_rename).is_some()
        || GUEST_REMOVE_WORDS.contains(&text)
        || (GUEST_ADD_WORDS.contains(&text) && text != GUEST_KEYWORD)
}

fn split_rename(words: &[&str]) -> Option<Rename> {
    let start = words.iter().take_while(|w| OF_WORDS.contains(w)).count();
    let words = &words[start..];

    let (subject, title) = match words.iter().position(|w| RENAME_SEPARATORS.contains(w)) {
        Some(p) => (&words[..p], &words[p + 1..]),
        None => (&words[..0], words),
    };
    if title.is_empty() {
        return None;
    }

    Some(Rename {
        subject: (!subject.is_empty()).then(|| subject.join(" ")),
        title: title.join(" "),
    })
}
