use std::collections::HashSet;

use crate::nlp::constants::{GUEST_ADD_WORDS, GUEST_REMOVE_WORDS};
use crate::types::{Token, TokenType};

/// Guest addresses, lower-cased and de-duplicated in first-seen order.
///
/// `add` and `remove` are only meaningful for updates: an address after
/// `הסר`/`בלי`/`ללא` is removed, any other is added. Every address also
/// appears in `all`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuestSlots {
    pub all: Vec<String>,
    pub add: Vec<String>,
    pub remove: Vec<String>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Add,
    Remove,
}

/// `skip` is the index of a token already consumed as an explicit event id.
pub fn extract_guests(tokens: &[Token], skip: Option<usize>, warnings: &mut Vec<String>) -> GuestSlots {
    let mut slots = GuestSlots::default();
    let mut seen = HashSet::new();
    let mut mode = Mode::Add;

    for (i, token) in tokens.iter().enumerate() {
        if GUEST_REMOVE_WORDS.contains(&token.text.as_str()) {
            mode = Mode::Remove;
            continue;
        }
        if GUEST_ADD_WORDS.contains(&token.text.as_str()) {
            mode = Mode::Add;
            continue;
        }
        if token.kind != TokenType::Email || Some(i) == skip {
            continue;
        }

        let email = token.text.to_lowercase();
        match mode {
            Mode::Add => push_unique(&mut slots.add, &email),
            Mode::Remove => push_unique(&mut slots.remove, &email),
        }
        if seen.insert(email.clone()) {
            slots.all.push(email);
        }
    }

    let removed: HashSet<&String> = slots.remove.iter().collect();
    let before = slots.add.len();
    slots.add.retain(|email| {
        let conflict = removed.contains(email);
        if conflict {
            warnings.push(format!("{} גם נוסף וגם הוסר; ההוספה בוטלה", email));
        }
        !conflict
    });
    if slots.add.len() != before {
        log::debug!("Dropped {} conflicting guest additions", before - slots.add.len());
    }

    slots
}

fn push_unique(list: &mut Vec<String>, email: &str) {
    if !list.iter().any(|e| e == email) {
        list.push(email.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nlp::normalize::normalize;
    use crate::nlp::tokenize::tokenize;

    fn guests(text: &str) -> (GuestSlots, Vec<String>) {
        let tokens = tokenize(&normalize(text));
        let mut warnings = Vec::new();
        (extract_guests(&tokens, None, &mut warnings), warnings)
    }

    #[test]
    fn test_lowercases_and_dedupes() {
        let (slots, _) = guests("פגישה עם Dani@Example.com ו dani@example.com b@x.io");
        assert_eq!(slots.all, vec!["dani@example.com", "b@x.io"]);
    }

    #[test]
    fn test_splits_add_and_remove() {
        let (slots, warnings) = guests("עדכן פגישה הוסף a@x.io הסר b@x.io");
        assert_eq!(slots.add, vec!["a@x.io"]);
        assert_eq!(slots.remove, vec!["b@x.io"]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_address_in_both_lists_is_not_added() {
        let (slots, warnings) = guests("עדכן פגישה עם a@x.io בלי a@x.io");
        assert!(slots.add.is_empty());
        assert_eq!(slots.remove, vec!["a@x.io"]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_skips_explicit_id_token() {
        let tokens = tokenize("מחק a@x.io");
        let mut warnings = Vec::new();
        let slots = extract_guests(&tokens, Some(1), &mut warnings);
        assert!(slots.all.is_empty());
    }
}
