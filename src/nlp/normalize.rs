//! Hebrew text normalization.
//!
//! Removes niqqud and cantillation marks, folds dash variants to `-`, and
//! strips sentence punctuation. Commas between digits (`30,10`) and dots
//! inside a word (`31.12`, `dani@example.com`) are kept.

use unicode_normalization::UnicodeNormalization;

const MAQAF: char = '\u{05BE}';

fn is_hebrew_mark(c: char) -> bool {
    ('\u{0591}'..='\u{05C7}').contains(&c)
}

fn fold_dash(c: char) -> char {
    match c {
        MAQAF | '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2212}' => '-',
        other => other,
    }
}

/// Normalize a raw command. Never fails; idempotent.
pub fn normalize(text: &str) -> String {
    let unmarked: String = text
        .nfd()
        .map(fold_dash)
        .filter(|c| !is_hebrew_mark(*c))
        .nfc()
        .collect();

    // Each pass only ever turns punctuation into spaces, so this converges.
    let mut current = collapse(&unmarked);
    loop {
        let next = strip_punctuation(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn strip_punctuation(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        let prev = if i > 0 { chars.get(i - 1).copied() } else { None };
        let next = chars.get(i + 1).copied();
        let keep = match c {
            ',' => prev.is_some_and(|p| p.is_ascii_digit()) && next.is_some_and(|n| n.is_ascii_digit()),
            '.' => prev.is_some_and(is_word_char) && next.is_some_and(is_word_char),
            '!' | '?' | ';' => false,
            _ => true,
        };
        out.push(if keep { c } else { ' ' });
    }

    collapse(&out)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '.' | '!' | '?' | ';')
}

fn collapse(text: &str) -> String {
    crate::util::collapse_whitespace(text)
}
