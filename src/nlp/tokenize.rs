//! Tokenizer: whitespace words → classified tokens.
//!
//! At each word position an ordered rule list is tried; the first rule that
//! matches decides the type and how many words the token spans. Rules are
//! plain functions over the word slice, so tokenization has no shared state.

use std::sync::OnceLock;

use regex::Regex;

use super::constants::{
    self, BEFORE_WORDS, COLOR_KEYWORDS, DAILY_WORDS, DAY_WORDS, EVERY_WORDS, GUEST_KEYWORD,
    HOUR_UNITS, MINUTE_UNITS, NEXT_MARKERS, RELATIVE_DAYS, REMINDER_KEYWORDS, TIMES_WORDS,
    UNTIL_WORDS, WEEKLY_WORDS,
};
use crate::types::{Token, TokenType};

// Compile-once regex patterns via OnceLock.
pub(crate) fn re_email() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+$").unwrap()
    })
}

/// `09:00`, `ל-15:00`, `14:00-15:30`
pub(crate) fn re_time() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[בלמ]-?)?(\d{1,2}):(\d{2})(?:-(\d{1,2}):(\d{2}))?$").unwrap()
    })
}

/// `31.12`, `ב-15.11`, `1.2.27`
pub(crate) fn re_numeric_date() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:[בלמ]-?)?(\d{1,2})\.(\d{1,2})(?:\.(\d{4}|\d{2}))?$").unwrap()
    })
}

fn re_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+$").unwrap())
}

fn re_decimal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(?:\.\d+)?$").unwrap())
}

pub(crate) fn re_number_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+(?:,\d+)*$").unwrap())
}

/// A whitespace-separated word with its offsets in the normalized string.
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    text: &'a str,
    /// Character offset
    index: usize,
    byte_start: usize,
    byte_end: usize,
}

fn split_words(text: &str) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut start: Option<(usize, usize)> = None;
    let mut char_index = 0;

    for (byte, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some((b, ci)) = start.take() {
                words.push(Word {
                    text: &text[b..byte],
                    index: ci,
                    byte_start: b,
                    byte_end: byte,
                });
            }
        } else if start.is_none() {
            start = Some((byte, char_index));
        }
        char_index += 1;
    }
    if let Some((b, ci)) = start {
        words.push(Word {
            text: &text[b..],
            index: ci,
            byte_start: b,
            byte_end: text.len(),
        });
    }
    words
}

/// Words consumed and the resulting type.
type RuleMatch = Option<(usize, TokenType)>;
type Rule = fn(&[Word<'_>], usize) -> RuleMatch;

/// Precedence order. First match wins.
const RULES: &[Rule] = &[
    rule_email,
    rule_time,
    rule_date,
    rule_duration,
    rule_recurrence,
    rule_color,
    rule_reminder,
    rule_action,
    rule_guest_keyword,
    rule_number,
];

fn word_at<'a>(words: &[Word<'a>], i: usize) -> Option<&'a str> {
    words.get(i).map(|w| w.text)
}

fn is_in(words: &[Word<'_>], i: usize, list: &[&str]) -> bool {
    word_at(words, i).is_some_and(|w| list.contains(&w))
}

fn rule_email(words: &[Word<'_>], i: usize) -> RuleMatch {
    re_email()
        .is_match(words[i].text)
        .then_some((1, TokenType::Email))
}

fn rule_time(words: &[Word<'_>], i: usize) -> RuleMatch {
    re_time().is_match(words[i].text).then_some((1, TokenType::Time))
}

fn rule_date(words: &[Word<'_>], i: usize) -> RuleMatch {
    let w = words[i].text;

    // `1.5 שעות` is a duration, not the first of May.
    if re_numeric_date().is_match(w) {
        let followed_by_unit = is_in(words, i + 1, HOUR_UNITS) || is_in(words, i + 1, MINUTE_UNITS);
        return (!followed_by_unit).then_some((1, TokenType::Date));
    }

    if constants::lookup(RELATIVE_DAYS, w).is_some() {
        return Some((1, TokenType::Date));
    }

    // All-day markers
    if (w == "כל" && is_in(words, i + 1, &["היום"])) || (w == "יום" && is_in(words, i + 1, &["מלא"]))
    {
        return Some((2, TokenType::Date));
    }

    // `יום שלישי [הבא]`, `ביום שלישי [הבא]`
    if DAY_WORDS.contains(&w) {
        let weekday = word_at(words, i + 1).and_then(|n| constants::lookup(constants::WEEKDAYS, n));
        if weekday.is_some() {
            let len = if is_in(words, i + 2, NEXT_MARKERS) { 3 } else { 2 };
            return Some((len, TokenType::Date));
        }
        return None;
    }

    // `שלישי הבא`, `בשלישי [הבא]`; a bare weekday is too ambiguous (שני = "second").
    if constants::weekday_of(w).is_some() {
        let has_next = is_in(words, i + 1, NEXT_MARKERS);
        let prefixed = constants::lookup(constants::WEEKDAYS, w).is_none();
        if has_next {
            return Some((2, TokenType::Date));
        }
        if prefixed {
            return Some((1, TokenType::Date));
        }
    }

    None
}

fn rule_duration(words: &[Word<'_>], i: usize) -> RuleMatch {
    let w = words[i].text;

    if re_decimal().is_match(w)
        && (is_in(words, i + 1, HOUR_UNITS) || is_in(words, i + 1, MINUTE_UNITS))
    {
        return Some((2, TokenType::Duration));
    }

    match w {
        "שעה" if is_in(words, i + 1, &["וחצי", "ורבע"]) => Some((2, TokenType::Duration)),
        "חצי" | "רבע" if is_in(words, i + 1, &["שעה"]) => Some((2, TokenType::Duration)),
        "שעתיים" | "שעה" => Some((1, TokenType::Duration)),
        _ => None,
    }
}

fn rule_recurrence(words: &[Word<'_>], i: usize) -> RuleMatch {
    let w = words[i].text;

    if EVERY_WORDS.contains(&w) && is_in(words, i + 1, &["יום", "שבוע"]) {
        return Some((2, TokenType::Recurrence));
    }
    if DAILY_WORDS.contains(&w) || WEEKLY_WORDS.contains(&w) {
        return Some((1, TokenType::Recurrence));
    }
    if UNTIL_WORDS.contains(&w)
        && word_at(words, i + 1).is_some_and(|n| re_numeric_date().is_match(n))
    {
        return Some((2, TokenType::Recurrence));
    }
    if re_number().is_match(w) && is_in(words, i + 1, TIMES_WORDS) {
        return Some((2, TokenType::Recurrence));
    }
    None
}

fn rule_color(words: &[Word<'_>], i: usize) -> RuleMatch {
    let w = words[i].text;
    if COLOR_KEYWORDS.contains(&w) && words.get(i + 1).is_some() {
        return Some((2, TokenType::Color));
    }
    constants::color_of(w).map(|_| (1, TokenType::Color))
}

fn rule_reminder(words: &[Word<'_>], i: usize) -> RuleMatch {
    if !REMINDER_KEYWORDS.contains(&words[i].text) {
        return None;
    }
    if !word_at(words, i + 1).is_some_and(|n| re_number_list().is_match(n)) {
        return None;
    }

    // `תזכורות 30 10` once the comma after 30 is stripped
    let mut len = 2;
    while word_at(words, i + len).is_some_and(|n| re_number_list().is_match(n))
        && !is_in(words, i + len + 1, TIMES_WORDS)
        && !is_in(words, i + len + 1, HOUR_UNITS)
    {
        len += 1;
    }
    if is_in(words, i + len, MINUTE_UNITS) {
        len += 1;
    }
    if is_in(words, i + len, BEFORE_WORDS) {
        len += 1;
    }
    Some((len, TokenType::Reminder))
}

fn rule_action(words: &[Word<'_>], i: usize) -> RuleMatch {
    (i == 0 && constants::action_of(words[i].text).is_some()).then_some((1, TokenType::Action))
}

fn rule_guest_keyword(words: &[Word<'_>], i: usize) -> RuleMatch {
    let followed_by_email = word_at(words, i + 1).is_some_and(|n| re_email().is_match(n));
    (words[i].text == GUEST_KEYWORD && followed_by_email).then_some((1, TokenType::GuestKeyword))
}

fn rule_number(words: &[Word<'_>], i: usize) -> RuleMatch {
    re_number()
        .is_match(words[i].text)
        .then_some((1, TokenType::Number))
}

/// Split normalized text into ordered, classified tokens. Never fails.
pub fn tokenize(normalized: &str) -> Vec<Token> {
    let words = split_words(normalized);
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;

    while i < words.len() {
        let (len, kind) = RULES
            .iter()
            .find_map(|rule| rule(&words, i))
            .unwrap_or((1, TokenType::Text));
        let last = (i + len).min(words.len()) - 1;
        let text = &normalized[words[i].byte_start..words[last].byte_end];
        tokens.push(Token::new(text, words[i].index, kind));
        i = last + 1;
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(String, TokenType)> {
        tokenize(text)
            .into_iter()
            .map(|t| (t.text, t.kind))
            .collect()
    }

    #[test]
    fn test_full_create_command() {
        let tokens = kinds(
            "מחר 09:00 פגישת צוות שעתיים עם dani@example.com תזכורות 30,10 צבע כחול",
        );
        let expected = vec![
            ("מחר", TokenType::Date),
            ("09:00", TokenType::Time),
            ("פגישת", TokenType::Text),
            ("צוות", TokenType::Text),
            ("שעתיים", TokenType::Duration),
            ("עם", TokenType::GuestKeyword),
            ("dani@example.com", TokenType::Email),
            ("תזכורות 30,10", TokenType::Reminder),
            ("צבע כחול", TokenType::Color),
        ];
        assert_eq!(tokens.len(), expected.len());
        for ((text, kind), (exp_text, exp_kind)) in tokens.iter().zip(expected) {
            assert_eq!(text, exp_text);
            assert_eq!(*kind, exp_kind);
        }
    }

    #[test]
    fn test_offsets_are_character_positions() {
        let tokens = tokenize("מחר 09:00 פגישה");
        assert_eq!(tokens[0].index, 0);
        assert_eq!(tokens[1].index, 4);
        assert_eq!(tokens[2].index, 10);
    }

    #[test]
    fn test_multi_word_phrases() {
        let tokens = kinds("שלישי הבא 14:00-15:30 סינק מוצר כל שבוע עד 31.12");
        assert_eq!(tokens[0], ("שלישי הבא".to_string(), TokenType::Date));
        assert_eq!(tokens[1], ("14:00-15:30".to_string(), TokenType::Time));
        assert_eq!(tokens[4], ("כל שבוע".to_string(), TokenType::Recurrence));
        assert_eq!(tokens[5], ("עד 31.12".to_string(), TokenType::Recurrence));
    }

    #[test]
    fn test_all_day_is_not_daily_recurrence() {
        let tokens = kinds("15.11 יום מלא האקתון כל היום");
        assert_eq!(tokens[1], ("יום מלא".to_string(), TokenType::Date));
        assert_eq!(tokens[3], ("כל היום".to_string(), TokenType::Date));

        let daily = kinds("כל יום 08:30");
        assert_eq!(daily[0], ("כל יום".to_string(), TokenType::Recurrence));
    }

    #[test]
    fn test_durations() {
        assert_eq!(kinds("חצי שעה")[0].1, TokenType::Duration);
        assert_eq!(kinds("שעה וחצי")[0], ("שעה וחצי".to_string(), TokenType::Duration));
        assert_eq!(kinds("45 דקות")[0], ("45 דקות".to_string(), TokenType::Duration));
        assert_eq!(kinds("1.5 שעות")[0], ("1.5 שעות".to_string(), TokenType::Duration));
    }

    #[test]
    fn test_prefixed_time_and_bare_weekday() {
        assert_eq!(kinds("ל-15:00")[0].1, TokenType::Time);
        assert_eq!(kinds("בשלישי")[0].1, TokenType::Date);
        // Without a prefix or `הבא`, `שני` stays text.
        assert_eq!(kinds("מבחן שני")[1].1, TokenType::Text);
    }

    #[test]
    fn test_action_only_at_start() {
        let tokens = kinds("שנה פגישה לכל שבוע");
        assert_eq!(tokens[0].1, TokenType::Action);
        assert_eq!(tokens[2], ("לכל שבוע".to_string(), TokenType::Recurrence));

        let later = kinds("פגישה שנה");
        assert_eq!(later[1].1, TokenType::Text);
    }

    #[test]
    fn test_guest_keyword_needs_email() {
        assert_eq!(kinds("פגישה עם דוקטור")[1].1, TokenType::Text);
        assert_eq!(kinds("עם a@b.co")[0].1, TokenType::GuestKeyword);
    }

    #[test]
    fn test_reminder_with_unit_and_before() {
        let tokens = kinds("תזכורת 10 דקות לפני");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].1, TokenType::Reminder);
    }

    #[test]
    fn test_reminder_list_split_by_spaces() {
        let tokens = kinds("תזכורות 30 10 פגישה");
        assert_eq!(tokens[0], ("תזכורות 30 10".to_string(), TokenType::Reminder));
        assert_eq!(tokens[1].1, TokenType::Text);

        // A following count or duration keeps its own number.
        let tokens = kinds("תזכורת 10 5 פעמים");
        assert_eq!(tokens[0], ("תזכורת 10".to_string(), TokenType::Reminder));
        assert_eq!(tokens[1], ("5 פעמים".to_string(), TokenType::Recurrence));
    }

    #[test]
    fn test_occurrence_count() {
        let tokens = kinds("כל שבוע 5 פעמים");
        assert_eq!(tokens[1], ("5 פעמים".to_string(), TokenType::Recurrence));
    }

    #[test]
    fn test_numbers_and_text_fallback() {
        let tokens = kinds("משרד 3");
        assert_eq!(tokens[0].1, TokenType::Text);
        assert_eq!(tokens[1].1, TokenType::Number);
        assert!(tokenize("").is_empty());
    }
}
