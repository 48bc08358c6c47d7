//! Hebrew vocabulary shared by the tokenizer, extractors and title extraction.

use crate::types::{EventColor, Operation};

/// Weekday names with their index (Sunday = 0).
pub const WEEKDAYS: &[(&str, u8)] = &[
    ("ראשון", 0),
    ("שני", 1),
    ("שלישי", 2),
    ("רביעי", 3),
    ("חמישי", 4),
    ("שישי", 5),
    ("שבת", 6),
];

/// Relative day words with their offset from today.
pub const RELATIVE_DAYS: &[(&str, i64)] = &[
    ("היום", 0),
    ("להיום", 0),
    ("מחר", 1),
    ("למחר", 1),
    ("מחרתיים", 2),
    ("למחרתיים", 2),
];

/// Words that turn a weekday into "the next one".
pub const NEXT_MARKERS: &[&str] = &["הבא", "הבאה", "הקרוב", "הקרובה"];

pub const DAY_WORDS: &[&str] = &["יום", "ביום"];

pub const HOUR_UNITS: &[&str] = &["שעה", "שעות"];
pub const MINUTE_UNITS: &[&str] = &["דקות", "דקה", "דק"];

pub const EVERY_WORDS: &[&str] = &["כל", "לכל", "מדי"];
pub const DAILY_WORDS: &[&str] = &["יומי", "יומית"];
pub const WEEKLY_WORDS: &[&str] = &["שבועי", "שבועית"];
pub const UNTIL_WORDS: &[&str] = &["עד"];
pub const TIMES_WORDS: &[&str] = &["פעמים"];

pub const COLOR_KEYWORDS: &[&str] = &["צבע", "בצבע"];

pub const COLORS: &[(&str, EventColor)] = &[
    ("אדום", EventColor::Red),
    ("אדומה", EventColor::Red),
    ("כחול", EventColor::Blue),
    ("כחולה", EventColor::Blue),
    ("ירוק", EventColor::Green),
    ("ירוקה", EventColor::Green),
    ("צהוב", EventColor::Yellow),
    ("צהובה", EventColor::Yellow),
    ("כתום", EventColor::Orange),
    ("כתומה", EventColor::Orange),
    ("סגול", EventColor::Purple),
    ("סגולה", EventColor::Purple),
    ("ורוד", EventColor::Pink),
    ("ורודה", EventColor::Pink),
];

pub const REMINDER_KEYWORDS: &[&str] = &["תזכורת", "תזכורות"];
pub const BEFORE_WORDS: &[&str] = &["לפני"];

/// Leading verbs and the operation they select.
pub const ACTIONS: &[(&str, Operation)] = &[
    ("מחק", Operation::Delete),
    ("מחקי", Operation::Delete),
    ("תמחק", Operation::Delete),
    ("תמחקי", Operation::Delete),
    ("בטל", Operation::Delete),
    ("בטלי", Operation::Delete),
    ("תבטל", Operation::Delete),
    ("עדכן", Operation::Update),
    ("עדכני", Operation::Update),
    ("תעדכן", Operation::Update),
    ("שנה", Operation::Update),
    ("תשנה", Operation::Update),
    ("העבר", Operation::Update),
    ("העבירי", Operation::Update),
    ("תעביר", Operation::Update),
    ("הזז", Operation::Update),
    ("הזיזי", Operation::Update),
    ("תזיז", Operation::Update),
    ("דחה", Operation::Update),
    ("דחי", Operation::Update),
    ("תדחה", Operation::Update),
    ("צור", Operation::Create),
    ("צרי", Operation::Create),
    ("תיצור", Operation::Create),
    ("קבע", Operation::Create),
    ("קבעי", Operation::Create),
    ("תקבע", Operation::Create),
    ("הוסף", Operation::Create),
    ("הוסיפי", Operation::Create),
    ("תוסיף", Operation::Create),
];

pub const GUEST_KEYWORD: &str = "עם";
pub const GUEST_ADD_WORDS: &[&str] = &["הוסף", "הזמן", "עם"];
pub const GUEST_REMOVE_WORDS: &[&str] = &["הסר", "הורד", "בלי", "ללא"];

pub const LOCATION_KEYWORDS: &[&str] = &["מיקום", "במיקום", "מקום"];
pub const DESCRIPTION_KEYWORDS: &[&str] = &["תיאור", "בתיאור"];
pub const TITLE_KEYWORDS: &[&str] = &["כותרת", "הכותרת", "שם", "השם"];
/// Separates the old title from the new one in a rename.
pub const RENAME_SEPARATORS: &[&str] = &["ל", "ל-", "לכותרת"];
pub const OF_WORDS: &[&str] = &["של", "את"];

/// Dropped from every title.
pub const STOP_WORDS: &[&str] = &[
    "ב", "ל", "ל-", "ב-", "מ-", "-", "עד", "בשעה", "לשעה", "משעה", "בשעות", "בתאריך", "לתאריך",
];

/// Additionally dropped when the title is only used to find an existing event.
pub const SUBJECT_STOP_WORDS: &[&str] = &[
    "של", "עם", "את", "זמן", "הוסף", "הזמן", "הסר", "הורד", "בלי", "ללא",
];

pub fn lookup<T: Copy>(table: &[(&str, T)], word: &str) -> Option<T> {
    table
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, value)| *value)
}

/// Weekday index for `שלישי` or a prefixed `בשלישי`.
pub fn weekday_of(word: &str) -> Option<u8> {
    lookup(WEEKDAYS, word).or_else(|| word.strip_prefix('ב').and_then(|w| lookup(WEEKDAYS, w)))
}

pub fn action_of(word: &str) -> Option<Operation> {
    lookup(ACTIONS, word)
}

pub fn color_of(word: &str) -> Option<EventColor> {
    lookup(COLORS, word)
}
