//! Hebrew free-text calendar commands.
//!
//! Turns one Hebrew sentence (`מחר 09:00 פגישת צוות שעתיים`) into a typed,
//! validated create/update/delete operation, resolving references to
//! existing events against a caller-supplied candidate list.

pub mod config;
pub mod error;
pub mod nlp;
pub mod response;
pub mod slots;
pub mod types;
pub mod util;

pub use config::{load_config, load_default_config, NlpConfig};
pub use error::{ConfigError, ErrorCode, NlpError};
pub use nlp::parse_command;
pub use response::{ApiResponse, ParseNlpResponse, SuggestSlotsResponse};
pub use slots::suggest_slots;
