//! Parser configuration: matching thresholds, default duration, time zone,
//! and working hours for slot suggestions.
//!
//! Loaded from `~/.hebcal/config.json` (camelCase). Every field has a
//! default, so a missing file or a partial file is fine.

use std::fs;
use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Asia::Jerusalem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NlpConfig {
    /// IANA zone used to interpret wall-clock times in commands
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Event length when the command names a start but no end or duration
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub slots: SlotConfig,
}

/// Fuzzy title matching policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
    /// Top score needed to auto-select a single candidate
    #[serde(default = "default_high_confidence")]
    pub high_confidence: f64,
    /// Minimum lead of the top score over the runner-up for auto-select
    #[serde(default = "default_ambiguity_margin")]
    pub ambiguity_margin: f64,
    /// Candidates below this score are never offered
    #[serde(default = "default_min_score")]
    pub min_score: f64,
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Upper bound on computed edit distance
    #[serde(default = "default_distance_cap")]
    pub distance_cap: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotConfig {
    #[serde(default = "default_work_hours_start")]
    pub work_hours_start: u8,
    #[serde(default = "default_work_hours_end")]
    pub work_hours_end: u8,
    /// Suggested slots start on multiples of this many minutes
    #[serde(default = "default_granularity_minutes")]
    pub granularity_minutes: u32,
    #[serde(default = "default_search_days")]
    pub default_search_days: u32,
    #[serde(default = "default_max_suggestions")]
    pub default_max_suggestions: usize,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.name().to_string()
}
fn default_duration_minutes() -> u32 {
    60
}
fn default_high_confidence() -> f64 {
    0.75
}
fn default_ambiguity_margin() -> f64 {
    0.15
}
fn default_min_score() -> f64 {
    0.4
}
fn default_max_candidates() -> usize {
    5
}
fn default_distance_cap() -> usize {
    64
}
fn default_work_hours_start() -> u8 {
    9
}
fn default_work_hours_end() -> u8 {
    18
}
fn default_granularity_minutes() -> u32 {
    15
}

/// Upper bound for `slots.defaultSearchDays`.
pub const MAX_SEARCH_DAYS: u32 = 366;

fn default_search_days() -> u32 {
    7
}
fn default_max_suggestions() -> usize {
    3
}

impl Default for NlpConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
            default_duration_minutes: default_duration_minutes(),
            matching: MatchingConfig::default(),
            slots: SlotConfig::default(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            high_confidence: default_high_confidence(),
            ambiguity_margin: default_ambiguity_margin(),
            min_score: default_min_score(),
            max_candidates: default_max_candidates(),
            distance_cap: default_distance_cap(),
        }
    }
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            work_hours_start: default_work_hours_start(),
            work_hours_end: default_work_hours_end(),
            granularity_minutes: default_granularity_minutes(),
            default_search_days: default_search_days(),
            default_max_suggestions: default_max_suggestions(),
        }
    }
}

impl NlpConfig {
    /// Configured zone, falling back to Asia/Jerusalem when the name is unknown.
    pub fn tz(&self) -> Tz {
        match self.time_zone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                log::warn!(
                    "Unknown time zone '{}'; using {}",
                    self.time_zone,
                    DEFAULT_TIME_ZONE
                );
                DEFAULT_TIME_ZONE
            }
        }
    }

    /// Check ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_zone.parse::<Tz>().is_err() {
            return Err(invalid("timeZone", format!("unknown zone '{}'", self.time_zone)));
        }
        if self.default_duration_minutes == 0 {
            return Err(invalid("defaultDurationMinutes", "must be positive".to_string()));
        }

        let m = &self.matching;
        for (field, value) in [
            ("matching.highConfidence", m.high_confidence),
            ("matching.ambiguityMargin", m.ambiguity_margin),
            ("matching.minScore", m.min_score),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, format!("{} is outside 0.0–1.0", value)));
            }
        }
        if m.min_score > m.high_confidence {
            return Err(invalid(
                "matching.minScore",
                "must not exceed highConfidence".to_string(),
            ));
        }
        if m.max_candidates == 0 {
            return Err(invalid("matching.maxCandidates", "must be positive".to_string()));
        }
        if m.distance_cap == 0 {
            return Err(invalid("matching.distanceCap", "must be positive".to_string()));
        }

        let s = &self.slots;
        if s.work_hours_start >= s.work_hours_end || s.work_hours_end > 24 {
            return Err(invalid(
                "slots.workHoursEnd",
                format!(
                    "working hours {}–{} are not a valid range",
                    s.work_hours_start, s.work_hours_end
                ),
            ));
        }
        if s.granularity_minutes == 0 || s.granularity_minutes > 60 {
            return Err(invalid(
                "slots.granularityMinutes",
                "must be between 1 and 60".to_string(),
            ));
        }
        if !(1..=MAX_SEARCH_DAYS).contains(&s.default_search_days) {
            return Err(invalid(
                "slots.defaultSearchDays",
                format!("must be between 1 and {}", MAX_SEARCH_DAYS),
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// Default location of the config file.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
    Ok(home.join(".hebcal").join("config.json"))
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<NlpConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config: NlpConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Load `~/.hebcal/config.json`, or defaults when the file does not exist.
pub fn load_default_config() -> Result<NlpConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        log::debug!("No config at {}; using defaults", path.display());
        return Ok(NlpConfig::default());
    }
    load_config(&path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = NlpConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tz(), chrono_tz::Asia::Jerusalem);
        assert_eq!(config.matching.high_confidence, 0.75);
        assert_eq!(config.matching.ambiguity_margin, 0.15);
        assert_eq!(config.matching.min_score, 0.4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "timeZone": "Europe/London", "matching": {{ "minScore": 0.5 }} }}"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.tz(), chrono_tz::Europe::London);
        assert_eq!(config.matching.min_score, 0.5);
        assert_eq!(config.matching.high_confidence, 0.75);
        assert_eq!(config.default_duration_minutes, 60);
        assert_eq!(config.slots.work_hours_start, 9);
    }

    #[test]
    fn test_rejects_unknown_zone() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "timeZone": "Mars/Olympus" }}"#).unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "timeZone", .. }));
    }

    #[test]
    fn test_rejects_floor_above_threshold() {
        let mut config = NlpConfig::default();
        config.matching.min_score = 0.9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_inverted_work_hours() {
        let mut config = NlpConfig::default();
        config.slots.work_hours_start = 18;
        config.slots.work_hours_end = 9;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unbounded_search_days() {
        let mut config = NlpConfig::default();
        config.slots.default_search_days = u32::MAX;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "slots.defaultSearchDays", .. })
        ));

        config.slots.default_search_days = 0;
        assert!(config.validate().is_err());
        config.slots.default_search_days = MAX_SEARCH_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_unknown_zone_falls_back_at_runtime() {
        let config = NlpConfig {
            time_zone: "Nowhere/City".to_string(),
            ..Default::default()
        };
        assert_eq!(config.tz(), DEFAULT_TIME_ZONE);
    }
}
