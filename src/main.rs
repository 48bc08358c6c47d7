//! hebcal CLI: interpret a Hebrew calendar command or suggest free slots.
//!
//! Candidate and busy events are read from a JSON array of
//! `{id, title, start, end, recurring?}`; output is JSON on stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use clap::{Parser, Subcommand};

use hebcal_lib::config::{load_config, load_default_config, NlpConfig};
use hebcal_lib::types::{CandidateEvent, ParseRequest, PartOfDay, SuggestSlotsOptions};
use hebcal_lib::{parse_command, suggest_slots, ParseNlpResponse, SuggestSlotsResponse};

#[derive(Parser)]
#[command(name = "hebcal")]
#[command(version)]
#[command(about = "Hebrew free-text calendar commands", long_about = None)]
struct Cli {
    /// Config file (default: ~/.hebcal/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a command and print the parseNlp response
    Parse {
        /// The Hebrew command text
        #[arg(short, long)]
        text: String,

        /// Reference time, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,

        /// JSON file with candidate events for update/delete matching
        #[arg(long)]
        events: Option<PathBuf>,

        /// Event id chosen after a disambiguation
        #[arg(long)]
        select: Option<String>,

        /// Mark the response as a preview
        #[arg(long)]
        parse_only: bool,
    },

    /// Suggest free time slots around busy events
    Suggest {
        /// JSON file with busy events
        #[arg(long)]
        events: Option<PathBuf>,

        /// Slot length in minutes
        #[arg(long)]
        duration: Option<u32>,

        /// morning | noon | afternoon | evening (or בבוקר, צהריים, אחר הצהריים, בערב)
        #[arg(long)]
        part_of_day: Option<String>,

        /// Maximum number of suggestions
        #[arg(long)]
        max: Option<usize>,

        /// Search from (RFC 3339, default: now)
        #[arg(long)]
        from: Option<String>,

        /// Search until (RFC 3339, default: a week after --from)
        #[arg(long)]
        until: Option<String>,

        /// Reference time, RFC 3339 (default: now)
        #[arg(long)]
        now: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => load_default_config().context("Failed to load default config")?,
    };

    match cli.command {
        Commands::Parse {
            text,
            now,
            events,
            select,
            parse_only,
        } => {
            let mut request = ParseRequest::new(text, reference_time(now.as_deref(), &config)?)
                .with_candidates(read_events(events.as_deref())?);
            request.parse_only = parse_only;
            request.selected_event_id = select;

            let interpretation = parse_command(&request, &config);
            let response = ParseNlpResponse::from_interpretation(interpretation, parse_only);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Suggest {
            events,
            duration,
            part_of_day,
            max,
            from,
            until,
            now,
        } => {
            let part_of_day = match part_of_day.as_deref() {
                Some(value) => Some(
                    PartOfDay::parse(value)
                        .with_context(|| format!("Unknown part of day '{}'", value))?,
                ),
                None => None,
            };
            let options = SuggestSlotsOptions {
                duration_minutes: duration,
                time_min: from.as_deref().map(parse_time).transpose()?,
                time_max: until.as_deref().map(parse_time).transpose()?,
                part_of_day,
                max_suggestions: max,
            };

            let busy = read_events(events.as_deref())?;
            let now = reference_time(now.as_deref(), &config)?;
            let response = SuggestSlotsResponse::from_result(suggest_slots(&busy, &options, now, &config));
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn parse_time(value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).with_context(|| format!("Invalid RFC 3339 time '{}'", value))
}

/// `--now`, or the current time in the configured zone.
fn reference_time(value: Option<&str>, config: &NlpConfig) -> Result<DateTime<FixedOffset>> {
    match value {
        Some(value) => parse_time(value),
        None => Ok(Utc::now().with_timezone(&config.tz()).fixed_offset()),
    }
}

fn read_events(path: Option<&Path>) -> Result<Vec<CandidateEvent>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    let events: Vec<CandidateEvent> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse events in {}", path.display()))?;
    log::debug!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}
