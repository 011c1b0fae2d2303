use crate::mood_entry::Mood;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_file: PathBuf,
    pub log_format: LogFormat,
    pub splash: Duration,
    /// Mood highlighted in the picker at start-up.
    pub default_mood: Mood,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let log_file = lookup("MOOD_JOURNAL_LOG_FILE")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "mood_journal.log".into());

        let log_format = match lookup("MOOD_JOURNAL_LOG_FORMAT").as_deref() {
            None | Some("") | Some("text") => LogFormat::Text,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(eyre!(
                    "MOOD_JOURNAL_LOG_FORMAT must be \"text\" or \"json\", got {other:?}"
                ))
            }
        };

        let splash_ms: u64 = lookup("MOOD_JOURNAL_SPLASH_MS")
            .unwrap_or_else(|| "1500".into())
            .parse()
            .map_err(|e| eyre!("MOOD_JOURNAL_SPLASH_MS must be a number: {e}"))?;

        let default_mood = match lookup("MOOD_JOURNAL_DEFAULT_MOOD").filter(|s| !s.is_empty()) {
            Some(label) => label
                .parse::<Mood>()
                .wrap_err("MOOD_JOURNAL_DEFAULT_MOOD must name a mood")?,
            None => Mood::Happy,
        };

        Ok(Config {
            log_file: PathBuf::from(log_file),
            log_format,
            splash: Duration::from_millis(splash_ms),
            default_mood,
        })
    }
}
