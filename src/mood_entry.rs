use chrono::{Local, NaiveDate};
use color_eyre::eyre::{eyre, Report};
use ratatui::style::Color;
use std::fmt;
use std::str::FromStr;

/// Long-form date used wherever an entry's day is shown, e.g. "March 3, 2024".
pub const DATE_FORMAT: &str = "%B %-d, %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Sad,
    Anxious,
}

impl Mood {
    /// Picker and legend order.
    pub const ALL: [Mood; 5] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Neutral,
        Mood::Sad,
        Mood::Anxious,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Calm => "Calm",
            Mood::Neutral => "Neutral",
            Mood::Sad => "Sad",
            Mood::Anxious => "Anxious",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "🙂",
            Mood::Neutral => "😐",
            Mood::Sad => "😟",
            Mood::Anxious => "😬",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Mood::Happy => Color::from_u32(0xFFC7C7),
            Mood::Calm => Color::from_u32(0xB2F4FF),
            Mood::Neutral => Color::from_u32(0xD6E8FF),
            Mood::Sad => Color::from_u32(0xCDE8CC),
            Mood::Anxious => Color::from_u32(0xE6D5FF),
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| eyre!("unknown mood: {s:?}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodEntry {
    pub id: String,
    pub mood: Mood,
    pub note: String,
    pub timestamp: NaiveDate,
    pub tags: Vec<String>,
}

impl MoodEntry {
    /// Creates an entry with an empty note and an id taken from the current
    /// Unix time in milliseconds.
    pub fn new(mood: Mood, timestamp: NaiveDate, tags: Vec<String>) -> Self {
        MoodEntry {
            id: Local::now().timestamp_millis().to_string(),
            mood,
            note: String::new(),
            timestamp,
            tags,
        }
    }

    #[cfg(test)]
    pub fn with_id(id: impl Into<String>, mood: Mood, timestamp: NaiveDate) -> Self {
        MoodEntry {
            id: id.into(),
            mood,
            note: String::new(),
            timestamp,
            tags: Vec::new(),
        }
    }

    /// Copy of this entry carrying `note`; every other field is kept.
    pub fn with_note(&self, note: impl Into<String>) -> Self {
        MoodEntry {
            note: note.into(),
            ..self.clone()
        }
    }

    pub fn formatted_date(&self) -> String {
        format_date(self.timestamp)
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Splits comma-separated user input into trimmed, non-empty tags.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
