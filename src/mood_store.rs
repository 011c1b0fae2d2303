use crate::mood_entry::{format_date, Mood, MoodEntry};
use chrono::{Days, Local, NaiveDate};
use tracing::{debug, info};

pub const WEEK_DAYS: u64 = 7;

/// In-memory mood journal, newest entry first.
#[derive(Debug, Default)]
pub struct MoodStore {
    entries: Vec<MoodEntry>,
    version: u64,
}

impl MoodStore {
    pub fn new() -> Self {
        MoodStore {
            entries: Vec::new(),
            version: 0,
        }
    }

    /// Prepends `entry` unless one with the same day and mood, or the same id,
    /// is already recorded. Returns whether it was inserted.
    pub fn add_mood(&mut self, entry: MoodEntry) -> bool {
        if self.has_mood_on(entry.mood, entry.timestamp)
            || self.get_mood_entry(&entry.id).is_some()
        {
            debug!(
                id = %entry.id,
                mood = %entry.mood,
                date = %entry.timestamp,
                "duplicate mood ignored"
            );
            return false;
        }

        info!(id = %entry.id, mood = %entry.mood, date = %entry.timestamp, "mood recorded");
        self.entries.insert(0, entry);
        self.version += 1;
        true
    }

    pub fn delete_mood(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = before - self.entries.len();
        if removed == 0 {
            debug!(id, "delete of unknown mood ignored");
            return false;
        }

        info!(id, removed, "mood deleted");
        self.version += 1;
        true
    }

    pub fn has_mood_on(&self, mood: Mood, date: NaiveDate) -> bool {
        self.entries
            .iter()
            .any(|e| e.timestamp == date && e.mood == mood)
    }

    pub fn get_mood_entry(&self, id: &str) -> Option<&MoodEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Replaces the entry with a copy carrying `note`, at the same position.
    pub fn update_mood_note(&mut self, id: &str, note: impl Into<String>) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id == id) else {
            debug!(id, "note update for unknown mood ignored");
            return false;
        };

        self.entries[index] = self.entries[index].with_note(note);
        self.version += 1;
        info!(id, "mood note updated");
        true
    }

    pub fn get_entries(&self) -> &[MoodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bumped on every mutation that changed the collection.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn get_today(&self) -> String {
        format_date(Self::today())
    }

    pub fn get_current_week_moods(&self) -> Vec<Vec<Mood>> {
        self.get_current_week_moods_at(Self::today())
    }

    /// Moods per day for the 7 days ending at `today`, oldest day first.
    pub fn get_current_week_moods_at(&self, today: NaiveDate) -> Vec<Vec<Mood>> {
        let mut days: Vec<Vec<Mood>> = week_dates(today)
            .map(|date| {
                self.entries
                    .iter()
                    .filter(|e| e.timestamp == date)
                    .map(|e| e.mood)
                    .collect()
            })
            .collect();
        days.reverse();
        days
    }

    pub fn get_last_7_days_labels(&self) -> Vec<String> {
        last_7_days_labels(Self::today())
    }

    pub fn search(&self, query: &str) -> Vec<MoodEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        self.entries
            .iter()
            .filter(|e| {
                e.mood.label().to_lowercase().contains(&query)
                    || e.note.to_lowercase().contains(&query)
                    || e.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .cloned()
            .collect()
    }
}

/// Hits for one query, re-run whenever the store version moves.
#[derive(Debug, Clone)]
pub struct SearchResults {
    query: String,
    entries: Vec<MoodEntry>,
    version: u64,
}

impl SearchResults {
    pub fn new(store: &MoodStore, query: impl Into<String>) -> Self {
        let query = query.into();
        SearchResults {
            entries: store.search(&query),
            version: store.version(),
            query,
        }
    }

    /// Returns whether the hits were recomputed.
    pub fn refresh(&mut self, store: &MoodStore) -> bool {
        if self.version == store.version() {
            return false;
        }
        debug!(query = %self.query, "search results refreshed");
        self.entries = store.search(&self.query);
        self.version = store.version();
        true
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn entries(&self) -> &[MoodEntry] {
        &self.entries
    }
}

/// Short weekday names ("Mon") for the 7 days ending at `today`, oldest first.
pub fn last_7_days_labels(today: NaiveDate) -> Vec<String> {
    let mut labels: Vec<String> = week_dates(today)
        .map(|date| date.format("%a").to_string())
        .collect();
    labels.reverse();
    labels
}

// Walks backwards from `today`.
fn week_dates(today: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    (0..WEEK_DAYS).map(move |i| today - Days::new(i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(id: &str, mood: Mood, day: NaiveDate) -> MoodEntry {
        MoodEntry::with_id(id, mood, day)
    }

    #[test]
    fn test_duplicate_day_and_mood_is_ignored() {
        let mut store = MoodStore::new();
        assert!(store.add_mood(entry("1", Mood::Happy, date(2024, 6, 1))));
        assert!(!store.add_mood(entry("2", Mood::Happy, date(2024, 6, 1))));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_entries()[0].id, "1");
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_has_mood_on() {
        let mut store = MoodStore::new();
        store.add_mood(entry("1", Mood::Sad, date(2024, 6, 1)));
        assert!(store.has_mood_on(Mood::Sad, date(2024, 6, 1)));
        assert!(!store.has_mood_on(Mood::Sad, date(2024, 6, 2)));
        assert!(!store.has_mood_on(Mood::Calm, date(2024, 6, 1)));
    }

    #[test]
    fn test_same_day_different_mood_is_kept() {
        let mut store = MoodStore::new();
        store.add_mood(entry("1", Mood::Happy, date(2024, 6, 1)));
        store.add_mood(entry("2", Mood::Sad, date(2024, 6, 1)));
        store.add_mood(entry("3", Mood::Happy, date(2024, 6, 2)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_duplicate_id_is_ignored() {
        let mut store = MoodStore::new();
        store.add_mood(entry("1", Mood::Happy, date(2024, 6, 1)));
        assert!(!store.add_mood(entry("1", Mood::Calm, date(2024, 6, 2))));
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_mood_entry("1").unwrap().mood, Mood::Happy);
    }

    #[test]
    fn test_entries_are_newest_first() {
        let mut store = MoodStore::new();
        // Insertion order wins over calendar order.
        store.add_mood(entry("a", Mood::Calm, date(2024, 6, 3)));
        store.add_mood(entry("b", Mood::Calm, date(2024, 6, 1)));
        store.add_mood(entry("c", Mood::Calm, date(2024, 6, 2)));

        let ids: Vec<&str> = store.get_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_delete_preserves_order() {
        let mut store = MoodStore::new();
        for (i, mood) in Mood::ALL.into_iter().enumerate() {
            store.add_mood(entry(&i.to_string(), mood, date(2024, 6, 1)));
        }

        assert!(!store.delete_mood("missing"));
        assert_eq!(store.len(), 5);
        let version = store.version();

        assert!(store.delete_mood("2"));
        let ids: Vec<&str> = store.get_entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["4", "3", "1", "0"]);
        assert_eq!(store.version(), version + 1);
    }

    #[test]
    fn test_update_note_only_touches_note() {
        let mut store = MoodStore::new();
        let mut tagged = entry("1", Mood::Anxious, date(2024, 6, 1));
        tagged.tags = vec!["exam".into()];
        store.add_mood(tagged.clone());
        store.add_mood(entry("2", Mood::Calm, date(2024, 6, 1)));

        assert!(store.update_mood_note("1", "before the exam"));
        let updated = store.get_mood_entry("1").unwrap();
        assert_eq!(updated.note, "before the exam");
        assert_eq!(updated.mood, tagged.mood);
        assert_eq!(updated.timestamp, tagged.timestamp);
        assert_eq!(updated.tags, tagged.tags);
        assert_eq!(store.get_entries()[1].id, "1");

        let version = store.version();
        assert!(!store.update_mood_note("missing", "x"));
        assert_eq!(store.version(), version);
    }

    #[test]
    fn test_journal_scenario() {
        let mut store = MoodStore::new();
        let first = entry("1", Mood::Happy, date(2024, 6, 1));
        store.add_mood(first.clone());
        assert_eq!(store.get_mood_entry("1"), Some(&first));
        assert_eq!(first.formatted_date(), "June 1, 2024");

        store.add_mood(entry("2", Mood::Happy, date(2024, 6, 1)));
        assert_eq!(store.len(), 1);

        store.update_mood_note("1", "feeling great");
        assert_eq!(store.get_mood_entry("1").unwrap().note, "feeling great");

        store.delete_mood("1");
        assert!(store.get_mood_entry("1").is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_week_moods_oldest_first() {
        let today = date(2024, 3, 2);
        let mut store = MoodStore::new();
        store.add_mood(entry("1", Mood::Happy, today));
        store.add_mood(entry("2", Mood::Sad, today));
        store.add_mood(entry("3", Mood::Calm, date(2024, 2, 25)));
        // Outside the window.
        store.add_mood(entry("4", Mood::Calm, date(2024, 2, 24)));
        store.add_mood(entry("5", Mood::Neutral, date(2024, 3, 3)));

        let week = store.get_current_week_moods_at(today);
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], vec![Mood::Calm]);
        assert_eq!(week[6], vec![Mood::Sad, Mood::Happy]);
        assert!(week[1..6].iter().all(|day| day.is_empty()));
    }

    #[test]
    fn test_week_moods_empty_store() {
        let store = MoodStore::new();
        let week = store.get_current_week_moods();
        assert_eq!(week.len(), 7);
        assert!(week.iter().all(|day| day.is_empty()));
    }

    #[test]
    fn test_last_7_days_labels() {
        // 2024-03-03 was a Sunday.
        let labels = last_7_days_labels(date(2024, 3, 3));
        assert_eq!(labels, vec!["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    }

    #[test]
    fn test_today_label_matches_last_week_group() {
        let store = MoodStore::new();
        let labels = store.get_last_7_days_labels();
        assert_eq!(labels.len(), 7);
        assert_eq!(labels[6], MoodStore::today().format("%a").to_string());
        assert_eq!(store.get_today(), format_date(MoodStore::today()));
    }

    #[test]
    fn test_search_results_follow_note_edits() {
        let mut store = MoodStore::new();
        store.add_mood(entry("1", Mood::Calm, date(2024, 6, 1)));
        store.add_mood(entry("2", Mood::Sad, date(2024, 6, 1)));
        store.update_mood_note("1", "calm morning");

        let mut results = SearchResults::new(&store, "calm");
        assert_eq!(results.query(), "calm");
        assert_eq!(results.entries()[0].note, "calm morning");
        assert!(!results.refresh(&store));

        store.update_mood_note("1", "calm evening");
        assert!(results.refresh(&store));
        assert_eq!(results.entries()[0].note, "calm evening");

        store.delete_mood("1");
        assert!(results.refresh(&store));
        assert!(results.entries().is_empty());
    }

    #[test]
    fn test_search_matches_mood_note_and_tags() {
        let mut store = MoodStore::new();
        let mut work = entry("1", Mood::Anxious, date(2024, 6, 1));
        work.tags = vec!["Work".into()];
        store.add_mood(work);
        store.add_mood(entry("2", Mood::Happy, date(2024, 6, 1)));
        store.update_mood_note("2", "Great walk in the park");

        assert_eq!(store.search("work")[0].id, "1");
        assert_eq!(store.search("PARK")[0].id, "2");
        assert_eq!(store.search("happy").len(), 1);
        assert!(store.search("  ").is_empty());
        assert!(store.search("nothing").is_empty());
    }
}
