use crate::mood_entry::Mood;
use crate::mood_store::{last_7_days_labels, MoodStore};
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodShare {
    pub mood: Mood,
    pub count: usize,
    /// Share of the day's entries, 0..=100.
    pub percent: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySummary {
    pub label: String,
    pub moods: Vec<Mood>,
}

impl DaySummary {
    /// One share per mood in `Mood::ALL` order, including zero counts.
    pub fn shares(&self) -> Vec<MoodShare> {
        let total = self.moods.len().max(1);
        Mood::ALL
            .into_iter()
            .map(|mood| {
                let count = self.moods.iter().filter(|m| **m == mood).count();
                MoodShare {
                    mood,
                    count,
                    percent: (count * 100 / total) as u64,
                }
            })
            .collect()
    }
}

/// The rolling week shown by the details chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekSummary {
    pub days: Vec<DaySummary>,
    pub version: u64,
}

impl WeekSummary {
    pub fn from_store(store: &MoodStore, today: NaiveDate) -> Self {
        let days = last_7_days_labels(today)
            .into_iter()
            .zip(store.get_current_week_moods_at(today))
            .map(|(label, moods)| DaySummary { label, moods })
            .collect();

        WeekSummary {
            days,
            version: store.version(),
        }
    }

    /// The week ending at the local wall-clock date.
    pub fn current(store: &MoodStore) -> Self {
        Self::from_store(store, MoodStore::today())
    }

    pub fn is_stale(&self, store: &MoodStore) -> bool {
        self.version != store.version()
    }

    pub fn total(&self) -> usize {
        self.days.iter().map(|d| d.moods.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood_entry::MoodEntry;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_shares_per_day() {
        let day = DaySummary {
            label: "Mon".into(),
            moods: vec![Mood::Happy, Mood::Happy, Mood::Sad],
        };
        let shares = day.shares();

        assert_eq!(shares.len(), Mood::ALL.len());
        assert_eq!(shares[0].mood, Mood::Happy);
        assert_eq!(shares[0].count, 2);
        assert_eq!(shares[0].percent, 66);
        let sad = shares.iter().find(|s| s.mood == Mood::Sad).unwrap();
        assert_eq!(sad.percent, 33);
        assert!(shares.iter().filter(|s| s.count == 0).all(|s| s.percent == 0));
    }

    #[test]
    fn test_empty_day_has_no_share() {
        let day = DaySummary {
            label: "Tue".into(),
            moods: Vec::new(),
        };
        assert!(day.shares().iter().all(|s| s.percent == 0));
    }

    #[test]
    fn test_summary_pairs_labels_with_days() {
        let today = date(2024, 3, 3);
        let mut store = MoodStore::new();
        store.add_mood(MoodEntry::with_id("1", Mood::Calm, today));
        store.add_mood(MoodEntry::with_id("2", Mood::Sad, date(2024, 2, 26)));

        let summary = WeekSummary::from_store(&store, today);
        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.days[0].label, "Mon");
        assert_eq!(summary.days[0].moods, vec![Mood::Sad]);
        assert_eq!(summary.days[6].label, "Sun");
        assert_eq!(summary.days[6].moods, vec![Mood::Calm]);
        assert_eq!(summary.total(), 2);
    }

    #[test]
    fn test_current_week_ends_today() {
        let mut store = MoodStore::new();
        store.add_mood(MoodEntry::with_id("1", Mood::Neutral, MoodStore::today()));

        let summary = WeekSummary::current(&store);
        assert_eq!(summary.days.len(), 7);
        assert_eq!(summary.days[6].moods, vec![Mood::Neutral]);
        assert_eq!(summary.total(), 1);
    }

    #[test]
    fn test_labels_and_groups_share_one_day() {
        // 2024-03-01 was a Friday; an entry on it must sit under "Fri".
        let friday = date(2024, 3, 1);
        let mut store = MoodStore::new();
        store.add_mood(MoodEntry::with_id("1", Mood::Anxious, friday));

        for today in [friday, date(2024, 3, 2), date(2024, 3, 4)] {
            let summary = WeekSummary::from_store(&store, today);
            let day = summary.days.iter().find(|d| d.label == "Fri").unwrap();
            assert_eq!(day.moods, vec![Mood::Anxious]);
            assert_eq!(summary.total(), 1);
        }
    }

    #[test]
    fn test_summary_goes_stale_after_mutation() {
        let today = date(2024, 3, 3);
        let mut store = MoodStore::new();
        let summary = WeekSummary::from_store(&store, today);
        assert!(!summary.is_stale(&store));

        store.add_mood(MoodEntry::with_id("1", Mood::Happy, today));
        assert!(summary.is_stale(&store));
    }
}
