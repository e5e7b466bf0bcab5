use chrono::{DateTime, Duration, Utc};
use shared::{domain::HistoryEntryId, protocol::HistoryEntry};
use uuid::Uuid;

/// In-memory cooking history, newest first.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// The three entries a fresh install shows.
    pub fn with_samples(now: DateTime<Utc>) -> Self {
        let sample = |id: &str, name: &str, days_ago: i64| HistoryEntry {
            id: HistoryEntryId::new(id),
            recipe_name: name.to_string(),
            cooked_at: now - Duration::days(days_ago),
        };
        Self {
            entries: vec![
                sample("1", "Салат Капрезе", 0),
                sample("2", "Паста Карбонара", 1),
                sample("3", "Омлет с овощами", 2),
            ],
        }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn record(&mut self, recipe_name: impl Into<String>, cooked_at: DateTime<Utc>) -> &HistoryEntry {
        self.entries.insert(
            0,
            HistoryEntry {
                id: HistoryEntryId::new(Uuid::new_v4().to_string()),
                recipe_name: recipe_name.into(),
                cooked_at,
            },
        );
        &self.entries[0]
    }
}

pub fn relative_day_label(cooked_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let days = (now.date_naive() - cooked_at.date_naive()).num_days();
    match days {
        i64::MIN..=0 => "Сегодня".to_string(),
        1 => "Вчера".to_string(),
        n => format!("{n} {} назад", days_word(n)),
    }
}

fn days_word(n: i64) -> &'static str {
    match (n % 10, n % 100) {
        (1, rem) if rem != 11 => "день",
        (2..=4, rem) if !(12..=14).contains(&rem) => "дня",
        _ => "дней",
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn samples_reproduce_the_seeded_labels() {
        let now = noon();
        let log = HistoryLog::with_samples(now);
        let labels: Vec<_> = log
            .entries()
            .iter()
            .map(|entry| relative_day_label(entry.cooked_at, now))
            .collect();
        assert_eq!(labels, ["Сегодня", "Вчера", "2 дня назад"]);
    }

    #[test]
    fn record_prepends_with_a_fresh_id() {
        let now = noon();
        let mut log = HistoryLog::with_samples(now);
        let id = log.record("Брускетта", now).id.clone();
        assert_eq!(log.len(), 4);
        assert_eq!(log.entries()[0].recipe_name, "Брускетта");
        assert!(log.entries()[1..].iter().all(|entry| entry.id != id));
    }

    #[test]
    fn labels_follow_calendar_days_and_plural_rules() {
        let now = noon();
        let at = |days: i64| now - Duration::days(days);
        assert_eq!(relative_day_label(now + Duration::hours(3), now), "Сегодня");
        assert_eq!(relative_day_label(at(5), now), "5 дней назад");
        assert_eq!(relative_day_label(at(11), now), "11 дней назад");
        assert_eq!(relative_day_label(at(21), now), "21 день назад");
        assert_eq!(relative_day_label(at(22), now), "22 дня назад");
        assert_eq!(relative_day_label(at(12), now), "12 дней назад");
    }

    #[test]
    fn yesterday_is_calendar_based() {
        let now = Utc
            .with_ymd_and_hms(2024, 3, 15, 0, 30, 0)
            .single()
            .expect("valid timestamp");
        let late_last_night = now - Duration::hours(1);
        assert_eq!(relative_day_label(late_last_night, now), "Вчера");
    }
}
