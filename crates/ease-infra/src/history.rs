//! In-memory session history store.
//!
//! Backed by a `DashMap`; persistence is an external collaborator
//! concern, so this store lives and dies with the process. Can be seeded
//! with sample sessions for the sidebar demo.

use chrono::{Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use ease_core::history::SessionHistoryRepository;
use ease_types::error::HistoryError;
use ease_types::session::{Mood, SessionSummary};

/// Process-lifetime `SessionHistoryRepository`.
#[derive(Debug, Default)]
pub struct InMemorySessionHistory {
    sessions: DashMap<Uuid, SessionSummary>,
}

impl InMemorySessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with the sample sessions shown in the sidebar.
    pub fn with_samples() -> Self {
        let store = Self::new();
        for summary in sample_sessions() {
            store.sessions.insert(summary.id, summary);
        }
        store
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionHistoryRepository for InMemorySessionHistory {
    async fn list(&self, owner: &str, limit: usize) -> Result<Vec<SessionSummary>, HistoryError> {
        let mut summaries: Vec<SessionSummary> = self
            .sessions
            .iter()
            .filter(|e| e.value().owner == owner)
            .map(|e| e.value().clone())
            .collect();
        summaries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
        summaries.truncate(limit);
        Ok(summaries)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<SessionSummary>, HistoryError> {
        Ok(self.sessions.get(id).map(|e| e.value().clone()))
    }

    async fn record(&self, summary: &SessionSummary) -> Result<(), HistoryError> {
        self.sessions.insert(summary.id, summary.clone());
        Ok(())
    }
}

/// Identity the seeded sample sessions belong to; matches the CLI's
/// default local user.
pub const SAMPLE_OWNER: &str = "friend@ease.local";

/// Sample sessions for the sidebar list.
fn sample_sessions() -> Vec<SessionSummary> {
    let now = Utc::now();
    vec![
        SessionSummary {
            id: Uuid::now_v7(),
            owner: SAMPLE_OWNER.to_string(),
            title: "Feeling overwhelmed at work".to_string(),
            started_at: now - Duration::hours(3),
            message_count: 12,
            mood: Some(Mood::Anxious),
            preview: "I've been having trouble focusing lately...".to_string(),
        },
        SessionSummary {
            id: Uuid::now_v7(),
            owner: SAMPLE_OWNER.to_string(),
            title: "Family relationship challenges".to_string(),
            started_at: now - Duration::days(1),
            message_count: 8,
            mood: Some(Mood::Conflicted),
            preview: "My sister and I had another argument...".to_string(),
        },
        SessionSummary {
            id: Uuid::now_v7(),
            owner: SAMPLE_OWNER.to_string(),
            title: "Self-care and boundaries".to_string(),
            started_at: now - Duration::days(3),
            message_count: 15,
            mood: Some(Mood::Hopeful),
            preview: "I tried setting some boundaries today...".to_string(),
        },
        SessionSummary {
            id: Uuid::now_v7(),
            owner: SAMPLE_OWNER.to_string(),
            title: "Processing grief".to_string(),
            started_at: now - Duration::days(5),
            message_count: 22,
            mood: Some(Mood::Sad),
            preview: "It's been six months since mom passed...".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(owner: &str, title: &str, hours_ago: i64) -> SessionSummary {
        SessionSummary {
            id: Uuid::now_v7(),
            owner: owner.to_string(),
            title: title.to_string(),
            started_at: Utc::now() - Duration::hours(hours_ago),
            message_count: 1,
            mood: None,
            preview: String::new(),
        }
    }

    #[tokio::test]
    async fn list_is_most_recent_first() {
        let store = InMemorySessionHistory::new();
        store.record(&summary("maya@example.com", "older", 10)).await.unwrap();
        store.record(&summary("maya@example.com", "newest", 1)).await.unwrap();
        store.record(&summary("maya@example.com", "middle", 5)).await.unwrap();

        let listed = store.list("maya@example.com", 10).await.unwrap();
        let titles: Vec<_> = listed.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "older"]);
    }

    #[tokio::test]
    async fn list_is_scoped_to_the_owner() {
        let store = InMemorySessionHistory::new();
        store.record(&summary("maya@example.com", "mine", 1)).await.unwrap();
        store.record(&summary("sam@example.com", "theirs", 2)).await.unwrap();

        let listed = store.list("maya@example.com", 10).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "mine");
    }

    #[tokio::test]
    async fn list_truncates_to_limit() {
        let store = InMemorySessionHistory::with_samples();
        assert_eq!(store.len(), 4);

        let listed = store.list(SAMPLE_OWNER, 2).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "Feeling overwhelmed at work");
    }

    #[tokio::test]
    async fn get_finds_recorded_summary() {
        let store = InMemorySessionHistory::new();
        let s = summary("maya@example.com", "boundaries", 1);
        store.record(&s).await.unwrap();

        assert_eq!(store.get(&s.id).await.unwrap().unwrap().title, "boundaries");
        assert!(store.get(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn samples_carry_moods() {
        let store = InMemorySessionHistory::with_samples();
        let listed = store.list(SAMPLE_OWNER, 10).await.unwrap();
        assert!(listed.iter().all(|s| s.mood.is_some()));
    }
}
