//! SessionHistoryRepository trait and the service on top of it.
//!
//! The history list is presentation-side chrome: a read-mostly log of
//! past session summaries for the sidebar. Implementations live in
//! `ease-infra` (e.g. `InMemorySessionHistory`).
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition).

use tracing::info;
use uuid::Uuid;

use ease_types::config::EaseConfig;
use ease_types::error::HistoryError;
use ease_types::session::SessionSummary;

/// Repository for recorded session summaries.
pub trait SessionHistoryRepository: Send + Sync {
    /// List one owner's summaries, most recent first.
    fn list(
        &self,
        owner: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SessionSummary>, HistoryError>> + Send;

    /// Look up a single summary.
    fn get(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<SessionSummary>, HistoryError>> + Send;

    /// Record the summary of an ended session.
    fn record(
        &self,
        summary: &SessionSummary,
    ) -> impl std::future::Future<Output = Result<(), HistoryError>> + Send;
}

/// Thin orchestration over the history repository.
pub struct SessionService<H: SessionHistoryRepository> {
    history: H,
    config: EaseConfig,
}

impl<H: SessionHistoryRepository> SessionService<H> {
    pub fn new(history: H, config: EaseConfig) -> Self {
        Self { history, config }
    }

    /// One owner's recent session summaries for the sidebar, bounded by
    /// the configured history limit.
    pub async fn list_recent(&self, owner: &str) -> Result<Vec<SessionSummary>, HistoryError> {
        self.history.list(owner, self.config.history_limit).await
    }

    pub async fn get(&self, id: &Uuid) -> Result<Option<SessionSummary>, HistoryError> {
        self.history.get(id).await
    }

    /// Record an ended session in the history list.
    pub async fn record_ended(&self, summary: &SessionSummary) -> Result<(), HistoryError> {
        self.history.record(summary).await?;
        info!(session_id = %summary.id, title = %summary.title, "Session recorded to history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Minimal in-crate double; the real store lives in ease-infra.
    #[derive(Default)]
    struct VecHistory {
        entries: Mutex<Vec<SessionSummary>>,
    }

    impl SessionHistoryRepository for VecHistory {
        async fn list(&self, owner: &str, limit: usize) -> Result<Vec<SessionSummary>, HistoryError> {
            let mut entries: Vec<SessionSummary> = self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|s| s.owner == owner)
                .cloned()
                .collect();
            entries.sort_by(|a, b| b.started_at.cmp(&a.started_at));
            entries.truncate(limit);
            Ok(entries)
        }

        async fn get(&self, id: &Uuid) -> Result<Option<SessionSummary>, HistoryError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .find(|s| s.id == *id)
                .cloned())
        }

        async fn record(&self, summary: &SessionSummary) -> Result<(), HistoryError> {
            self.entries.lock().unwrap().push(summary.clone());
            Ok(())
        }
    }

    fn summary(title: &str) -> SessionSummary {
        SessionSummary {
            id: Uuid::now_v7(),
            owner: "maya@example.com".to_string(),
            title: title.to_string(),
            started_at: Utc::now(),
            message_count: 3,
            mood: None,
            preview: String::new(),
        }
    }

    #[tokio::test]
    async fn record_then_list_and_get() {
        let service = SessionService::new(VecHistory::default(), EaseConfig::default());

        let s = summary("Processing grief");
        service.record_ended(&s).await.unwrap();

        let listed = service.list_recent("maya@example.com").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Processing grief");

        // Another identity sees nothing.
        assert!(service.list_recent("sam@example.com").await.unwrap().is_empty());

        let found = service.get(&s.id).await.unwrap();
        assert!(found.is_some());
        assert!(service.get(&Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_respects_history_limit() {
        let config = EaseConfig {
            history_limit: 2,
            ..EaseConfig::default()
        };
        let service = SessionService::new(VecHistory::default(), config);

        for i in 0..5 {
            service.record_ended(&summary(&format!("s{i}"))).await.unwrap();
        }

        let listed = service.list_recent("maya@example.com").await.unwrap();
        assert_eq!(listed.len(), 2);
    }
}
