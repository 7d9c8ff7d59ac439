use super::ChatHistory;
use crate::error::HistoryError;
use chat_history_domain::Snapshot;

impl ChatHistory {
    pub async fn get_snapshot(&self, chat_id: &str) -> Result<Option<Snapshot>, HistoryError> {
        self.store.get_snapshot(chat_id).await
    }

    /// Overwrites any previous snapshot. The chat does not have to exist.
    pub async fn set_snapshot(&self, chat_id: &str, snapshot: Snapshot) -> Result<(), HistoryError> {
        self.store.put_snapshot(chat_id, snapshot).await?;
        tracing::debug!(chat_id = %chat_id, "stored snapshot");
        Ok(())
    }

    /// Deleting a snapshot that does not exist succeeds.
    pub async fn delete_snapshot(&self, chat_id: &str) -> Result<(), HistoryError> {
        self.store.delete_snapshot(chat_id).await
    }
}
