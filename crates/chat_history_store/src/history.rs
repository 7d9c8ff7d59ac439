use crate::config::{HistoryConfig, HistoryOptions};
use crate::error::HistoryError;
use crate::ids::{fresh_fallback_url_id, fresh_randomized_url_id};
use crate::sqlite_store::SqliteStore;
use chat_history_domain::{
    ChatMessage, ChatMetadata, ChatRecord, is_valid_timestamp, next_chat_id, now_timestamp,
    resolve_url_id,
};
use std::collections::HashSet;

mod derive;
mod snapshots;

/// Arguments of `ChatHistory::save`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SaveChat {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub url_id: Option<String>,
    pub description: Option<String>,
    /// Defaults to now when absent.
    pub timestamp: Option<String>,
    pub metadata: Option<ChatMetadata>,
}

impl SaveChat {
    pub fn new(id: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            id: id.into(),
            messages,
            ..Default::default()
        }
    }

    pub fn url_id(mut self, url_id: impl Into<String>) -> Self {
        self.url_id = Some(url_id.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn metadata(mut self, metadata: ChatMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    fn from_record(record: ChatRecord) -> Self {
        Self {
            id: record.id,
            messages: record.messages,
            url_id: record.url_id,
            description: record.description,
            timestamp: Some(record.timestamp),
            metadata: record.metadata,
        }
    }
}

/// Chat transcripts and their project snapshots.
///
/// Operations are composed of several store requests and are not atomic as a
/// whole. Writes tolerate a concurrent writer taking the same url id by
/// retrying once with a fallback id.
#[derive(Clone)]
pub struct ChatHistory {
    store: SqliteStore,
    options: HistoryOptions,
}

impl ChatHistory {
    /// Resolves to `None` when persistence is unavailable (no database
    /// configured, or the database cannot be opened).
    pub async fn open(config: HistoryConfig) -> Option<Self> {
        let Some(db_path) = config.db_path else {
            tracing::warn!("no chat history database configured; persistence disabled");
            return None;
        };
        let store = SqliteStore::open(db_path).await?;
        Some(Self::new(store, config.options))
    }

    pub(crate) fn new(store: SqliteStore, options: HistoryOptions) -> Self {
        Self { store, options }
    }

    pub async fn next_id(&self) -> Result<String, HistoryError> {
        let ids = self.store.list_chat_ids().await?;
        next_chat_id(ids).ok_or_else(|| HistoryError::validation("no numeric chat id left"))
    }

    pub async fn resolve_url_id(&self, candidate: &str) -> Result<String, HistoryError> {
        let existing = self
            .store
            .list_url_ids()
            .await?
            .into_iter()
            .collect::<HashSet<_>>();
        Ok(resolve_url_id(candidate, &existing))
    }

    /// Writes a chat and returns what was stored. The stored url id usually
    /// differs from the requested one, see `HistoryOptions`.
    pub async fn save(&self, request: SaveChat) -> Result<ChatRecord, HistoryError> {
        if let Some(timestamp) = request.timestamp.as_deref()
            && !is_valid_timestamp(timestamp)
        {
            return Err(HistoryError::validation(format!(
                "invalid timestamp: {timestamp:?}"
            )));
        }

        let SaveChat {
            id,
            messages,
            url_id,
            description,
            timestamp,
            metadata,
        } = request;

        let url_id = match url_id.filter(|url_id| !url_id.is_empty()) {
            Some(requested) if self.options.randomize_url_ids => {
                let randomized = fresh_randomized_url_id(&requested);
                tracing::debug!(
                    chat_id = %id,
                    requested = %requested,
                    url_id = %randomized,
                    "substituted randomized url id"
                );
                Some(self.unique_url_id_for(&id, randomized).await?)
            }
            Some(requested) => Some(self.unique_url_id_for(&id, requested).await?),
            None => None,
        };

        let record = ChatRecord {
            id,
            url_id,
            messages,
            description,
            timestamp: timestamp.unwrap_or_else(now_timestamp),
            metadata,
        };
        self.write_chat(record).await
    }

    /// `candidate`, unless another chat already owns it, in which case the
    /// first free `candidate-N`.
    async fn unique_url_id_for(
        &self,
        chat_id: &str,
        candidate: String,
    ) -> Result<String, HistoryError> {
        let mut existing = self
            .store
            .list_url_ids()
            .await?
            .into_iter()
            .collect::<HashSet<_>>();
        let owner = self.store.get_chat_by_url_id(&candidate).await?;

        match owner {
            Some(owner) if owner.id != chat_id => {
                existing.insert(candidate.clone());
                let resolved = resolve_url_id(&candidate, &existing);
                tracing::debug!(
                    chat_id = %chat_id,
                    owner = %owner.id,
                    from = %candidate,
                    to = %resolved,
                    "url id collision resolved"
                );
                Ok(resolved)
            }
            _ => Ok(candidate),
        }
    }

    /// Single write with one retry on a url id uniqueness failure.
    pub(crate) async fn write_chat(
        &self,
        mut record: ChatRecord,
    ) -> Result<ChatRecord, HistoryError> {
        match self.store.put_chat(record.clone()).await {
            Ok(()) => Ok(record),
            Err(err) if err.is_constraint() && record.url_id.is_some() => {
                let fallback = fresh_fallback_url_id();
                tracing::warn!(
                    chat_id = %record.id,
                    url_id = ?record.url_id,
                    fallback = %fallback,
                    error = %err,
                    "url id already taken; retrying with fallback url id"
                );
                record.url_id = Some(fallback);
                self.store.put_chat(record.clone()).await?;
                Ok(record)
            }
            Err(err) => Err(err),
        }
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        self.store.get_chat(id).await
    }

    pub async fn get_by_url_id(&self, url_id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        if url_id.is_empty() {
            return Err(HistoryError::validation("url id is empty"));
        }
        self.store.get_chat_by_url_id(url_id).await
    }

    /// Primary id first, then url id.
    pub async fn get(&self, id_or_url_id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        if let Some(chat) = self.store.get_chat(id_or_url_id).await? {
            return Ok(Some(chat));
        }
        if id_or_url_id.is_empty() {
            return Ok(None);
        }
        self.store.get_chat_by_url_id(id_or_url_id).await
    }

    pub async fn get_all(&self) -> Result<Vec<ChatRecord>, HistoryError> {
        self.store.list_chats().await
    }

    pub(crate) async fn require(&self, id_or_url_id: &str) -> Result<ChatRecord, HistoryError> {
        self.get(id_or_url_id)
            .await?
            .ok_or_else(|| HistoryError::not_found(format!("chat {id_or_url_id}")))
    }

    pub async fn update_description(
        &self,
        id: &str,
        description: &str,
    ) -> Result<ChatRecord, HistoryError> {
        let chat = self.require(id).await?;
        if description.trim().is_empty() {
            return Err(HistoryError::validation("description cannot be empty"));
        }

        let mut request = SaveChat::from_record(chat);
        request.description = Some(description.to_owned());
        self.save(request).await
    }

    pub async fn update_metadata(
        &self,
        id: &str,
        metadata: Option<ChatMetadata>,
    ) -> Result<ChatRecord, HistoryError> {
        let chat = self.require(id).await?;

        let mut request = SaveChat::from_record(chat);
        request.metadata = metadata;
        self.save(request).await
    }

    /// Removes the chat and its snapshot. The two deletes run independently
    /// and both must finish; a missing row on either side is fine.
    pub async fn delete(&self, id: &str) -> Result<(), HistoryError> {
        tokio::try_join!(self.store.delete_chat(id), self.store.delete_snapshot(id))?;
        tracing::info!(chat_id = %id, "deleted chat");
        Ok(())
    }
}
