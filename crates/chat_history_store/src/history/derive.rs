use super::{ChatHistory, SaveChat};
use crate::error::HistoryError;
use chat_history_domain::{ChatMessage, ChatMetadata};

impl ChatHistory {
    /// New chat holding the messages up to and including `message_id`.
    /// Returns the new chat's url id.
    pub async fn fork(&self, chat_id: &str, message_id: &str) -> Result<String, HistoryError> {
        let chat = self.require(chat_id).await?;
        let messages = chat
            .messages_through(message_id)
            .ok_or_else(|| HistoryError::not_found(format!("message {message_id}")))?
            .to_vec();

        let url_id = self
            .create_from_messages(&chat.fork_description(), messages, None)
            .await?;
        tracing::info!(source = %chat.id, message_id = %message_id, url_id = %url_id, "forked chat");
        Ok(url_id)
    }

    pub async fn duplicate(&self, chat_id: &str) -> Result<String, HistoryError> {
        let chat = self.require(chat_id).await?;
        let description = chat.copy_description();

        let url_id = self
            .create_from_messages(&description, chat.messages, None)
            .await?;
        tracing::info!(source = %chat.id, url_id = %url_id, "duplicated chat");
        Ok(url_id)
    }

    /// Allocates the next id, derives a url id from it, and saves. Returns the
    /// url id that was stored, which callers use for navigation.
    pub async fn create_from_messages(
        &self,
        description: &str,
        messages: Vec<ChatMessage>,
        metadata: Option<ChatMetadata>,
    ) -> Result<String, HistoryError> {
        let id = self.next_id().await?;
        let candidate = self.resolve_url_id(&id).await?;

        let mut request = SaveChat::new(id, messages)
            .url_id(candidate)
            .description(description);
        request.metadata = metadata;

        let record = self.save(request).await?;
        Ok(record.url_id.unwrap_or(record.id))
    }
}
