use serde_json::{Map, Value};

pub const FORK_SUFFIX: &str = " (fork)";
pub const COPY_SUFFIX: &str = " (copy)";
pub const FORKED_CHAT_FALLBACK_DESCRIPTION: &str = "Forked chat";
pub const COPIED_CHAT_FALLBACK_DESCRIPTION: &str = "Chat";

/// A single chat message. Only `id` is interpreted here; every other field is
/// carried through untouched.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl ChatMessage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            rest: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rest.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub netlify_site_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_id: Option<String>,
    pub messages: Vec<ChatMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ChatMetadata>,
}

impl ChatRecord {
    /// Messages up to and including the first one whose id is `message_id`.
    pub fn messages_through(&self, message_id: &str) -> Option<&[ChatMessage]> {
        let index = self.messages.iter().position(|m| m.id == message_id)?;
        Some(&self.messages[..=index])
    }

    pub fn fork_description(&self) -> String {
        match self.description.as_deref() {
            Some(description) if !description.is_empty() => format!("{description}{FORK_SUFFIX}"),
            _ => FORKED_CHAT_FALLBACK_DESCRIPTION.to_owned(),
        }
    }

    pub fn copy_description(&self) -> String {
        let base = match self.description.as_deref() {
            Some(description) if !description.is_empty() => description,
            _ => COPIED_CHAT_FALLBACK_DESCRIPTION,
        };
        format!("{base}{COPY_SUFFIX}")
    }
}

/// Opaque project state saved next to a chat.
#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Snapshot(pub Value);

#[derive(Clone, Debug, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub chat_id: String,
    pub snapshot: Snapshot,
}
