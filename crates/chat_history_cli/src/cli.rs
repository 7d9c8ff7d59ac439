use anyhow::{Context as _, bail};
use chat_history_domain::{ChatMessage, ChatMetadata, Snapshot};
use chat_history_store::{ChatHistory, HistoryConfig, SaveChat};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::io::Read as _;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "chat-history",
    about = "Inspect and edit the local chat history database"
)]
pub struct Cli {
    /// Database file. Overrides CHAT_HISTORY_DB and CHAT_HISTORY_ROOT.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Store url ids as given instead of randomizing them.
    #[arg(long, global = true)]
    keep_url_ids: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every chat.
    List,

    /// Show one chat by id or url id.
    Show { id: String },

    /// Write a chat from a JSON message list.
    Save(SaveCmd),

    /// Change a chat's description.
    Rename { id: String, description: String },

    /// Replace a chat's metadata; omit the JSON to clear it.
    SetMetadata { id: String, metadata: Option<String> },

    /// Delete a chat together with its snapshot.
    Delete { id: String },

    /// Copy a chat up to and including one message.
    Fork { id: String, message_id: String },

    /// Copy a whole chat.
    Duplicate { id: String },

    /// Create a new chat with the next free id.
    Create(CreateCmd),

    /// Print the id the next created chat would get.
    NextId,

    /// Print the first free url id for a candidate.
    ResolveUrlId { candidate: String },

    #[command(subcommand)]
    Snapshot(SnapshotCommand),
}

#[derive(Debug, Args)]
struct SaveCmd {
    #[arg(long)]
    id: String,

    /// JSON array of messages; `-` reads stdin.
    #[arg(long)]
    messages: PathBuf,

    #[arg(long)]
    url_id: Option<String>,

    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    timestamp: Option<String>,

    /// Metadata as inline JSON.
    #[arg(long)]
    metadata: Option<String>,
}

#[derive(Debug, Args)]
struct CreateCmd {
    #[arg(long)]
    description: String,

    /// JSON array of messages; `-` reads stdin.
    #[arg(long)]
    messages: PathBuf,

    /// Metadata as inline JSON.
    #[arg(long)]
    metadata: Option<String>,
}

/// Project snapshots stored next to chats.
#[derive(Debug, Subcommand)]
enum SnapshotCommand {
    Get {
        chat_id: String,
    },
    /// Store a snapshot read from a JSON file; `-` reads stdin.
    Set {
        chat_id: String,
        file: PathBuf,
    },
    Delete {
        chat_id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedChat {
    url_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeletedChat<'a> {
    deleted: &'a str,
}

impl Cli {
    fn config(&self) -> anyhow::Result<HistoryConfig> {
        let mut config = HistoryConfig::from_env().context("invalid chat history environment")?;
        if let Some(db) = &self.db {
            config.db_path = Some(db.clone());
        }
        if self.keep_url_ids {
            config.options.randomize_url_ids = false;
        }
        Ok(config)
    }

    pub async fn dispatch(self) -> anyhow::Result<()> {
        let config = self.config()?;
        let Some(history) = ChatHistory::open(config).await else {
            if self.cmd.writes() {
                bail!(
                    "chat history persistence is unavailable; set CHAT_HISTORY_DB or CHAT_HISTORY_ROOT"
                );
            }
            tracing::warn!("chat history persistence is unavailable; showing empty result");
            return self.cmd.print_unavailable();
        };

        self.cmd.run(&history).await
    }
}

impl Command {
    fn writes(&self) -> bool {
        match self {
            Command::List
            | Command::Show { .. }
            | Command::NextId
            | Command::ResolveUrlId { .. }
            | Command::Snapshot(SnapshotCommand::Get { .. }) => false,
            Command::Save(_)
            | Command::Rename { .. }
            | Command::SetMetadata { .. }
            | Command::Delete { .. }
            | Command::Fork { .. }
            | Command::Duplicate { .. }
            | Command::Create(_)
            | Command::Snapshot(SnapshotCommand::Set { .. } | SnapshotCommand::Delete { .. }) => {
                true
            }
        }
    }

    fn print_unavailable(&self) -> anyhow::Result<()> {
        match self {
            Command::List => print_json(&Vec::<()>::new()),
            _ => print_json(&()),
        }
    }

    async fn run(self, history: &ChatHistory) -> anyhow::Result<()> {
        match self {
            Command::List => print_json(&history.get_all().await?),
            Command::Show { id } => print_json(&history.get(&id).await?),
            Command::Save(cmd) => {
                let mut request = SaveChat::new(cmd.id, read_messages(&cmd.messages)?);
                request.url_id = cmd.url_id;
                request.description = cmd.description;
                request.timestamp = cmd.timestamp;
                request.metadata = cmd.metadata.as_deref().map(parse_metadata).transpose()?;
                print_json(&history.save(request).await?)
            }
            Command::Rename { id, description } => {
                print_json(&history.update_description(&id, &description).await?)
            }
            Command::SetMetadata { id, metadata } => {
                let metadata = metadata.as_deref().map(parse_metadata).transpose()?;
                print_json(&history.update_metadata(&id, metadata).await?)
            }
            Command::Delete { id } => {
                history.delete(&id).await?;
                print_json(&DeletedChat { deleted: &id })
            }
            Command::Fork { id, message_id } => print_json(&CreatedChat {
                url_id: history.fork(&id, &message_id).await?,
            }),
            Command::Duplicate { id } => print_json(&CreatedChat {
                url_id: history.duplicate(&id).await?,
            }),
            Command::Create(cmd) => {
                let messages = read_messages(&cmd.messages)?;
                let metadata = cmd.metadata.as_deref().map(parse_metadata).transpose()?;
                let url_id = history
                    .create_from_messages(&cmd.description, messages, metadata)
                    .await?;
                print_json(&CreatedChat { url_id })
            }
            Command::NextId => print_json(&history.next_id().await?),
            Command::ResolveUrlId { candidate } => {
                print_json(&history.resolve_url_id(&candidate).await?)
            }
            Command::Snapshot(SnapshotCommand::Get { chat_id }) => {
                print_json(&history.get_snapshot(&chat_id).await?)
            }
            Command::Snapshot(SnapshotCommand::Set { chat_id, file }) => {
                let snapshot: Snapshot = read_json(&file)?;
                history.set_snapshot(&chat_id, snapshot).await?;
                print_json(&serde_json::json!({ "chatId": chat_id }))
            }
            Command::Snapshot(SnapshotCommand::Delete { chat_id }) => {
                history.delete_snapshot(&chat_id).await?;
                print_json(&serde_json::json!({ "chatId": chat_id }))
            }
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let mut raw = String::new();
    if path == Path::new("-") {
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read stdin")?;
    } else {
        raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
    }
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn read_messages(path: &Path) -> anyhow::Result<Vec<ChatMessage>> {
    read_json(path)
}

fn parse_metadata(raw: &str) -> anyhow::Result<ChatMetadata> {
    serde_json::from_str(raw).context("failed to parse metadata JSON")
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to encode output")?;
    println!("{text}");
    Ok(())
}
