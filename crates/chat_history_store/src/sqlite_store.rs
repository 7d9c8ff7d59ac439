use crate::error::HistoryError;
use anyhow::{Context as _, anyhow};
use chat_history_domain::{ChatMessage, ChatMetadata, ChatRecord, Snapshot};
use rusqlite::{Connection, OptionalExtension as _, Row, params};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use tokio::sync::oneshot;

const LATEST_SCHEMA_VERSION: u32 = 2;

const MIGRATIONS: &[(u32, &str)] = &[
    (
        1,
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/migrations/0001_chats.sql"
        )),
    ),
    (
        2,
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/migrations/0002_snapshots.sql"
        )),
    ),
];

const CHAT_COLUMNS: &str = "id, url_id, description, timestamp, messages_json, metadata_json";

type Reply<T> = oneshot::Sender<Result<T, HistoryError>>;

/// Handle to the sqlite worker thread. Every method is a single request to
/// the worker and is atomic on its own; nothing spans more than one request.
#[derive(Clone)]
pub(crate) struct SqliteStore {
    tx: mpsc::Sender<DbCommand>,
}

enum DbCommand {
    GetChat {
        id: String,
        reply: Reply<Option<ChatRecord>>,
    },
    GetChatByUrlId {
        url_id: String,
        reply: Reply<Option<ChatRecord>>,
    },
    ListChats {
        reply: Reply<Vec<ChatRecord>>,
    },
    ListChatIds {
        reply: Reply<Vec<String>>,
    },
    ListUrlIds {
        reply: Reply<Vec<String>>,
    },
    PutChat {
        record: Box<ChatRecord>,
        reply: Reply<()>,
    },
    DeleteChat {
        id: String,
        reply: Reply<()>,
    },
    GetSnapshot {
        chat_id: String,
        reply: Reply<Option<Snapshot>>,
    },
    PutSnapshot {
        chat_id: String,
        snapshot: Snapshot,
        reply: Reply<()>,
    },
    DeleteSnapshot {
        chat_id: String,
        reply: Reply<()>,
    },
}

impl SqliteStore {
    /// Opens the database on a dedicated worker thread. Resolves to `None`
    /// when the database cannot be opened or migrated; the failure is logged.
    pub async fn open(db_path: PathBuf) -> Option<Self> {
        match Self::spawn(db_path.clone()).await {
            Ok(store) => {
                tracing::debug!(path = %db_path.display(), "chat history database opened");
                Some(store)
            }
            Err(err) => {
                tracing::error!(
                    path = %db_path.display(),
                    error = %format!("{err:#}"),
                    "chat history persistence unavailable"
                );
                None
            }
        }
    }

    async fn spawn(db_path: PathBuf) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel::<DbCommand>();
        let (ready_tx, ready_rx) = oneshot::channel::<anyhow::Result<()>>();

        std::thread::Builder::new()
            .name("chat-history-sqlite".to_owned())
            .spawn(move || {
                let mut db = match SqliteDatabase::open(&db_path) {
                    Ok(db) => {
                        let _ = ready_tx.send(Ok(()));
                        db
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err));
                        return;
                    }
                };
                while let Ok(cmd) = rx.recv() {
                    db.handle(cmd);
                }
            })
            .context("failed to spawn sqlite worker thread")?;

        ready_rx
            .await
            .context("sqlite worker terminated during open")??;
        Ok(Self { tx })
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> DbCommand,
    ) -> Result<T, HistoryError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(command(reply_tx))
            .map_err(|_| HistoryError::Storage(anyhow!("sqlite worker is not running")))?;
        reply_rx
            .await
            .map_err(|_| HistoryError::Storage(anyhow!("sqlite worker terminated")))?
    }

    pub async fn get_chat(&self, id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        let id = id.to_owned();
        self.request(|reply| DbCommand::GetChat { id, reply }).await
    }

    pub async fn get_chat_by_url_id(
        &self,
        url_id: &str,
    ) -> Result<Option<ChatRecord>, HistoryError> {
        let url_id = url_id.to_owned();
        self.request(|reply| DbCommand::GetChatByUrlId { url_id, reply })
            .await
    }

    pub async fn list_chats(&self) -> Result<Vec<ChatRecord>, HistoryError> {
        self.request(|reply| DbCommand::ListChats { reply }).await
    }

    pub async fn list_chat_ids(&self) -> Result<Vec<String>, HistoryError> {
        self.request(|reply| DbCommand::ListChatIds { reply }).await
    }

    /// Every non-empty url id currently stored.
    pub async fn list_url_ids(&self) -> Result<Vec<String>, HistoryError> {
        self.request(|reply| DbCommand::ListUrlIds { reply }).await
    }

    /// Inserts or replaces the chat with `record.id`. A `url_id` owned by a
    /// different chat fails with `HistoryError::Constraint`.
    pub async fn put_chat(&self, record: ChatRecord) -> Result<(), HistoryError> {
        let record = Box::new(record);
        self.request(|reply| DbCommand::PutChat { record, reply })
            .await
    }

    pub async fn delete_chat(&self, id: &str) -> Result<(), HistoryError> {
        let id = id.to_owned();
        self.request(|reply| DbCommand::DeleteChat { id, reply })
            .await
    }

    pub async fn get_snapshot(&self, chat_id: &str) -> Result<Option<Snapshot>, HistoryError> {
        let chat_id = chat_id.to_owned();
        self.request(|reply| DbCommand::GetSnapshot { chat_id, reply })
            .await
    }

    pub async fn put_snapshot(&self, chat_id: &str, snapshot: Snapshot) -> Result<(), HistoryError> {
        let chat_id = chat_id.to_owned();
        self.request(|reply| DbCommand::PutSnapshot {
            chat_id,
            snapshot,
            reply,
        })
        .await
    }

    pub async fn delete_snapshot(&self, chat_id: &str) -> Result<(), HistoryError> {
        let chat_id = chat_id.to_owned();
        self.request(|reply| DbCommand::DeleteSnapshot { chat_id, reply })
            .await
    }
}

struct SqliteDatabase {
    conn: Connection,
}

impl SqliteDatabase {
    fn open(db_path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let mut conn = Connection::open(db_path)
            .with_context(|| format!("failed to open sqlite db {}", db_path.display()))?;

        configure_connection(&mut conn).context("failed to configure sqlite connection")?;
        apply_migrations(&mut conn).context("failed to apply sqlite migrations")?;

        Ok(Self { conn })
    }

    fn handle(&mut self, cmd: DbCommand) {
        match cmd {
            DbCommand::GetChat { id, reply } => {
                let _ = reply.send(self.get_chat(&id));
            }
            DbCommand::GetChatByUrlId { url_id, reply } => {
                let _ = reply.send(self.get_chat_by_url_id(&url_id));
            }
            DbCommand::ListChats { reply } => {
                let _ = reply.send(self.list_chats());
            }
            DbCommand::ListChatIds { reply } => {
                let _ = reply.send(self.list_chat_ids());
            }
            DbCommand::ListUrlIds { reply } => {
                let _ = reply.send(self.list_url_ids());
            }
            DbCommand::PutChat { record, reply } => {
                let _ = reply.send(self.put_chat(&record));
            }
            DbCommand::DeleteChat { id, reply } => {
                let _ = reply.send(self.delete_chat(&id));
            }
            DbCommand::GetSnapshot { chat_id, reply } => {
                let _ = reply.send(self.get_snapshot(&chat_id));
            }
            DbCommand::PutSnapshot {
                chat_id,
                snapshot,
                reply,
            } => {
                let _ = reply.send(self.put_snapshot(&chat_id, &snapshot));
            }
            DbCommand::DeleteSnapshot { chat_id, reply } => {
                let _ = reply.send(self.delete_snapshot(&chat_id));
            }
        }
    }

    fn get_chat(&mut self, id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CHAT_COLUMNS} FROM chats WHERE id = ?1"),
                params![id],
                read_chat_row,
            )
            .optional()
            .context("failed to load chat")?;
        row.map(decode_chat_row).transpose()
    }

    fn get_chat_by_url_id(&mut self, url_id: &str) -> Result<Option<ChatRecord>, HistoryError> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CHAT_COLUMNS} FROM chats WHERE url_id = ?1"),
                params![url_id],
                read_chat_row,
            )
            .optional()
            .context("failed to load chat by url id")?;
        row.map(decode_chat_row).transpose()
    }

    fn list_chats(&mut self) -> Result<Vec<ChatRecord>, HistoryError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats ORDER BY CAST(id AS INTEGER) ASC, id ASC"
        ))?;
        let rows = stmt.query_map([], read_chat_row)?;

        let mut chats = Vec::new();
        for row in rows {
            chats.push(decode_chat_row(row?)?);
        }
        Ok(chats)
    }

    fn list_chat_ids(&mut self) -> Result<Vec<String>, HistoryError> {
        let mut stmt = self.conn.prepare("SELECT id FROM chats")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn list_url_ids(&mut self) -> Result<Vec<String>, HistoryError> {
        let mut stmt = self
            .conn
            .prepare("SELECT url_id FROM chats WHERE url_id IS NOT NULL AND url_id <> ''")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn put_chat(&mut self, record: &ChatRecord) -> Result<(), HistoryError> {
        let messages_json =
            serde_json::to_string(&record.messages).context("failed to serialize messages")?;
        let metadata_json = record
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .context("failed to serialize metadata")?;

        // Upsert keyed on id only, so a url_id owned by another row aborts with
        // a unique violation instead of replacing that row.
        self.conn.execute(
            "INSERT INTO chats (id, url_id, description, timestamp, messages_json, metadata_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
               url_id = excluded.url_id,
               description = excluded.description,
               timestamp = excluded.timestamp,
               messages_json = excluded.messages_json,
               metadata_json = excluded.metadata_json",
            params![
                record.id,
                record.url_id,
                record.description,
                record.timestamp,
                messages_json,
                metadata_json,
            ],
        )?;
        Ok(())
    }

    fn delete_chat(&mut self, id: &str) -> Result<(), HistoryError> {
        self.conn
            .execute("DELETE FROM chats WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn get_snapshot(&mut self, chat_id: &str) -> Result<Option<Snapshot>, HistoryError> {
        let json = self
            .conn
            .query_row(
                "SELECT snapshot_json FROM snapshots WHERE chat_id = ?1",
                params![chat_id],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .context("failed to load snapshot")?;

        let Some(json) = json else {
            return Ok(None);
        };
        let snapshot: Snapshot =
            serde_json::from_str(&json).context("failed to parse snapshot")?;
        Ok(Some(snapshot))
    }

    fn put_snapshot(&mut self, chat_id: &str, snapshot: &Snapshot) -> Result<(), HistoryError> {
        let json = serde_json::to_string(snapshot).context("failed to serialize snapshot")?;
        self.conn.execute(
            "INSERT INTO snapshots (chat_id, snapshot_json) VALUES (?1, ?2)
             ON CONFLICT(chat_id) DO UPDATE SET snapshot_json = excluded.snapshot_json",
            params![chat_id, json],
        )?;
        Ok(())
    }

    fn delete_snapshot(&mut self, chat_id: &str) -> Result<(), HistoryError> {
        self.conn
            .execute("DELETE FROM snapshots WHERE chat_id = ?1", params![chat_id])?;
        Ok(())
    }
}

type ChatRow = (
    String,
    Option<String>,
    Option<String>,
    String,
    String,
    Option<String>,
);

fn read_chat_row(row: &Row<'_>) -> rusqlite::Result<ChatRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn decode_chat_row(row: ChatRow) -> Result<ChatRecord, HistoryError> {
    let (id, url_id, description, timestamp, messages_json, metadata_json) = row;
    let messages: Vec<ChatMessage> = serde_json::from_str(&messages_json)
        .with_context(|| format!("failed to parse messages of chat {id}"))?;
    let metadata = metadata_json
        .as_deref()
        .map(serde_json::from_str::<ChatMetadata>)
        .transpose()
        .with_context(|| format!("failed to parse metadata of chat {id}"))?;

    Ok(ChatRecord {
        id,
        url_id,
        messages,
        description,
        timestamp,
        metadata,
    })
}

fn configure_connection(conn: &mut Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA busy_timeout = 5000;",
    )
    .context("failed to apply sqlite PRAGMAs")?;
    Ok(())
}

fn apply_migrations(conn: &mut Connection) -> anyhow::Result<()> {
    let mut current: u32 = conn
        .query_row("PRAGMA user_version", [], |row| row.get::<_, i64>(0))
        .context("failed to read user_version")? as u32;

    if current > LATEST_SCHEMA_VERSION {
        return Err(anyhow!(
            "sqlite schema version is newer than this build: db={}, app={}",
            current,
            LATEST_SCHEMA_VERSION
        ));
    }

    if current == LATEST_SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch("BEGIN IMMEDIATE;")
        .context("failed to begin migration transaction")?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration v{version:04}"))?;
        conn.pragma_update(None, "user_version", *version as i64)
            .context("failed to update user_version")?;
        tracing::info!(version = *version, "applied chat history migration");
        current = *version;
    }

    conn.execute_batch("COMMIT;")
        .context("failed to commit migration transaction")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_db_path(test_name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push("chat-history-tests");
        let _ = std::fs::create_dir_all(&dir);
        dir.push(format!(
            "{test_name}-{}-{}.db",
            std::process::id(),
            chat_history_domain::unix_millis_now()
        ));
        dir
    }

    fn open_db(path: &Path) -> SqliteDatabase {
        SqliteDatabase::open(path).unwrap()
    }

    fn chat(id: &str, url_id: Option<&str>) -> ChatRecord {
        ChatRecord {
            id: id.to_owned(),
            url_id: url_id.map(str::to_owned),
            messages: vec![
                ChatMessage::new("m1").with_field("role", "user"),
                ChatMessage::new("m2").with_field("role", "assistant"),
            ],
            description: Some(format!("chat {id}")),
            timestamp: "2024-05-01T10:00:00.000Z".to_owned(),
            metadata: None,
        }
    }

    fn create_db_at_schema_version(path: &Path, target_version: u32) {
        let mut conn = Connection::open(path).unwrap();
        configure_connection(&mut conn).unwrap();

        conn.execute_batch("BEGIN IMMEDIATE;").unwrap();
        for (version, sql) in MIGRATIONS {
            if *version > target_version {
                break;
            }
            conn.execute_batch(sql).unwrap();
            conn.pragma_update(None, "user_version", *version as i64)
                .unwrap();
        }
        conn.execute_batch("COMMIT;").unwrap();
    }

    #[test]
    fn migrations_create_schema() {
        let path = temp_db_path("migrations_create_schema");
        let db = open_db(&path);

        let tables: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('chats','snapshots')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);

        let unique_index: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='index' AND name = 'chats_url_id'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(unique_index, 1);
    }

    #[test]
    fn migrations_reopen_does_not_fail() {
        let path = temp_db_path("migrations_reopen_does_not_fail");
        {
            let _db = open_db(&path);
        }

        let db = open_db(&path);
        let version: i64 = db
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version as u32, LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn migrations_upgrade_v1_database_in_place() {
        let path = temp_db_path("migrations_upgrade_v1_database_in_place");
        create_db_at_schema_version(&path, 1);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute(
                "INSERT INTO chats (id, url_id, description, timestamp, messages_json, metadata_json)
                 VALUES ('1', 'one', 'kept', '2024-05-01T10:00:00.000Z', '[]', NULL)",
                [],
            )
            .unwrap();
        }

        let mut db = open_db(&path);
        let version: i64 = db
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version as u32, LATEST_SCHEMA_VERSION);

        let kept = db.get_chat("1").unwrap().unwrap();
        assert_eq!(kept.description.as_deref(), Some("kept"));
        db.put_snapshot("1", &Snapshot(serde_json::json!({"files": {}})))
            .unwrap();
        assert!(db.get_snapshot("1").unwrap().is_some());
    }

    #[test]
    fn migrations_tolerate_tables_created_out_of_band() {
        let path = temp_db_path("migrations_tolerate_tables_created_out_of_band");
        create_db_at_schema_version(&path, 1);
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                "CREATE TABLE snapshots (chat_id TEXT PRIMARY KEY NOT NULL, snapshot_json TEXT NOT NULL);",
            )
            .unwrap();
        }

        let db = open_db(&path);
        let version: i64 = db
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version as u32, LATEST_SCHEMA_VERSION);
    }

    #[test]
    fn open_rejects_newer_schema() {
        let path = temp_db_path("open_rejects_newer_schema");
        {
            let conn = Connection::open(&path).unwrap();
            conn.pragma_update(None, "user_version", (LATEST_SCHEMA_VERSION + 1) as i64)
                .unwrap();
        }

        let err = SqliteDatabase::open(&path).err().unwrap();
        assert!(
            format!("{err:#}").contains("newer than this build"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn put_chat_round_trips_and_overwrites_by_id() {
        let path = temp_db_path("put_chat_round_trips_and_overwrites_by_id");
        let mut db = open_db(&path);

        let mut record = chat("1", Some("one"));
        db.put_chat(&record).unwrap();
        assert_eq!(db.get_chat("1").unwrap(), Some(record.clone()));
        assert_eq!(db.get_chat_by_url_id("one").unwrap(), Some(record.clone()));

        record.description = Some("renamed".to_owned());
        record.url_id = Some("uno".to_owned());
        db.put_chat(&record).unwrap();

        assert_eq!(db.list_chats().unwrap(), vec![record]);
        assert_eq!(db.get_chat_by_url_id("one").unwrap(), None);
    }

    #[test]
    fn put_chat_rejects_url_id_owned_by_another_chat() {
        let path = temp_db_path("put_chat_rejects_url_id_owned_by_another_chat");
        let mut db = open_db(&path);

        db.put_chat(&chat("1", Some("demo"))).unwrap();
        let err = db.put_chat(&chat("2", Some("demo"))).unwrap_err();
        assert!(err.is_constraint(), "unexpected error: {err:?}");

        assert_eq!(db.list_chat_ids().unwrap(), vec!["1".to_owned()]);
    }

    #[test]
    fn chats_without_url_ids_do_not_collide() {
        let path = temp_db_path("chats_without_url_ids_do_not_collide");
        let mut db = open_db(&path);

        db.put_chat(&chat("1", None)).unwrap();
        db.put_chat(&chat("2", None)).unwrap();
        db.put_chat(&chat("3", Some(""))).unwrap();

        assert_eq!(db.list_chats().unwrap().len(), 3);
        assert!(db.list_url_ids().unwrap().is_empty());
    }

    #[test]
    fn list_chats_orders_ids_numerically() {
        let path = temp_db_path("list_chats_orders_ids_numerically");
        let mut db = open_db(&path);

        for id in ["10", "2", "1"] {
            db.put_chat(&chat(id, None)).unwrap();
        }
        let ids = db
            .list_chats()
            .unwrap()
            .into_iter()
            .map(|c| c.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["1", "2", "10"]);
    }

    #[test]
    fn deletes_of_missing_rows_are_no_ops() {
        let path = temp_db_path("deletes_of_missing_rows_are_no_ops");
        let mut db = open_db(&path);

        db.delete_chat("404").unwrap();
        db.delete_snapshot("404").unwrap();
    }

    #[test]
    fn snapshots_overwrite_and_tolerate_orphans() {
        let path = temp_db_path("snapshots_overwrite_and_tolerate_orphans");
        let mut db = open_db(&path);

        db.put_snapshot("99", &Snapshot(serde_json::json!({"v": 1})))
            .unwrap();
        db.put_snapshot("99", &Snapshot(serde_json::json!({"v": 2})))
            .unwrap();
        assert_eq!(
            db.get_snapshot("99").unwrap(),
            Some(Snapshot(serde_json::json!({"v": 2})))
        );
        assert!(db.get_chat("99").unwrap().is_none());
    }

    #[test]
    fn corrupt_message_payloads_surface_as_storage_errors() {
        let path = temp_db_path("corrupt_message_payloads_surface_as_storage_errors");
        let mut db = open_db(&path);
        db.conn
            .execute(
                "INSERT INTO chats (id, url_id, description, timestamp, messages_json, metadata_json)
                 VALUES ('1', NULL, NULL, '2024-05-01T10:00:00.000Z', 'not json', NULL)",
                [],
            )
            .unwrap();

        let err = db.get_chat("1").unwrap_err();
        assert!(matches!(err, HistoryError::Storage(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn metadata_without_git_url_loads() {
        let path = temp_db_path("metadata_without_git_url_loads");
        let mut db = open_db(&path);
        db.conn
            .execute(
                "INSERT INTO chats (id, url_id, description, timestamp, messages_json, metadata_json)
                 VALUES ('1', NULL, NULL, '2024-05-01T10:00:00.000Z', '[]', '{\"netlifySiteId\":\"site-1\"}')",
                [],
            )
            .unwrap();

        let chat = db.get_chat("1").unwrap().unwrap();
        let metadata = chat.metadata.unwrap();
        assert_eq!(metadata.git_url, None);
        assert_eq!(metadata.netlify_site_id.as_deref(), Some("site-1"));
    }

    #[tokio::test]
    async fn store_handle_round_trips_through_worker() {
        let path = temp_db_path("store_handle_round_trips_through_worker");
        let store = SqliteStore::open(path).await.unwrap();

        store.put_chat(chat("1", Some("one"))).await.unwrap();
        assert_eq!(store.list_chat_ids().await.unwrap(), vec!["1".to_owned()]);
        assert_eq!(store.list_url_ids().await.unwrap(), vec!["one".to_owned()]);
        assert!(store.get_chat("1").await.unwrap().is_some());

        store.delete_chat("1").await.unwrap();
        assert!(store.get_chat("1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn open_resolves_to_none_when_path_is_unusable() {
        let dir = temp_db_path("open_resolves_to_none_when_path_is_unusable");
        std::fs::create_dir_all(&dir).unwrap();

        assert!(SqliteStore::open(dir).await.is_none());
    }
}
