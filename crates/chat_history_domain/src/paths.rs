use std::path::{Path, PathBuf};

pub const CHAT_HISTORY_ROOT_ENV: &str = "CHAT_HISTORY_ROOT";
pub const CHAT_HISTORY_DB_ENV: &str = "CHAT_HISTORY_DB";
pub const CHAT_HISTORY_KEEP_URL_IDS_ENV: &str = "CHAT_HISTORY_KEEP_URL_IDS";

pub fn sqlite_path(root: &Path) -> PathBuf {
    root.join("chat_history.db")
}
