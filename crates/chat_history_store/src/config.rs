use crate::env::{optional_flag_from_env, optional_trimmed_path_from_env};
use chat_history_domain::paths::{
    CHAT_HISTORY_DB_ENV, CHAT_HISTORY_KEEP_URL_IDS_ENV, CHAT_HISTORY_ROOT_ENV, sqlite_path,
};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HistoryOptions {
    /// Replace caller-supplied url ids with a randomized variant before the
    /// first write. Turning this off stores caller slugs verbatim (still
    /// de-duplicated with `-N` suffixes).
    pub randomize_url_ids: bool,
}

impl Default for HistoryOptions {
    fn default() -> Self {
        Self {
            randomize_url_ids: true,
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HistoryConfig {
    /// `None` means persistence is unavailable in this environment.
    pub db_path: Option<PathBuf>,
    pub options: HistoryOptions,
}

impl HistoryConfig {
    pub fn at(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: Some(db_path.into()),
            options: HistoryOptions::default(),
        }
    }

    pub fn with_options(mut self, options: HistoryOptions) -> Self {
        self.options = options;
        self
    }

    /// `CHAT_HISTORY_DB` wins over `CHAT_HISTORY_ROOT`; neither set leaves
    /// persistence unavailable.
    pub fn from_env() -> anyhow::Result<Self> {
        let db_path = match optional_trimmed_path_from_env(CHAT_HISTORY_DB_ENV)? {
            Some(path) => Some(path),
            None => optional_trimmed_path_from_env(CHAT_HISTORY_ROOT_ENV)?
                .map(|root| sqlite_path(&root)),
        };
        let keep_url_ids = optional_flag_from_env(CHAT_HISTORY_KEEP_URL_IDS_ENV)?.unwrap_or(false);

        Ok(Self {
            db_path,
            options: HistoryOptions {
                randomize_url_ids: !keep_url_ids,
            },
        })
    }
}
