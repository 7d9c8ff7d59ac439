mod config;
mod env;
mod error;
mod history;
mod ids;
mod sqlite_store;

pub use config::{HistoryConfig, HistoryOptions};
pub use error::HistoryError;
pub use history::{ChatHistory, SaveChat};
