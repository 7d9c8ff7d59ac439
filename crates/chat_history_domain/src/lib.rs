mod chat;
pub use chat::{
    COPIED_CHAT_FALLBACK_DESCRIPTION, COPY_SUFFIX, ChatMessage, ChatMetadata, ChatRecord,
    FORK_SUFFIX, FORKED_CHAT_FALLBACK_DESCRIPTION, Snapshot, SnapshotRecord,
};

mod url_id;
pub use url_id::{
    FALLBACK_SUFFIX_LEN, FALLBACK_URL_ID_PREFIX, RANDOMIZED_SUFFIX_LEN, base36_digit,
    fallback_url_id, next_chat_id, randomized_url_id, resolve_url_id, to_base36, url_id_prefix,
};

mod timestamp;
pub use timestamp::{
    format_timestamp, is_valid_timestamp, now_timestamp, parse_timestamp, unix_millis_now,
};

pub mod paths;
