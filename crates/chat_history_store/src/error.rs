use rusqlite::ErrorCode;

/// Failure kinds surfaced by the chat history service.
///
/// "Persistence unavailable" is not an error: `ChatHistory::open` resolves to
/// `None` instead.
#[derive(Debug)]
pub enum HistoryError {
    Validation(String),
    NotFound(String),
    Constraint(String),
    Storage(anyhow::Error),
}

impl HistoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        HistoryError::Validation(message.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        HistoryError::NotFound(what.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HistoryError::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, HistoryError::NotFound(_))
    }

    pub fn is_constraint(&self) -> bool {
        matches!(self, HistoryError::Constraint(_))
    }
}

impl std::fmt::Display for HistoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryError::Validation(message) => write!(f, "invalid input: {message}"),
            HistoryError::NotFound(what) => write!(f, "{what} not found"),
            HistoryError::Constraint(message) => write!(f, "constraint violated: {message}"),
            HistoryError::Storage(err) => write!(f, "storage error: {err:#}"),
        }
    }
}

impl std::error::Error for HistoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryError::Storage(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for HistoryError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<rusqlite::Error>() {
            Some(sqlite) if is_unique_violation(sqlite) => {
                HistoryError::Constraint(format!("{err:#}"))
            }
            _ => HistoryError::Storage(err),
        }
    }
}

impl From<rusqlite::Error> for HistoryError {
    fn from(err: rusqlite::Error) -> Self {
        if is_unique_violation(&err) {
            HistoryError::Constraint(err.to_string())
        } else {
            HistoryError::Storage(anyhow::Error::new(err))
        }
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn unique_index_failures_map_to_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id TEXT PRIMARY KEY, slug TEXT);
             CREATE UNIQUE INDEX t_slug ON t(slug);
             INSERT INTO t (id, slug) VALUES ('1', 'a');",
        )
        .unwrap();

        let err = conn
            .execute("INSERT INTO t (id, slug) VALUES ('2', 'a')", [])
            .unwrap_err();
        let err = HistoryError::from(err);
        assert!(err.is_constraint(), "unexpected error: {err:?}");
    }

    #[test]
    fn other_sqlite_failures_map_to_storage() {
        let conn = Connection::open_in_memory().unwrap();
        let err = conn.execute("SELECT * FROM missing_table", []).unwrap_err();
        let err = HistoryError::from(err);
        assert!(matches!(err, HistoryError::Storage(_)));
        assert!(err.to_string().starts_with("storage error:"));
    }

    #[test]
    fn anyhow_wrapped_sqlite_errors_keep_their_kind() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (id TEXT PRIMARY KEY);
             INSERT INTO t (id) VALUES ('1');",
        )
        .unwrap();
        let err = conn
            .execute("INSERT INTO t (id) VALUES ('1')", [])
            .unwrap_err();
        let err = HistoryError::from(anyhow::Error::new(err));
        assert!(err.is_constraint());
    }

    #[test]
    fn display_names_the_failure_kind() {
        assert_eq!(
            HistoryError::validation("description cannot be empty").to_string(),
            "invalid input: description cannot be empty"
        );
        assert_eq!(HistoryError::not_found("chat 7").to_string(), "chat 7 not found");
    }
}
