use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors from a key/value store read or write.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would exceed the store's size quota.
    #[error("Storage quota exceeded ({used} of {quota} bytes)")]
    QuotaExceeded { used: usize, quota: usize },

    /// The backing database failed.
    #[error("Storage backend error: {0}")]
    Backend(#[from] sqlx::Error),
}

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another pagekit process holds the database lock
    #[error("Another pagekit process appears to be using the storage file. Please close it and try again.")]
    InstanceLocked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Classify a sqlx error, folding lock contention into `InstanceLocked`.
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::InstanceLocked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY, SQLITE_LOCKED and SQLITE_CANTOPEN all mean someone else has the file.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_messages_detected() {
        assert!(is_lock_message("error returned from database: database is locked"));
        assert!(is_lock_message("SQLITE_BUSY"));
        assert!(!is_lock_message("no such table: local_storage"));
    }

    #[test]
    fn test_quota_message() {
        let err = StorageError::QuotaExceeded {
            used: 12,
            quota: 10,
        };
        assert_eq!(err.to_string(), "Storage quota exceeded (12 of 10 bytes)");
    }
}
