//! SQLite error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be mapped back to its entity type
    #[error("Corrupt {entity} row {id}: {reason}")]
    Decode {
        entity: &'static str,
        id: i64,
        reason: String,
    },

    /// A write referenced a row that does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),
}

impl SqliteError {
    /// Map foreign key violations to `InvalidReference`
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err
            && db_err.is_foreign_key_violation()
        {
            return Self::InvalidReference(what.to_string());
        }
        Self::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = SqliteError::Decode {
            entity: "Patient",
            id: 4,
            reason: "unknown sex 'X'".to_string(),
        };
        assert_eq!(err.to_string(), "Corrupt Patient row 4: unknown sex 'X'");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let sqlite_err: SqliteError = io_err.into();
        assert!(sqlite_err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_write_passes_through_other_errors() {
        let err = SqliteError::from_write(sqlx::Error::RowNotFound, "provider 9");
        assert!(matches!(err, SqliteError::Database(sqlx::Error::RowNotFound)));
    }
}
