//! Connection abstraction shared by all repositories.
//!
//! Stores are generic over an [`Executor`] so the same query code runs
//! against the connection pool or inside a borrowed transaction.

use sea_orm::{ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr};

use crate::errors::{AppError, FieldError};

/// Something queries can be executed on.
pub trait Executor: Send + Sync {
    type Connection: ConnectionTrait + Sync;

    fn connection(&self) -> &Self::Connection;
}

impl Executor for DatabaseConnection {
    type Connection = DatabaseConnection;

    fn connection(&self) -> &DatabaseConnection {
        self
    }
}

impl<'a> Executor for &'a DatabaseTransaction {
    type Connection = DatabaseTransaction;

    fn connection(&self) -> &DatabaseTransaction {
        *self
    }
}

/// Map a foreign key violation on insert to the request field it came from.
///
/// Constraints are named `fk_<table>_<column>`, so the column is read back
/// from the constraint name in the message.
pub(super) fn map_reference_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(message)) => {
            AppError::Validation(missing_references(&message))
        }
        _ => AppError::from(err),
    }
}

fn missing_references(message: &str) -> Vec<FieldError> {
    let mut fields = Vec::new();
    if message.contains("_album_id") {
        fields.push(FieldError::new("albumId", "Album does not exist"));
    }
    if message.contains("_singer_id") {
        fields.push(FieldError::new("singerId", "Singer does not exist"));
    }
    if fields.is_empty() {
        fields.push(FieldError::new("id", "Referenced record does not exist"));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reference_named_by_constraint() {
        let fields = missing_references(
            "insert or update on table \"songs\" violates foreign key constraint \"fk_songs_album_id\"",
        );
        assert_eq!(fields, vec![FieldError::new("albumId", "Album does not exist")]);

        let fields = missing_references("violates foreign key constraint \"fk_albums_singer_id\"");
        assert_eq!(fields[0].field, "singerId");
    }

    #[test]
    fn test_other_errors_pass_through() {
        let err = map_reference_error(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
