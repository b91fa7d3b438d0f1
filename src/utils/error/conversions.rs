//! Type conversions for RollcallError

use super::types::RollcallError;
use sea_orm::{DbErr, SqlErr};

// Unique violations are the storage backstop for access codes and roster pairs,
// so they surface as conflicts instead of opaque store failures.
impl From<DbErr> for RollcallError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                RollcallError::Conflict(format!("Unique constraint violated: {}", detail))
            }
            _ => RollcallError::Database(err),
        }
    }
}
