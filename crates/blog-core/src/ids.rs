use anyhow::anyhow;

use crate::errors::AppError;

/// Rejects non-positive identifiers taken from a path or body.
///
/// Row identifiers are `BIGSERIAL`, so anything below 1 is a client mistake
/// and never reaches the database.
pub fn require_positive_id(id: i64, entity: &str) -> Result<i64, AppError> {
    if id < 1 {
        return Err(AppError::bad_request(anyhow!("Invalid {entity} id")));
    }
    Ok(id)
}
