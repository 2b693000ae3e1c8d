use crate::domain::errors::RepositoryError;

/// Convert sqlx errors to repository backend errors
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::backend(format!("Database error: {}", err))
    }
}
