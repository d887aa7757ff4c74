use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ListingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ListingsError::Config("DATABASE_URL not set".into());
        assert_eq!(err.to_string(), "configuration error: DATABASE_URL not set");
    }

    #[test]
    fn test_database_error_from_sqlx() {
        let err: ListingsError = sqlx::Error::RowNotFound.into();
        assert!(err.to_string().starts_with("database error:"));
    }
}
