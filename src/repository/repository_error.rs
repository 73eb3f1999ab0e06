use std::fmt;

#[derive(Debug)]
pub enum RepositoryError {
    NotFound(String),
    AlreadyExists(String),
    DatabaseError(String),
    ConnectionError(String),
    SerializationError(String),
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            RepositoryError::AlreadyExists(msg) => write!(f, "Already Exists: {}", msg),
            RepositoryError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            RepositoryError::ConnectionError(msg) => write!(f, "Connection Error: {}", msg),
            RepositoryError::SerializationError(msg) => write!(f, "Serialization Error: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

// Convenient constructors
impl RepositoryError {
    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        RepositoryError::NotFound(msg.into())
    }

    pub fn already_exists<T: Into<String>>(msg: T) -> Self {
        RepositoryError::AlreadyExists(msg.into())
    }

    pub fn database<T: Into<String>>(msg: T) -> Self {
        RepositoryError::DatabaseError(msg.into())
    }

    pub fn connection<T: Into<String>>(msg: T) -> Self {
        RepositoryError::ConnectionError(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        RepositoryError::SerializationError(msg.into())
    }
}

// SQLite-specific conversions
impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepositoryError::already_exists(format!("Duplicate key: {}", db_err))
            }
            sqlx::Error::RowNotFound => RepositoryError::not_found("Row not found"),
            sqlx::Error::Decode(_) | sqlx::Error::ColumnDecode { .. } => {
                RepositoryError::serialization(format!("Row decode error: {}", err))
            }
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                RepositoryError::connection(format!("Connection error: {}", err))
            }
            _ => RepositoryError::database(err.to_string()),
        }
    }
}

// Result type alias for convenience
pub type RepositoryResult<T> = Result<T, RepositoryError>;
