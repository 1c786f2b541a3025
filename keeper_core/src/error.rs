use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The forum answered with a non-success status.
    #[error("Error fetching {context}: {status} {reason}")]
    RequestError {
        context: String,
        status: u16,
        reason: String,
    },
    /// The body was not JSON, or not shaped like a listing.
    #[error("Cannot parse response: {0}")]
    ParseError(String),
    /// The request never produced a response (connection, timeout).
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Post `{0}` not found")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    PersistenceError(String),
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
