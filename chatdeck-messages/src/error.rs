//! Error handling for the message core
//!
//! Errors only arise at the store boundary (opening the database, reading
//! rows, parsing a sync batch). Aggregation and timestamp formatting are
//! total functions and never construct an error.
//!
//! Underlying library errors convert automatically via `thiserror`, so store
//! code propagates with `?`:
//!
//! ```rust
//! use chatdeck_messages::Result;
//!
//! fn parse_count(data: &str) -> Result<usize> {
//!     let value: serde_json::Value = serde_json::from_str(data)?;
//!     Ok(value.as_array().map(|a| a.len()).unwrap_or(0))
//! }
//! ```

use thiserror::Error;

/// Result type for message store operations
pub type Result<T> = std::result::Result<T, MessagesError>;

/// Errors that can occur at the message store boundary
#[derive(Error, Debug)]
pub enum MessagesError {
    /// I/O error (database directory creation, file access)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while parsing a sync batch
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// SQLite error from the backing store
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A sync batch that parsed but cannot be stored
    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    /// No usable location for the default database file
    #[error("Storage path unavailable: {0}")]
    StoragePath(String),
}

impl MessagesError {
    /// Display-ready message for an error surfaced to the user
    ///
    /// Screens show this string directly in their failed state; it avoids
    /// library-level detail the user cannot act on.
    pub fn user_message(&self) -> String {
        match self {
            MessagesError::Io(e) => {
                format!("Could not access message storage: {}.", e)
            }
            MessagesError::Json(_) => {
                "Received malformed message data from the phone.".to_string()
            }
            MessagesError::Database(_) => {
                "The message database is unavailable.".to_string()
            }
            MessagesError::InvalidBatch(msg) => {
                format!("Message sync rejected: {}.", msg)
            }
            MessagesError::StoragePath(_) => {
                "Could not determine where to store messages.".to_string()
            }
        }
    }
}
