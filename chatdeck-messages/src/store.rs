//! Message Store
//!
//! The boundary between the conversation core and the platform message
//! store. Consumers read through [`MessageSource`]; the aggregator itself
//! never touches storage and accepts rows in any order.
//!
//! Two implementations ship here: [`SqliteMessageStore`], the persistent
//! mirror of phone-synced messages, and [`MemorySource`], a plain in-memory
//! source for tests and hosts without a database.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE messages (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     address TEXT NOT NULL,
//!     body TEXT,
//!     date INTEGER NOT NULL,
//!     type INTEGER NOT NULL DEFAULT 1,
//!     read INTEGER NOT NULL DEFAULT 1
//! );
//!
//! CREATE INDEX idx_messages_date ON messages(date DESC);
//! CREATE INDEX idx_messages_address ON messages(address, date);
//! ```
//!
//! Column names match the phone provider (`date` in epoch milliseconds,
//! `type` 1 = received / 2 = sent, `read` 0/1). `body` is nullable; NULL
//! reads back as the empty string.
//!
//! ## Storage Location
//!
//! Default path: `~/.local/share/chatdeck/messages.db`

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{params, Connection};
use tracing::{debug, info, warn};

use crate::error::{MessagesError, Result};
use crate::model::{Direction, MessageBatch, RawMessage};

/// Read access to a message store
///
/// The calling layer decides which query fits the screen: `inbox` for
/// inbox-level grouping, `conversation` for a single thread. Both are
/// synchronous single-shot reads; retry and batching policy belongs to the
/// caller, not here.
pub trait MessageSource {
    /// Received messages, newest first
    fn inbox(&self) -> Result<Vec<RawMessage>>;

    /// All messages exchanged with one address, oldest first
    fn conversation(&self, address: &str) -> Result<Vec<RawMessage>>;
}

/// SQLite-backed mirror of the phone's message store
pub struct SqliteMessageStore {
    conn: Mutex<Connection>,
}

impl SqliteMessageStore {
    /// Open the store at the default database path
    pub fn open_default() -> Result<Self> {
        Self::open(Self::default_path()?)
    }

    /// Open or create the store at an explicit path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        debug!("Opening message store at {}", path.display());
        let conn = Connection::open(path)?;

        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Open a transient in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Default database path under the local data directory
    fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_local_dir().ok_or_else(|| {
            MessagesError::StoragePath("could not determine local data directory".to_string())
        })?;
        Ok(data_dir.join("chatdeck").join("messages.db"))
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock_conn();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                address TEXT NOT NULL,
                body TEXT,
                date INTEGER NOT NULL,
                type INTEGER NOT NULL DEFAULT 1,
                read INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_messages_date ON messages(date DESC);
            CREATE INDEX IF NOT EXISTS idx_messages_address ON messages(address, date);",
        )?;
        Ok(())
    }

    /// Insert one message row
    pub fn insert(&self, message: &RawMessage) -> Result<()> {
        let conn = self.lock_conn();
        conn.execute(
            "INSERT INTO messages (address, body, date, type, read) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.address,
                message.body,
                message.timestamp,
                message.direction.type_code(),
                message.read as i64,
            ],
        )?;
        Ok(())
    }

    /// Insert a synced batch in one transaction
    ///
    /// Rows without an address cannot be grouped and are skipped with a
    /// warning. Returns the number of rows stored.
    pub fn import_batch(&self, batch: &MessageBatch) -> Result<usize> {
        let mut conn = self.lock_conn();
        let tx = conn.transaction()?;
        let mut stored = 0usize;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO messages (address, body, date, type, read) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for message in &batch.messages {
                if message.address.is_empty() {
                    warn!("Skipping synced row with no address (date {})", message.timestamp);
                    continue;
                }
                stmt.execute(params![
                    message.address,
                    message.body,
                    message.timestamp,
                    message.direction.type_code(),
                    message.read as i64,
                ])?;
                stored += 1;
            }
        }

        tx.commit()?;
        info!("Imported {} of {} synced messages", stored, batch.messages.len());
        Ok(stored)
    }

    /// Parse and store a sync payload
    ///
    /// Accepts either a batch envelope (`{"messages": [...]}`) or a bare
    /// row array; phones ship both shapes depending on app version.
    pub fn import_json(&self, json: &str) -> Result<usize> {
        let value: serde_json::Value = serde_json::from_str(json)?;

        let batch = if value.is_array() {
            MessageBatch {
                messages: serde_json::from_value(value)?,
            }
        } else if value.get("messages").is_some() {
            serde_json::from_value(value)?
        } else {
            return Err(MessagesError::InvalidBatch(
                "expected a row array or a batch envelope".to_string(),
            ));
        };

        self.import_batch(&batch)
    }

    /// Delete every message exchanged with one address
    ///
    /// Returns the number of rows removed.
    pub fn clear_conversation(&self, address: &str) -> Result<usize> {
        let conn = self.lock_conn();
        let removed = conn.execute("DELETE FROM messages WHERE address = ?1", params![address])?;
        info!("Cleared conversation with {} ({} rows)", address, removed);
        Ok(removed)
    }

    /// Total stored rows
    pub fn message_count(&self) -> Result<usize> {
        let conn = self.lock_conn();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn lock_conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        // A poisoned lock still holds a usable connection; sqlite keeps the
        // database consistent across a holder's panic.
        self.conn
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn query_rows(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> Result<Vec<RawMessage>> {
        let conn = self.lock_conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| {
            let body: Option<String> = row.get(1)?;
            Ok(RawMessage {
                address: row.get(0)?,
                body: body.unwrap_or_default(),
                timestamp: row.get(2)?,
                direction: Direction::from_type_code(row.get(3)?),
                read: row.get::<_, i64>(4)? != 0,
            })
        })?;

        let mut messages = Vec::new();
        for row in rows {
            messages.push(row?);
        }
        Ok(messages)
    }
}

impl MessageSource for SqliteMessageStore {
    fn inbox(&self) -> Result<Vec<RawMessage>> {
        self.query_rows(
            "SELECT address, body, date, type, read FROM messages
             WHERE type = 1 ORDER BY date DESC",
            &[],
        )
    }

    fn conversation(&self, address: &str) -> Result<Vec<RawMessage>> {
        self.query_rows(
            "SELECT address, body, date, type, read FROM messages
             WHERE address = ?1 ORDER BY date ASC",
            &[&address],
        )
    }
}

/// In-memory message source for tests and database-less hosts
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    messages: Vec<RawMessage>,
}

impl MemorySource {
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self { messages }
    }

    pub fn push(&mut self, message: RawMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl MessageSource for MemorySource {
    fn inbox(&self) -> Result<Vec<RawMessage>> {
        let mut messages: Vec<RawMessage> = self
            .messages
            .iter()
            .filter(|m| m.direction == Direction::Received)
            .cloned()
            .collect();
        messages.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(messages)
    }

    fn conversation(&self, address: &str) -> Result<Vec<RawMessage>> {
        let mut messages: Vec<RawMessage> = self
            .messages
            .iter()
            .filter(|m| m.address == address)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}
