//! chatdeck message core
//!
//! Pure data-transformation core for the chatdeck desktop messages
//! companion: it turns raw phone-synced message rows into inbox-ready
//! conversation summaries and display timestamps, and owns the storage
//! boundary those rows are read through.
//!
//! The two central functions ([`aggregate`] and [`format_relative`]) are
//! synchronous pure functions with no I/O and no retained state; they can be
//! called from any thread or task context. Rendering, navigation, and
//! platform permission flows live in whatever shell consumes this crate.

pub mod aggregate;
pub mod model;
pub mod store;
pub mod timefmt;

mod error;

pub use aggregate::aggregate;
pub use error::{MessagesError, Result};
pub use model::{
    ConversationSummary, Direction, MessageBatch, RawMessage, TYPE_CODE_RECEIVED, TYPE_CODE_SENT,
};
pub use store::{MemorySource, MessageSource, SqliteMessageStore};
pub use timefmt::{
    format_elapsed, format_elapsed_in, format_exact, format_exact_in, format_relative,
    format_relative_in, TimeStyle,
};
