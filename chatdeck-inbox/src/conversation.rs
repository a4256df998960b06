//! Conversation Detail State
//!
//! State for a single thread: every message exchanged with one counterpart,
//! oldest first, the order a chat transcript renders in. The shell supplies
//! the counterpart address (usually from a tapped inbox row) and a message
//! source to load from.

use chatdeck_messages::{format_exact, MessageSource, RawMessage};
use tracing::{info, warn};

use crate::inbox::LoadPhase;

/// State holder for one conversation's message list
pub struct ConversationState {
    address: String,
    phase: LoadPhase,
    messages: Vec<RawMessage>,
}

impl ConversationState {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            phase: LoadPhase::NotLoaded,
            messages: Vec::new(),
        }
    }

    /// The counterpart address this thread belongs to
    pub fn counterpart(&self) -> &str {
        &self.address
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Load the thread from a message source
    pub fn load(&mut self, source: &dyn MessageSource) {
        self.phase = LoadPhase::Loading;

        match source.conversation(&self.address) {
            Ok(messages) => {
                info!(
                    "Loaded {} messages with {}",
                    messages.len(),
                    self.address
                );
                self.messages = messages;
                self.phase = LoadPhase::Ready;
            }
            Err(e) => {
                warn!("Loading conversation with {} failed: {}", self.address, e);
                self.phase = LoadPhase::Failed(e.user_message());
            }
        }
    }

    /// Messages oldest first
    pub fn messages(&self) -> &[RawMessage] {
        &self.messages
    }

    /// Whether the thread loaded and holds no messages
    pub fn is_empty(&self) -> bool {
        self.phase == LoadPhase::Ready && self.messages.is_empty()
    }

    /// The full timestamp a message bubble shows under its text
    pub fn bubble_time(&self, message: &RawMessage) -> String {
        format_exact(message.timestamp)
    }
}
