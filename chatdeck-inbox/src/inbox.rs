//! Inbox Screen State
//!
//! Presentation-agnostic state for the conversations list: what is loaded,
//! what the search query is, and which rows are currently visible. A UI
//! layer binds to this and renders; nothing here knows about widgets,
//! navigation, or permissions.
//!
//! "No conversations" is a valid loaded state, distinct from "not loaded
//! yet"; the two render differently and [`LoadPhase`] keeps them apart.

use chatdeck_messages::{aggregate, ConversationSummary, MessageSource};
use tracing::{debug, info, warn};

use crate::config::{GroupingStrategy, ScreenConfig};
use crate::observer::{InboxEvent, InboxObserver};

/// Where the screen is in its load lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing requested yet
    #[default]
    NotLoaded,
    /// A refresh is in flight
    Loading,
    /// Data arrived; an empty list is still Ready
    Ready,
    /// The source failed; holds display-ready text
    Failed(String),
}

/// State holder for the conversations list screen
pub struct InboxState {
    config: ScreenConfig,
    phase: LoadPhase,
    summaries: Vec<ConversationSummary>,
    query: String,
    observers: Vec<Box<dyn InboxObserver>>,
}

impl InboxState {
    pub fn new(config: ScreenConfig) -> Self {
        Self {
            config,
            phase: LoadPhase::NotLoaded,
            summaries: Vec::new(),
            query: String::new(),
            observers: Vec::new(),
        }
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Register a subscriber for subsequent state changes
    pub fn subscribe(&mut self, observer: Box<dyn InboxObserver>) {
        self.observers.push(observer);
    }

    /// Reload the list from a message source
    ///
    /// Queries the source's inbox, applies the configured grouping, and
    /// moves to `Ready`, or to `Failed` with the error's user message if
    /// the source cannot deliver. A failed refresh keeps the previous rows
    /// so the screen can keep showing stale data next to the error.
    pub fn refresh(&mut self, source: &dyn MessageSource) {
        self.phase = LoadPhase::Loading;

        match source.inbox() {
            Ok(messages) => {
                self.summaries = match self.config.grouping {
                    GroupingStrategy::ByCounterpart => aggregate(&messages),
                    GroupingStrategy::Flat => flatten(&messages),
                };
                self.phase = LoadPhase::Ready;
                info!("Inbox refreshed: {} rows", self.summaries.len());
                self.notify(&InboxEvent::Loaded {
                    conversations: self.summaries.len(),
                });
            }
            Err(e) => {
                let reason = e.user_message();
                warn!("Inbox refresh failed: {}", e);
                self.phase = LoadPhase::Failed(reason.clone());
                self.notify(&InboxEvent::LoadFailed { reason });
            }
        }
    }

    /// All loaded rows, unfiltered
    pub fn summaries(&self) -> &[ConversationSummary] {
        &self.summaries
    }

    /// Whether the screen loaded successfully and has nothing to show
    pub fn is_empty(&self) -> bool {
        self.phase == LoadPhase::Ready && self.summaries.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Update the search query; ignored unless search is enabled
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.config.enable_search {
            debug!("Search disabled for this screen; query ignored");
            return;
        }
        self.query = query.into();
        self.notify(&InboxEvent::QueryChanged);
    }

    pub fn clear_query(&mut self) {
        if !self.query.is_empty() {
            self.query.clear();
            self.notify(&InboxEvent::QueryChanged);
        }
    }

    /// Rows matching the current query
    ///
    /// A blank query shows everything. Matching is case-insensitive against
    /// the counterpart address and the preview text, with surrounding
    /// whitespace ignored.
    pub fn visible(&self) -> Vec<&ConversationSummary> {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return self.summaries.iter().collect();
        }

        self.summaries
            .iter()
            .filter(|s| {
                s.address.to_lowercase().contains(&needle)
                    || s.last_message.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Remove a conversation from the list; requires editing enabled
    ///
    /// Returns whether a row was removed. This only drops the summary from
    /// the screen; deleting stored rows is the store owner's call
    /// (`SqliteMessageStore::clear_conversation`).
    pub fn remove_conversation(&mut self, address: &str) -> bool {
        if !self.config.enable_edit {
            debug!("Editing disabled for this screen; remove ignored");
            return false;
        }

        let before = self.summaries.len();
        self.summaries.retain(|s| s.address != address);
        let removed = self.summaries.len() != before;

        if removed {
            info!("Removed conversation with {}", address);
            self.notify(&InboxEvent::ConversationRemoved {
                address: address.to_string(),
            });
        }
        removed
    }

    /// The display timestamp for a row, in the configured style
    ///
    /// `now` is injected by the caller so the whole screen renders against
    /// one consistent clock reading.
    pub fn display_time(&self, summary: &ConversationSummary, now: i64) -> String {
        self.config.time_style.format(summary.last_timestamp, now)
    }

    fn notify(&self, event: &InboxEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

/// One row per message, newest first, for screens that skip grouping
fn flatten(messages: &[chatdeck_messages::RawMessage]) -> Vec<ConversationSummary> {
    let mut rows: Vec<ConversationSummary> = messages
        .iter()
        .map(|m| ConversationSummary {
            address: m.address.clone(),
            last_message: m.body.clone(),
            last_timestamp: m.timestamp,
            message_count: 1,
            unread_count: usize::from(!m.read),
        })
        .collect();
    rows.sort_by(|a, b| b.last_timestamp.cmp(&a.last_timestamp));
    rows
}
