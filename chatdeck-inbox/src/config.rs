//! Screen Configuration
//!
//! One configured component replaces the family of near-identical message
//! screens a mobile app tends to accumulate: the deltas between those
//! screens reduce to a handful of flags, captured here. A shell constructs
//! the config once (or deserializes a persisted one) and hands it to
//! [`InboxState`](crate::InboxState).

use chatdeck_messages::TimeStyle;
use serde::{Deserialize, Serialize};

/// How the inbox groups raw messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    /// One row per counterpart address (conversation summaries)
    #[default]
    ByCounterpart,
    /// One row per message, newest first
    Flat,
}

/// Feature flags and presentation choices for an inbox screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenConfig {
    /// Offer a search box filtering by address or preview text
    #[serde(default)]
    pub enable_search: bool,

    /// Allow removing a conversation from the list
    #[serde(default)]
    pub enable_edit: bool,

    /// Grouping applied when the screen refreshes
    #[serde(default)]
    pub grouping: GroupingStrategy,

    /// Timestamp style shown next to each row
    #[serde(default)]
    pub time_style: TimeStyle,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl ScreenConfig {
    /// The plain inbox: grouped list, no search, no editing
    pub fn classic() -> Self {
        Self {
            enable_search: false,
            enable_edit: false,
            grouping: GroupingStrategy::ByCounterpart,
            time_style: TimeStyle::Calendar,
        }
    }

    /// Grouped inbox with the search box enabled
    pub fn searchable() -> Self {
        Self {
            enable_search: true,
            ..Self::classic()
        }
    }

    /// Everything on: search and conversation removal
    pub fn full() -> Self {
        Self {
            enable_search: true,
            enable_edit: true,
            ..Self::classic()
        }
    }
}
