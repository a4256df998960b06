//! chatdeck screen state
//!
//! Presentation-agnostic state holders for the chatdeck inbox and
//! conversation screens. One parameterized [`InboxState`] replaces a family
//! of near-identical screens: a [`ScreenConfig`] picks the feature set
//! (search, editing, grouping, timestamp style) instead of the codebase
//! carrying one screen per combination.
//!
//! Nothing here renders or navigates. A shell subscribes via
//! [`InboxObserver`], drives refreshes against any
//! [`MessageSource`](chatdeck_messages::MessageSource), and draws whatever
//! the state exposes.

pub mod config;
pub mod conversation;
pub mod inbox;
pub mod observer;

pub use config::{GroupingStrategy, ScreenConfig};
pub use conversation::ConversationState;
pub use inbox::{InboxState, LoadPhase};
pub use observer::{InboxEvent, InboxObserver};
