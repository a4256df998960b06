//! Message Model
//!
//! Data types shared across the conversation core. `RawMessage` mirrors one
//! row of the phone's message provider as it arrives over sync; the field
//! renames match the provider's column names (`address`, `body`, `date`,
//! `type`, `read`) so a sync payload deserializes without an adapter layer.
//!
//! ## Raw row format
//!
//! ```json
//! {"address": "+15551234567", "body": "hi", "date": 1733059200000, "type": 1, "read": 1}
//! ```
//!
//! - `date`: UNIX epoch milliseconds, phone clock
//! - `type`: provider type code (1 = received, 2 = sent)
//! - `read`: 0 = unread, 1 = read; absent means read

use serde::{Deserialize, Serialize};

/// Provider type code for a received message
pub const TYPE_CODE_RECEIVED: i32 = 1;

/// Provider type code for a sent message
pub const TYPE_CODE_SENT: i32 = 2;

/// Direction of a message relative to the local user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Sent by the counterpart
    #[default]
    Received,
    /// Sent by the local user
    Sent,
}

impl Direction {
    /// Map a provider type code to a direction
    ///
    /// Only code 2 means "sent by me"; every other code (inbox, draft,
    /// outbox, failed) renders on the counterpart side of a summary.
    pub fn from_type_code(code: i32) -> Self {
        if code == TYPE_CODE_SENT {
            Self::Sent
        } else {
            Self::Received
        }
    }

    /// The provider type code for this direction
    pub fn type_code(&self) -> i32 {
        match self {
            Self::Received => TYPE_CODE_RECEIVED,
            Self::Sent => TYPE_CODE_SENT,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Sent => "sent",
        }
    }

    /// Whether this message was sent by the local user
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent)
    }
}

/// One raw message row from the phone's message store
///
/// The core does not validate or normalize `address`; it is whatever
/// identifier the provider reports. `body` may be empty; a NULL body in the
/// store deserializes to `""` rather than failing, since bodyless rows
/// legitimately occur.
///
/// # Examples
///
/// ```
/// use chatdeck_messages::{Direction, RawMessage};
///
/// let row = r#"{"address": "+15551234567", "body": "hi", "date": 100, "type": 1, "read": 1}"#;
/// let msg: RawMessage = serde_json::from_str(row).unwrap();
/// assert_eq!(msg.direction, Direction::Received);
/// assert!(msg.read);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Phone number or identifier of the remote party
    pub address: String,

    /// Message text; empty when the row has no body
    #[serde(default, deserialize_with = "deserialize_body")]
    pub body: String,

    /// UNIX timestamp in milliseconds, phone clock
    #[serde(rename = "date")]
    pub timestamp: i64,

    /// Direction, stored as the provider's raw type code
    #[serde(
        rename = "type",
        default,
        serialize_with = "serialize_direction",
        deserialize_with = "deserialize_direction"
    )]
    pub direction: Direction,

    /// Read status; rows without the flag count as read
    #[serde(
        default = "default_read",
        serialize_with = "serialize_read",
        deserialize_with = "deserialize_read"
    )]
    pub read: bool,
}

impl RawMessage {
    /// Convenience constructor for a received, read message
    pub fn received(address: impl Into<String>, body: impl Into<String>, timestamp: i64) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            timestamp,
            direction: Direction::Received,
            read: true,
        }
    }

    /// Convenience constructor for a sent message
    pub fn sent(address: impl Into<String>, body: impl Into<String>, timestamp: i64) -> Self {
        Self {
            address: address.into(),
            body: body.into(),
            timestamp,
            direction: Direction::Sent,
            read: true,
        }
    }

    /// Builder pattern: mark the message unread
    pub fn unread(mut self) -> Self {
        self.read = false;
        self
    }
}

/// Summary of one conversation for inbox display
///
/// Produced by [`aggregate`](crate::aggregate); one summary per distinct
/// counterpart address. Immutable once produced: the aggregator builds a
/// fresh set on every call and retains nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    /// Counterpart address, unique across a summary set
    pub address: String,
    /// Body of the newest message in the group
    pub last_message: String,
    /// Timestamp of the newest message (ms since epoch)
    pub last_timestamp: i64,
    /// Total messages sharing this address, always >= 1
    pub message_count: usize,
    /// Messages in the group with `read == false`
    pub unread_count: usize,
}

impl ConversationSummary {
    /// Whether every message in the conversation has been read
    pub fn is_read(&self) -> bool {
        self.unread_count == 0
    }
}

/// Envelope for a batch of raw rows as shipped by a phone sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBatch {
    /// Raw rows, in whatever order the phone produced them
    pub messages: Vec<RawMessage>,
}

fn default_read() -> bool {
    true
}

/// Deserialize a body field, mapping JSON null to the empty string
fn deserialize_body<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let body: Option<String> = Deserialize::deserialize(deserializer)?;
    Ok(body.unwrap_or_default())
}

fn serialize_direction<S>(direction: &Direction, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i32(direction.type_code())
}

fn deserialize_direction<'de, D>(deserializer: D) -> Result<Direction, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let code: i32 = Deserialize::deserialize(deserializer)?;
    Ok(Direction::from_type_code(code))
}

fn serialize_read<S>(read: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_i32(if *read { 1 } else { 0 })
}

/// Deserialize a read flag, accepting the provider's 0/1 integer or a bool
fn deserialize_read<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let value: serde_json::Value = Deserialize::deserialize(deserializer)?;
    match value {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(1) != 0),
        serde_json::Value::Null => Ok(true),
        _ => Err(Error::custom("read must be a number or bool")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_type_code() {
        assert_eq!(Direction::from_type_code(1), Direction::Received);
        assert_eq!(Direction::from_type_code(2), Direction::Sent);
        // Draft/outbox/failed codes all land on the counterpart side
        assert_eq!(Direction::from_type_code(3), Direction::Received);
        assert_eq!(Direction::from_type_code(0), Direction::Received);
    }

    #[test]
    fn test_direction_roundtrip() {
        assert_eq!(
            Direction::from_type_code(Direction::Sent.type_code()),
            Direction::Sent
        );
        assert_eq!(
            Direction::from_type_code(Direction::Received.type_code()),
            Direction::Received
        );
    }

    #[test]
    fn test_raw_message_deserialization() {
        let row = r#"{"address": "+15551234567", "body": "hello", "date": 1733059200000, "type": 2, "read": 0}"#;
        let msg: RawMessage = serde_json::from_str(row).unwrap();

        assert_eq!(msg.address, "+15551234567");
        assert_eq!(msg.body, "hello");
        assert_eq!(msg.timestamp, 1733059200000);
        assert_eq!(msg.direction, Direction::Sent);
        assert!(!msg.read);
    }

    #[test]
    fn test_null_body_becomes_empty() {
        let row = r#"{"address": "A", "body": null, "date": 100, "type": 1}"#;
        let msg: RawMessage = serde_json::from_str(row).unwrap();
        assert_eq!(msg.body, "");
    }

    #[test]
    fn test_missing_read_defaults_to_read() {
        let row = r#"{"address": "A", "body": "x", "date": 100, "type": 1}"#;
        let msg: RawMessage = serde_json::from_str(row).unwrap();
        assert!(msg.read);
    }

    #[test]
    fn test_read_accepts_bool() {
        let row = r#"{"address": "A", "body": "x", "date": 100, "type": 1, "read": false}"#;
        let msg: RawMessage = serde_json::from_str(row).unwrap();
        assert!(!msg.read);
    }

    #[test]
    fn test_serialization_uses_provider_columns() {
        let msg = RawMessage::sent("B", "yo", 200);
        let value = serde_json::to_value(&msg).unwrap();

        assert_eq!(value["date"], 200);
        assert_eq!(value["type"], 2);
        assert_eq!(value["read"], 1);
        assert!(value.get("timestamp").is_none());
    }

    #[test]
    fn test_batch_deserialization() {
        let json = r#"{"messages": [
            {"address": "A", "body": "hi", "date": 100, "type": 1, "read": 1},
            {"address": "B", "body": null, "date": 200, "type": 2}
        ]}"#;
        let batch: MessageBatch = serde_json::from_str(json).unwrap();

        assert_eq!(batch.messages.len(), 2);
        assert_eq!(batch.messages[1].body, "");
        assert_eq!(batch.messages[1].direction, Direction::Sent);
    }

    #[test]
    fn test_unread_builder() {
        let msg = RawMessage::received("A", "hi", 100).unread();
        assert!(!msg.read);
    }
}
