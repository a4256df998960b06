//! Conversation Aggregation
//!
//! Groups a flat batch of raw message rows by counterpart address into
//! inbox-ready conversation summaries. The input carries no ordering
//! precondition (the phone may deliver rows newest-first, oldest-first, or
//! interleaved across threads) and the output is always sorted newest
//! conversation first.
//!
//! Aggregation is a pure function: it retains no state between calls, never
//! mutates its input, and is safe to invoke from any thread.

use std::collections::HashMap;

use crate::model::{ConversationSummary, RawMessage};

/// Group raw messages into conversation summaries
///
/// One summary is produced per distinct `address` in the input. Within a
/// group the row with the greatest timestamp supplies the preview body; on
/// an exact timestamp tie the earliest input row wins. Summaries are sorted
/// by last timestamp descending, and groups with identical last timestamps
/// keep their first-seen order (the sort is stable).
///
/// An empty batch yields an empty vec; this is a valid "no conversations"
/// result, not an error.
///
/// # Examples
///
/// ```
/// use chatdeck_messages::{aggregate, RawMessage};
///
/// let summaries = aggregate(&[
///     RawMessage::received("A", "hi", 100),
///     RawMessage::received("B", "yo", 200),
///     RawMessage::received("A", "bye", 300),
/// ]);
///
/// assert_eq!(summaries.len(), 2);
/// assert_eq!(summaries[0].address, "A");
/// assert_eq!(summaries[0].last_message, "bye");
/// assert_eq!(summaries[0].message_count, 2);
/// ```
pub fn aggregate(messages: &[RawMessage]) -> Vec<ConversationSummary> {
    struct Group<'a> {
        last: &'a RawMessage,
        count: usize,
        unread: usize,
    }

    // Accumulate in first-seen order; the index map only locates the group.
    let mut groups: Vec<(&str, Group)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for msg in messages {
        match index.get(msg.address.as_str()) {
            Some(&i) => {
                let group = &mut groups[i].1;
                group.count += 1;
                if !msg.read {
                    group.unread += 1;
                }
                // Strictly greater, so the first row with the max timestamp wins ties
                if msg.timestamp > group.last.timestamp {
                    group.last = msg;
                }
            }
            None => {
                index.insert(msg.address.as_str(), groups.len());
                groups.push((
                    msg.address.as_str(),
                    Group {
                        last: msg,
                        count: 1,
                        unread: usize::from(!msg.read),
                    },
                ));
            }
        }
    }

    let mut summaries: Vec<ConversationSummary> = groups
        .into_iter()
        .map(|(address, group)| ConversationSummary {
            address: address.to_string(),
            last_message: group.last.body.clone(),
            last_timestamp: group.last.timestamp,
            message_count: group.count,
            unread_count: group.unread,
        })
        .collect();

    // sort_by is stable: equal timestamps keep accumulation order
    summaries.sort_by(|a, b| b.last_timestamp.cmp(&a.last_timestamp));
    summaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_single_message() {
        let summaries = aggregate(&[RawMessage::received("A", "hi", 100)]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].address, "A");
        assert_eq!(summaries[0].last_message, "hi");
        assert_eq!(summaries[0].last_timestamp, 100);
        assert_eq!(summaries[0].message_count, 1);
    }

    #[test]
    fn test_grouping_and_ordering() {
        let summaries = aggregate(&[
            RawMessage::received("A", "hi", 100),
            RawMessage::received("B", "yo", 200),
            RawMessage::received("A", "bye", 300),
        ]);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].address, "A");
        assert_eq!(summaries[0].last_message, "bye");
        assert_eq!(summaries[0].last_timestamp, 300);
        assert_eq!(summaries[0].message_count, 2);
        assert_eq!(summaries[1].address, "B");
        assert_eq!(summaries[1].last_message, "yo");
        assert_eq!(summaries[1].message_count, 1);
    }

    #[test]
    fn test_unordered_input() {
        let summaries = aggregate(&[
            RawMessage::received("A", "bye", 300),
            RawMessage::received("B", "yo", 200),
            RawMessage::received("A", "hi", 100),
        ]);

        assert_eq!(summaries[0].last_message, "bye");
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn test_exact_tie_first_occurrence_wins() {
        let summaries = aggregate(&[
            RawMessage::received("A", "first", 500),
            RawMessage::received("A", "second", 500),
        ]);

        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].last_message, "first");
        assert_eq!(summaries[0].message_count, 2);
    }

    #[test]
    fn test_equal_timestamps_keep_first_seen_group_order() {
        let summaries = aggregate(&[
            RawMessage::received("A", "a", 100),
            RawMessage::received("B", "b", 100),
            RawMessage::received("C", "c", 100),
        ]);

        let addresses: Vec<&str> = summaries.iter().map(|s| s.address.as_str()).collect();
        assert_eq!(addresses, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_empty_body_preserved() {
        let summaries = aggregate(&[RawMessage::received("A", "", 100)]);
        assert_eq!(summaries[0].last_message, "");
    }

    #[test]
    fn test_unread_counting() {
        let summaries = aggregate(&[
            RawMessage::received("A", "one", 100).unread(),
            RawMessage::received("A", "two", 200),
            RawMessage::received("A", "three", 300).unread(),
        ]);

        assert_eq!(summaries[0].unread_count, 2);
        assert!(!summaries[0].is_read());
    }

    #[test]
    fn test_message_counts_sum_to_input_len() {
        let input = vec![
            RawMessage::received("A", "1", 10),
            RawMessage::sent("A", "2", 20),
            RawMessage::received("B", "3", 30),
            RawMessage::received("C", "4", 5),
            RawMessage::sent("B", "5", 40),
        ];

        let summaries = aggregate(&input);
        let total: usize = summaries.iter().map(|s| s.message_count).sum();
        assert_eq!(total, input.len());
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let input = vec![
            RawMessage::received("A", "hi", 100),
            RawMessage::received("B", "yo", 200),
        ];

        assert_eq!(aggregate(&input), aggregate(&input));
    }
}
