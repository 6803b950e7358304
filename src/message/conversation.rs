//! Conversation derivation over a user's message history.
//!
//! The conversation list is a view, never stored: one row per distinct
//! counterparty, carrying the most recent message exchanged with them and
//! the requester's unread count from them. It is recomputed from the
//! message rows on every request, so it cannot go stale.

use std::collections::HashMap;

use uuid::Uuid;

use crate::user::UserProfile;

use super::message_dto::ConversationResponse;
use super::message_models::Message;

/// Groups `messages` by counterparty and reduces each group to its most
/// recent message plus the requester's unread count.
///
/// `messages` must contain every message where `requester` is sender or
/// receiver, ordered newest-first; ties in `created_at` resolve by input
/// order (first seen wins). Counterparties with no entry in `profiles`
/// are dropped rather than emitted as dangling references.
pub fn build_conversations(
    requester: Uuid,
    messages: &[Message],
    profiles: &HashMap<Uuid, UserProfile>,
) -> Vec<ConversationResponse> {
    struct Partition {
        last_message: Message,
        unread_count: i64,
    }

    // First pass: one partition per counterparty. The input is newest-first,
    // so the first message seen for a counterparty is their last message.
    let mut order: Vec<Uuid> = Vec::new();
    let mut partitions: HashMap<Uuid, Partition> = HashMap::new();

    for message in messages {
        let counterparty = if message.sender_id == requester {
            message.receiver_id
        } else {
            message.sender_id
        };

        let unread = message.receiver_id == requester && !message.is_read;

        match partitions.get_mut(&counterparty) {
            Some(partition) => {
                if unread {
                    partition.unread_count += 1;
                }
            }
            None => {
                order.push(counterparty);
                partitions.insert(
                    counterparty,
                    Partition {
                        last_message: message.clone(),
                        unread_count: if unread { 1 } else { 0 },
                    },
                );
            }
        }
    }

    // Second pass: join profiles and emit rows newest-conversation-first.
    // `order` already ranks counterparties by their last message, newest
    // first, and the stable sort keeps that ranking for equal timestamps.
    let mut conversations: Vec<ConversationResponse> = order
        .into_iter()
        .filter_map(|counterparty| {
            let partition = partitions.remove(&counterparty)?;
            let participant = profiles.get(&counterparty)?.clone();
            Some(ConversationResponse {
                participant,
                last_message: partition.last_message.into(),
                unread_count: partition.unread_count,
            })
        })
        .collect();

    conversations.sort_by(|a, b| b.last_message.created_at.cmp(&a.last_message.created_at));

    conversations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::message_models::MessageType;
    use chrono::{DateTime, TimeZone, Utc};

    fn ts(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(seconds, 0).unwrap()
    }

    fn message(sender: Uuid, receiver: Uuid, content: &str, at: i64, is_read: bool) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
            message_type: MessageType::Text,
            is_read,
            read_at: None,
            created_at: ts(at),
        }
    }

    fn profile(id: Uuid, username: &str) -> UserProfile {
        UserProfile {
            id,
            username: username.to_string(),
            profile_picture: None,
            last_active: ts(0),
        }
    }

    fn profiles_for(users: &[(Uuid, &str)]) -> HashMap<Uuid, UserProfile> {
        users
            .iter()
            .map(|(id, name)| (*id, profile(*id, name)))
            .collect()
    }

    /// Sorts newest-first the way the repository query does.
    fn newest_first(mut messages: Vec<Message>) -> Vec<Message> {
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages
    }

    #[test]
    fn no_messages_yields_empty_list() {
        let alice = Uuid::new_v4();
        let conversations = build_conversations(alice, &[], &HashMap::new());
        assert!(conversations.is_empty());
    }

    #[test]
    fn last_message_is_the_same_for_both_sides() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let messages = newest_first(vec![
            message(alice, bob, "first", 1, false),
            message(bob, alice, "second", 2, false),
        ]);
        let profiles = profiles_for(&[(alice, "alice"), (bob, "bob")]);

        let for_alice = build_conversations(alice, &messages, &profiles);
        let for_bob = build_conversations(bob, &messages, &profiles);

        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].participant.id, bob);
        assert_eq!(for_alice[0].last_message.content, "second");

        assert_eq!(for_bob.len(), 1);
        assert_eq!(for_bob[0].participant.id, alice);
        assert_eq!(for_bob[0].last_message.content, "second");
    }

    #[test]
    fn unread_count_only_counts_incoming_unread() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let messages = newest_first(vec![
            message(alice, bob, "hello", 100, true),
            message(bob, alice, "hi back", 105, false),
            message(alice, bob, "how are you", 110, false),
        ]);
        let profiles = profiles_for(&[(alice, "alice"), (bob, "bob")]);

        // Alice has one unviewed message from Bob.
        let for_alice = build_conversations(alice, &messages, &profiles);
        assert_eq!(for_alice[0].last_message.content, "how are you");
        assert_eq!(for_alice[0].unread_count, 1);

        // Bob has one unviewed message from Alice; Alice's earlier
        // message was already read.
        let for_bob = build_conversations(bob, &messages, &profiles);
        assert_eq!(for_bob[0].last_message.content, "how are you");
        assert_eq!(for_bob[0].unread_count, 1);
    }

    #[test]
    fn own_sent_messages_never_count_as_unread() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let messages = newest_first(vec![
            message(alice, bob, "one", 1, false),
            message(alice, bob, "two", 2, false),
        ]);
        let profiles = profiles_for(&[(alice, "alice"), (bob, "bob")]);

        let for_alice = build_conversations(alice, &messages, &profiles);
        assert_eq!(for_alice[0].unread_count, 0);

        let for_bob = build_conversations(bob, &messages, &profiles);
        assert_eq!(for_bob[0].unread_count, 2);
    }

    #[test]
    fn conversations_are_sorted_by_last_message_newest_first() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let messages = newest_first(vec![
            message(bob, alice, "old thread", 10, true),
            message(carol, alice, "new thread", 20, false),
        ]);
        let profiles = profiles_for(&[(alice, "alice"), (bob, "bob"), (carol, "carol")]);

        let conversations = build_conversations(alice, &messages, &profiles);
        assert_eq!(conversations.len(), 2);
        assert_eq!(conversations[0].participant.id, carol);
        assert_eq!(conversations[1].participant.id, bob);
    }

    #[test]
    fn missing_counterparty_profile_drops_the_row() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let deleted = Uuid::new_v4();
        let messages = newest_first(vec![
            message(bob, alice, "still here", 5, false),
            message(deleted, alice, "ghost", 6, false),
        ]);
        // Only Bob resolves to a profile.
        let profiles = profiles_for(&[(bob, "bob")]);

        let conversations = build_conversations(alice, &messages, &profiles);
        assert_eq!(conversations.len(), 1);
        assert_eq!(conversations[0].participant.id, bob);
    }

    #[test]
    fn created_at_ties_resolve_by_input_order() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let first = message(bob, alice, "store order first", 7, false);
        let second = message(bob, alice, "store order second", 7, false);
        // Newest-first input with equal timestamps keeps store order,
        // so the row inserted later comes first.
        let messages = vec![second.clone(), first.clone()];
        let profiles = profiles_for(&[(alice, "alice"), (bob, "bob")]);

        let conversations = build_conversations(alice, &messages, &profiles);
        assert_eq!(conversations[0].last_message.id, second.id);
        assert_eq!(conversations[0].unread_count, 2);
    }

    #[test]
    fn partitions_are_independent_per_counterparty() {
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let carol = Uuid::new_v4();
        let messages = newest_first(vec![
            message(bob, alice, "from bob", 1, false),
            message(alice, carol, "to carol", 2, false),
            message(carol, alice, "from carol", 3, false),
            message(carol, alice, "from carol again", 4, false),
        ]);
        let profiles = profiles_for(&[(bob, "bob"), (carol, "carol")]);

        let conversations = build_conversations(alice, &messages, &profiles);
        assert_eq!(conversations.len(), 2);

        let carol_row = &conversations[0];
        assert_eq!(carol_row.participant.id, carol);
        assert_eq!(carol_row.last_message.content, "from carol again");
        assert_eq!(carol_row.unread_count, 2);

        let bob_row = &conversations[1];
        assert_eq!(bob_row.participant.id, bob);
        assert_eq!(bob_row.unread_count, 1);
    }
}
