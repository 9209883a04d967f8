//! Chat messages carried on the daemon's bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Whether a message came from a user or is a reply to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Inbound,
    Outbound,
}

/// A chat message. Inbound and outbound messages share the bus, so consumers
/// filter on [`Envelope::direction`].
#[derive(Debug, Clone)]
pub struct Envelope {
    pub id: u64,
    pub timestamp: SystemTime,
    /// Where the message arrived, e.g. `"console"`. Replies keep it.
    pub channel: String,
    /// Author of an inbound message; recipient of an outbound one.
    pub sender: String,
    pub body: String,
    pub direction: Direction,
    /// For replies, the id of the message being answered.
    pub in_reply_to: Option<u64>,
}

impl Envelope {
    fn build(channel: String, sender: String, body: &str, direction: Direction) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            timestamp: SystemTime::now(),
            channel,
            sender,
            body: body.to_string(),
            direction,
            in_reply_to: None,
        }
    }

    /// An inbound message from `sender` on `channel`.
    pub fn new(channel: &str, sender: &str, body: &str) -> Self {
        Self::build(channel.into(), sender.into(), body, Direction::Inbound)
    }

    /// The outbound answer to this message, addressed back to its sender.
    pub fn reply(&self, body: &str) -> Self {
        Self {
            in_reply_to: Some(self.id),
            ..Self::build(
                self.channel.clone(),
                self.sender.clone(),
                body,
                Direction::Outbound,
            )
        }
    }

    pub fn is_inbound(&self) -> bool {
        self.direction == Direction::Inbound
    }
}
