//! Routes steering keys to whoever subscribed for that key scheme.
//!
//! Keyboard agents subscribe in `setup` and unsubscribe in `teardown`; the
//! terminal loop publishes every steering key it sees.

use std::sync::mpsc::{channel, Receiver, Sender};

use serde::{Deserialize, Serialize};

use crate::game::Direction;

/// Which group of keys steers a keyboard agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyScheme {
    #[default]
    Arrows,
    Wasd,
}

impl std::str::FromStr for KeyScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "arrows" => Ok(Self::Arrows),
            "wasd" => Ok(Self::Wasd),
            other => Err(format!("unknown key scheme '{other}' (expected arrows or wasd)")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Receiving end handed to a subscriber; headings arrive in press order
pub struct Subscription {
    pub id: SubscriptionId,
    pub receiver: Receiver<Direction>,
}

struct Subscriber {
    id: SubscriptionId,
    scheme: KeyScheme,
    sender: Sender<Direction>,
}

#[derive(Default)]
pub struct InputBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, scheme: KeyScheme) -> Subscription {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = channel();
        self.subscribers.push(Subscriber { id, scheme, sender });

        Subscription { id, receiver }
    }

    /// Returns false if the id was not subscribed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|subscriber| subscriber.id != id);
        self.subscribers.len() != before
    }

    /// Deliver a heading to every subscriber of `scheme`, returning how many got it.
    /// Subscribers whose receiver is gone are dropped.
    pub fn publish(&mut self, scheme: KeyScheme, direction: Direction) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|subscriber| {
            if subscriber.scheme != scheme {
                return true;
            }
            match subscriber.sender.send(direction) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => false,
            }
        });
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
