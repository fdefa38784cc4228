use anyhow::{bail, Result};
use tracing::debug;

use super::Agent;
use crate::game::{Direction, GameState};
use crate::input::{InputBus, KeyScheme, Subscription};

/// Plays whatever the human pressed, one buffered key per tick
pub struct KeyboardAgent {
    scheme: KeyScheme,
    subscription: Option<Subscription>,
}

impl KeyboardAgent {
    pub fn new(scheme: KeyScheme) -> Self {
        Self {
            scheme,
            subscription: None,
        }
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }
}

impl Agent for KeyboardAgent {
    fn name(&self) -> &str {
        "keyboard"
    }

    fn next_move(&mut self, state: &GameState, index: usize) -> Direction {
        let current = state.snakes[index].direction;
        self.subscription
            .as_ref()
            .and_then(|subscription| subscription.receiver.try_recv().ok())
            .unwrap_or(current)
    }

    fn setup(&mut self, input: &mut InputBus) -> Result<()> {
        if self.subscription.is_some() {
            bail!("keyboard agent is already listening on {:?}", self.scheme);
        }
        debug!(scheme = ?self.scheme, "Keyboard agent listening");
        self.subscription = Some(input.subscribe(self.scheme));
        Ok(())
    }

    /// Keys pressed for the previous board are dropped
    fn reset(&mut self) {
        if let Some(subscription) = &self.subscription {
            let stale = subscription.receiver.try_iter().count();
            if stale > 0 {
                debug!(scheme = ?self.scheme, stale, "Dropped buffered keys");
            }
        }
    }

    fn teardown(&mut self, input: &mut InputBus) {
        if let Some(subscription) = self.subscription.take() {
            input.unsubscribe(subscription.id);
            debug!(scheme = ?self.scheme, "Keyboard agent stopped listening");
        }
    }
}
