pub mod bus;
pub mod handler;

pub use bus::{InputBus, KeyScheme, Subscription, SubscriptionId};
pub use handler::{InputHandler, KeyAction};
