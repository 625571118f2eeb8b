//! Fire-and-forget notifications for things that happen inside the engine.
//!
//! Subscribers (email, chat, analytics, ...) register a hook in [`EventHooks`]. The engine APIs publish events through
//! [`EventProducers`] and never wait for the handlers to run.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
