//! Chat submission state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.
//! The executor in [`crate::chat`] applies the resulting effects.

mod effect;
pub mod event;
pub mod fallback;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatContext, ChatState};
pub use transition::{transition, TransitionError, TransitionResult};
