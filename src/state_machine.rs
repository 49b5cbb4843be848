//! Per-user intake conversation
//!
//! Implements the Elm Architecture pattern with pure state transitions:
//! the runtime owns the state, `transition` decides, effects do the I/O.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{ConvState, DeleteTarget, Session, SubmitterContext};
pub use transition::{transition, TransitionError};
