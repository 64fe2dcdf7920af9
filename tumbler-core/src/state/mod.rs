//! Session state machine
//!
//! Tracks which page of the operator workflow the machine is on. The
//! transitions are pure; the side effects of entering a state live in
//! [`Controller`](crate::controller::Controller).

pub mod events;
pub mod machine;

pub use events::{Event, InputEvent};
pub use machine::State;
