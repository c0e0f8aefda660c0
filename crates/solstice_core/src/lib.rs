//! Solstice Core
//!
//! Foundational primitives shared by the Solstice crates:
//!
//! - **Geometry**: points, sizes and rectangles in viewport pixels
//! - **State Machines**: typed flat state machines with wildcard transitions
//!   and a bounded transition history
//!
//! # Example
//!
//! ```rust
//! use solstice_core::fsm::StateMachine;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq)]
//! enum Phase { Idle, Busy }
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Signal { Start, Done }
//!
//! let mut fsm = StateMachine::builder(Phase::Idle)
//!     .on(Phase::Idle, Signal::Start, Phase::Busy)
//!     .on(Phase::Busy, Signal::Done, Phase::Idle)
//!     .build();
//!
//! fsm.send(Signal::Start);
//! assert_eq!(fsm.current_state(), Phase::Busy);
//! ```

pub mod fsm;
pub mod geometry;

pub use fsm::{StateMachine, StateMachineBuilder};
pub use geometry::{Point, Rect, Size};
