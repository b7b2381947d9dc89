//! Ink Reveal Core
//!
//! Leaf primitives shared by the reveal engine:
//!
//! - **Geometry**: points, sizes and rectangles in logical (DPI-independent) units
//! - **State Machines**: a small table-driven state machine for reveal lifecycles
//! - **Event Dispatch**: lifecycle callbacks (`RevealStart`, `Progress`, `RevealComplete`, ...)
//!
//! # Example
//!
//! ```rust
//! use ink_core::fsm::StateMachine;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum Light { Off, On }
//!
//! let mut fsm = StateMachine::builder(Light::Off)
//!     .on(Light::Off, "toggle", Light::On)
//!     .on(Light::On, "toggle", Light::Off)
//!     .build();
//!
//! assert_eq!(fsm.send("toggle"), Light::On);
//! ```

pub mod events;
pub mod fsm;
pub mod geometry;

pub use events::{EventKind, RevealEvent, RevealListeners};
pub use fsm::{StateMachine, StateMachineBuilder};
pub use geometry::{Point, Rect, Size};
