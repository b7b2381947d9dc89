//! Ink Reveal Animation
//!
//! Time remapping and frame pacing for ink reveals.
//!
//! # Features
//!
//! - **Easing**: the six reveal curves, anchored exactly at 0 and 1
//! - **Timelines**: lazy start, pause that freezes the clock, monotonic progress
//! - **Scheduling**: cancellable frame and delay handles driven by the host clock

pub mod easing;
pub mod scheduler;
pub mod timeline;

pub use easing::Easing;
pub use scheduler::{DelayHandle, FrameHandle, FrameScheduler, ManualScheduler, Wakeup, Wakeups};
pub use timeline::RevealTimeline;
