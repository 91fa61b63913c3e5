//! Core types shared by every layer: constants, errors and clocks.

pub mod clock;
pub mod constants;
mod error;

pub use clock::{elapsed_since, Clock, ManualClock, Millis, SystemClock};
pub use error::*;
