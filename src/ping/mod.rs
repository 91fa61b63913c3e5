//! Ping client: NDN reachability probing.
//!
//! A probe is an Interest whose name ends in a sequence number component.
//! The client sends one every interval and reports each probe and its
//! outcome (response, nack or timeout) to a callback:
//!
//! ```text
//! PingClient::tick ──► Face::send_interest ──► Transport
//!                                                  │
//! callback ◄── PingClient::process_data ◄── Face::poll
//! ```

mod client;
mod config;
mod event;
mod stats;

pub use client::PingClient;
pub use config::PingConfig;
pub use event::{EventCallback, PingEvent};
pub use stats::PingStats;
