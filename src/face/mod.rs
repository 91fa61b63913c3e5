//! Face layer: packet dispatch between a transport and handlers.
//!
//! ```text
//! ┌───────────────┐ process_* ┌──────────────────────────┐
//! │ PacketHandler │ ◄──────── │          Face            │
//! │  (in order)   │           │ decode ▲     ▼ encode    │
//! └───────────────┘           ├──────────────────────────┤
//!                             │        Transport         │
//!                             └──────────────────────────┘
//! ```
//!
//! The face owns its transport. Handlers are registered as shared
//! `RefCell` references, so a handler such as the ping client can be
//! borrowed mutably by the driver between polls while staying registered.

mod dispatcher;
mod error;
mod handler;

pub use dispatcher::Face;
pub use error::FaceError;
pub use handler::PacketHandler;
