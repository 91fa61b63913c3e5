//! # ndn-ping
//!
//! NDN reachability probing for resource-constrained devices.
//!
//! The crate is split into small layers, each usable on its own:
//!
//! - **Packets**: a minimal NDN TLV codec for Name, Interest, Data and
//!   NDNLPv2 Nack, built on fixed-capacity storage
//! - **Transports**: a non-blocking datagram contract with BLE server, UDP
//!   and in-memory links
//! - **Face**: owns one transport and dispatches decoded packets to
//!   registered handlers
//! - **Ping client**: a handler that sends numbered probes on an interval
//!   and reports responses, nacks and timeouts
//!
//! Everything is single-threaded and poll driven. The caller's main loop
//! polls the face and ticks the client; nothing blocks.
//!
//! ## Feature Flags
//!
//! - `udp` (default): [`transport::UdpTransport`] on a tokio socket
//! - `ble` (default): [`transport::BleServerTransport`] over a BLE device
//!   handle
//!
//! ## Modules
//!
//! - [`core`]: Constants, error types and clocks
//! - [`packet`]: TLV codec and packet types
//! - [`transport`]: Transport trait and implementations
//! - [`face`]: Packet dispatch
//! - [`ping`]: Ping client
//!
//! ## Example Usage
//!
//! ```rust
//! use std::cell::RefCell;
//! use ndn_ping::prelude::*;
//!
//! let clock = ManualClock::new(0);
//! let mut interest = Interest::new(Name::from_uri("/ndn/device/ping")?).with_must_be_fresh(true);
//!
//! let client = RefCell::new(PingClient::new(
//!     &mut interest,
//!     &clock,
//!     PingConfig::new(1000).with_timeout(800),
//! )?);
//! client
//!     .borrow_mut()
//!     .on_event(|event, seq| println!("{event} seq={seq}"));
//!
//! let mut face = Face::new(MemoryTransport::opened());
//! face.add_handler(&client)?;
//!
//! // One iteration of the device main loop.
//! face.poll();
//! client.borrow_mut().tick(&mut face);
//!
//! assert!(client.borrow().is_pending());
//! assert_eq!(face.transport().sent_len(), 1);
//! # Ok::<(), ndn_ping::PingError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod core;
pub mod face;
pub mod packet;
pub mod ping;
pub mod transport;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::core::*;

    pub use crate::face::{Face, FaceError, PacketHandler};
    pub use crate::packet::{Component, Data, Interest, Nack, NackReason, Name, Packet};
    pub use crate::ping::{PingClient, PingConfig, PingEvent, PingStats};
    pub use crate::transport::{
        EndpointId, MemoryTransport, Transport, TransportError, TransportResult,
        DEFAULT_ENDPOINT,
    };

    #[cfg(feature = "ble")]
    pub use crate::transport::{BleDevice, BleServerConfig, BleServerTransport, BleService};

    #[cfg(feature = "udp")]
    pub use crate::transport::UdpTransport;
}

// Re-export commonly used items at crate root
pub use crate::core::{ConfigError, DecodeError, EncodeError, PingError};
pub use face::{Face, FaceError, PacketHandler};
pub use ping::{PingClient, PingConfig, PingEvent};
pub use transport::{Transport, TransportError};
