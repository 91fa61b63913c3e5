//! Transport layer: non-blocking datagram links.
//!
//! Every link presents the same contract through [`Transport`]:
//!
//! - **send** queues or writes a datagram immediately, or fails fast
//! - **receive** returns one available datagram, or `None` right away
//! - **endpoint ids** identify the peer a datagram came from or goes to
//!
//! Link setup (`begin`) is specific to each implementation because its
//! configuration is.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Face / handlers              │
//! ├─────────────────────────────────────────┤
//! │            Transport trait              │  ← This module
//! ├─────────────┬─────────────┬─────────────┤
//! │ BLE server  │    UDP      │   Memory    │
//! └─────────────┴─────────────┴─────────────┘
//! ```

#[cfg(feature = "ble")]
#[cfg_attr(docsrs, doc(cfg(feature = "ble")))]
mod ble;
mod error;
mod memory;
#[cfg(feature = "udp")]
#[cfg_attr(docsrs, doc(cfg(feature = "udp")))]
mod udp;

#[cfg(feature = "ble")]
pub use ble::*;
pub use error::*;
pub use memory::{MemoryTransport, MEMORY_QUEUE_DEPTH};
#[cfg(feature = "udp")]
pub use udp::*;

/// Opaque token identifying the peer of a datagram.
///
/// Only the transport that issued an id can interpret it.
pub type EndpointId = u64;

/// Endpoint used when the caller does not name one.
pub const DEFAULT_ENDPOINT: EndpointId = 0;

/// Non-blocking datagram link.
pub trait Transport {
    /// Whether `begin` completed and the link can carry datagrams.
    fn is_open(&self) -> bool;

    /// Send one datagram to `endpoint` without blocking.
    fn send(&mut self, packet: &[u8], endpoint: EndpointId) -> TransportResult<()>;

    /// Receive one datagram into `buf` without blocking.
    ///
    /// Returns the datagram length and its endpoint, or `None` when nothing
    /// is available or the transport is not open.
    fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn send(&mut self, packet: &[u8], endpoint: EndpointId) -> TransportResult<()> {
        (**self).send(packet, endpoint)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)> {
        (**self).receive(buf)
    }
}
