//! In-memory transport for host tests and simulation.

use heapless::{Deque, Vec as HVec};

use crate::core::constants::MAX_PACKET_SIZE;

use super::{EndpointId, Transport, TransportError, TransportResult};

/// Datagrams buffered per direction.
pub const MEMORY_QUEUE_DEPTH: usize = 8;

type Datagram = (HVec<u8, MAX_PACKET_SIZE>, EndpointId);

/// Transport backed by two fixed-depth queues.
///
/// `inject` plays the remote side: it queues a datagram for `receive`.
/// Datagrams passed to `send` are collected for `take_sent`.
#[derive(Debug, Default)]
pub struct MemoryTransport {
    open: bool,
    inbound: Deque<Datagram, MEMORY_QUEUE_DEPTH>,
    outbound: Deque<Datagram, MEMORY_QUEUE_DEPTH>,
}

impl MemoryTransport {
    /// Create a closed transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an open transport.
    pub fn opened() -> Self {
        let mut transport = Self::new();
        transport.open();
        transport
    }

    /// Open the link.
    pub fn open(&mut self) {
        self.open = true;
    }

    /// Close the link and drop everything queued.
    pub fn close(&mut self) {
        self.open = false;
        self.inbound.clear();
        self.outbound.clear();
    }

    /// Queue a datagram as if `endpoint` had sent it.
    pub fn inject(&mut self, packet: &[u8], endpoint: EndpointId) -> TransportResult<()> {
        let datagram = to_datagram(packet, endpoint)?;
        self.inbound
            .push_back(datagram)
            .map_err(|_| TransportError::WouldBlock)
    }

    /// Oldest datagram handed to `send`.
    pub fn take_sent(&mut self) -> Option<(HVec<u8, MAX_PACKET_SIZE>, EndpointId)> {
        self.outbound.pop_front()
    }

    /// Number of sent datagrams not yet taken.
    pub fn sent_len(&self) -> usize {
        self.outbound.len()
    }
}

fn to_datagram(packet: &[u8], endpoint: EndpointId) -> TransportResult<Datagram> {
    let bytes = HVec::from_slice(packet).map_err(|_| TransportError::TooLarge {
        len: packet.len(),
        max: MAX_PACKET_SIZE,
    })?;
    Ok((bytes, endpoint))
}

impl Transport for MemoryTransport {
    fn is_open(&self) -> bool {
        self.open
    }

    fn send(&mut self, packet: &[u8], endpoint: EndpointId) -> TransportResult<()> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        let datagram = to_datagram(packet, endpoint)?;
        self.outbound
            .push_back(datagram)
            .map_err(|_| TransportError::WouldBlock)
    }

    fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)> {
        if !self.open {
            return None;
        }
        let (bytes, endpoint) = self.inbound.pop_front()?;
        let len = bytes.len().min(buf.len());
        buf[..len].copy_from_slice(&bytes[..len]);
        Some((len, endpoint))
    }
}
