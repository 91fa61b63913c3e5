//! Non-blocking UDP transport.
//!
//! Binding goes through tokio; the bound socket is then taken out of the
//! reactor and kept in OS non-blocking mode, so `send` and `receive` work
//! from a plain poll loop with no runtime driving them.
//!
//! Endpoint ids: [`DEFAULT_ENDPOINT`] is the configured remote (usually the
//! forwarder); any other peer that sends a datagram is assigned the next id
//! from a fixed-size peer table.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use heapless::Vec as HVec;
use log::{debug, trace, warn};

use super::{EndpointId, Transport, TransportError, TransportResult, DEFAULT_ENDPOINT};

/// Peers other than the default remote that can hold an endpoint id.
pub const MAX_UDP_PEERS: usize = 8;

/// UDP transport.
#[derive(Debug, Default)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
    remote: Option<SocketAddr>,
    peers: HVec<SocketAddr, MAX_UDP_PEERS>,
}

impl UdpTransport {
    /// Create an unopened transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an open transport from an already bound socket.
    ///
    /// The socket is switched to non-blocking mode.
    pub fn from_socket(socket: UdpSocket, remote: SocketAddr) -> TransportResult<Self> {
        socket.set_nonblocking(true)?;
        Ok(Self {
            socket: Some(socket),
            remote: Some(remote),
            peers: HVec::new(),
        })
    }

    /// Bind to `local` and use `remote` as the default endpoint.
    ///
    /// Must run inside a tokio runtime. On failure the transport is left
    /// unopened.
    pub async fn begin(&mut self, local: SocketAddr, remote: SocketAddr) -> TransportResult<()> {
        self.socket = None;
        self.peers.clear();
        let socket = tokio::net::UdpSocket::bind(local).await?.into_std()?;
        socket.set_nonblocking(true)?;
        debug!("UDP transport bound to {:?}, remote {remote}", socket.local_addr());
        self.socket = Some(socket);
        self.remote = Some(remote);
        Ok(())
    }

    /// Local socket address.
    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;
        Ok(socket.local_addr()?)
    }

    /// Address behind an endpoint id.
    pub fn peer_addr(&self, endpoint: EndpointId) -> Option<SocketAddr> {
        if endpoint == DEFAULT_ENDPOINT {
            return self.remote;
        }
        let index = usize::try_from(endpoint - 1).ok()?;
        self.peers.get(index).copied()
    }

    fn endpoint_for(&mut self, addr: SocketAddr) -> Option<EndpointId> {
        if self.remote == Some(addr) {
            return Some(DEFAULT_ENDPOINT);
        }
        let index = match self.peers.iter().position(|p| *p == addr) {
            Some(index) => index,
            None => {
                self.peers.push(addr).ok()?;
                self.peers.len() - 1
            }
        };
        Some(index as EndpointId + 1)
    }
}

impl Transport for UdpTransport {
    fn is_open(&self) -> bool {
        self.socket.is_some()
    }

    fn send(&mut self, packet: &[u8], endpoint: EndpointId) -> TransportResult<()> {
        let socket = self.socket.as_ref().ok_or(TransportError::NotOpen)?;
        let addr = self
            .peer_addr(endpoint)
            .ok_or(TransportError::UnknownEndpoint(endpoint))?;
        match socket.send_to(packet, addr) {
            Ok(_) => Ok(()),
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Err(TransportError::WouldBlock),
            Err(e) => Err(e.into()),
        }
    }

    fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)> {
        loop {
            let socket = self.socket.as_ref()?;
            let (len, from) = match socket.recv_from(buf) {
                Ok(received) => received,
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return None,
                Err(e) => {
                    warn!("UDP receive error: {e}");
                    return None;
                }
            };
            match self.endpoint_for(from) {
                Some(endpoint) => {
                    trace!("UDP {len} bytes from {from} (endpoint {endpoint})");
                    return Some((len, endpoint));
                }
                None => debug!("UDP peer table full, dropping datagram from {from}"),
            }
        }
    }
}
