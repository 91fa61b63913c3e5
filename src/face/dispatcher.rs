//! Face: transport owner and packet dispatcher.

use std::cell::RefCell;
use std::fmt;
use std::ptr;

use heapless::Vec as HVec;
use log::{debug, trace};

use crate::core::constants::{MAX_HANDLERS, MAX_PACKETS_PER_POLL, MAX_PACKET_SIZE};
use crate::core::EncodeError;
use crate::packet::{Data, Interest, Nack, Packet, TlvWriter};
use crate::transport::{EndpointId, Transport, DEFAULT_ENDPOINT};

use super::{FaceError, PacketHandler};

type HandlerRef<'h> = &'h RefCell<dyn PacketHandler + 'h>;

/// Owns one [`Transport`] and routes decoded packets to handlers.
///
/// Handlers are borrowed for the lifetime `'h` and offered each packet in
/// registration order. Receive and transmit buffers are fixed arrays inside
/// the face.
pub struct Face<'h, T: Transport> {
    transport: T,
    handlers: HVec<HandlerRef<'h>, MAX_HANDLERS>,
    default_endpoint: EndpointId,
    rx: [u8; MAX_PACKET_SIZE],
    tx: [u8; MAX_PACKET_SIZE],
}

impl<T: Transport + fmt::Debug> fmt::Debug for Face<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Face")
            .field("transport", &self.transport)
            .field("handlers", &self.handlers.len())
            .field("default_endpoint", &self.default_endpoint)
            .finish()
    }
}

impl<'h, T: Transport> Face<'h, T> {
    /// Create a face over `transport` with no handlers.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            handlers: HVec::new(),
            default_endpoint: DEFAULT_ENDPOINT,
            rx: [0; MAX_PACKET_SIZE],
            tx: [0; MAX_PACKET_SIZE],
        }
    }

    /// Register a handler after all existing ones.
    pub fn add_handler<H: PacketHandler + 'h>(
        &mut self,
        handler: &'h RefCell<H>,
    ) -> Result<(), FaceError> {
        self.handlers
            .push(handler)
            .map_err(|_| FaceError::TooManyHandlers)
    }

    /// Unregister a handler, returning whether it was registered.
    pub fn remove_handler<H: ?Sized>(&mut self, handler: &RefCell<H>) -> bool {
        match self.handlers.iter().position(|h| ptr::addr_eq(*h, handler)) {
            Some(index) => {
                self.handlers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered handlers.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Endpoint used by `send_*` without an explicit endpoint.
    pub fn default_endpoint(&self) -> EndpointId {
        self.default_endpoint
    }

    /// Change the endpoint used by `send_*`.
    pub fn set_default_endpoint(&mut self, endpoint: EndpointId) {
        self.default_endpoint = endpoint;
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport, e.g. to `begin` it.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Consume the face, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Receive and dispatch available packets.
    ///
    /// Processes at most [`MAX_PACKETS_PER_POLL`] datagrams and returns how
    /// many were taken from the transport. Malformed and unhandled packets
    /// are dropped.
    pub fn poll(&mut self) -> usize {
        let mut count = 0;
        while count < MAX_PACKETS_PER_POLL {
            let Some((len, endpoint)) = self.transport.receive(&mut self.rx) else {
                break;
            };
            count += 1;
            trace!("face received {len} bytes from endpoint {endpoint}");
            if len > self.rx.len() {
                debug!("transport reported {len} bytes past the receive buffer, dropping");
                continue;
            }

            match Packet::decode(&self.rx[..len]) {
                Ok(packet) => {
                    if !self.dispatch(&packet, endpoint) {
                        debug!("no handler for {} from endpoint {endpoint}", kind(&packet));
                    }
                }
                Err(e) => debug!("dropping malformed packet from endpoint {endpoint}: {e}"),
            }
        }
        count
    }

    fn dispatch(&self, packet: &Packet, endpoint: EndpointId) -> bool {
        for handler in &self.handlers {
            // Already borrowed: the handler is the one driving this poll.
            let Ok(mut h) = handler.try_borrow_mut() else {
                continue;
            };
            let handled = match packet {
                Packet::Interest(interest) => h.process_interest(interest, endpoint),
                Packet::Data(data) => h.process_data(data, endpoint),
                Packet::Nack(nack) => h.process_nack(nack, endpoint),
            };
            if handled {
                return true;
            }
        }
        false
    }

    /// Send an Interest to the default endpoint.
    pub fn send_interest(&mut self, interest: &Interest) -> Result<(), FaceError> {
        self.send_interest_to(interest, self.default_endpoint)
    }

    /// Send an Interest to `endpoint`.
    pub fn send_interest_to(
        &mut self,
        interest: &Interest,
        endpoint: EndpointId,
    ) -> Result<(), FaceError> {
        self.send_encoded(endpoint, |w| interest.encode(w))
    }

    /// Send a Data to the default endpoint.
    pub fn send_data(&mut self, data: &Data) -> Result<(), FaceError> {
        self.send_data_to(data, self.default_endpoint)
    }

    /// Send a Data to `endpoint`, typically the one its Interest came from.
    pub fn send_data_to(&mut self, data: &Data, endpoint: EndpointId) -> Result<(), FaceError> {
        self.send_encoded(endpoint, |w| data.encode(w))
    }

    /// Send a Nack to the default endpoint.
    pub fn send_nack(&mut self, nack: &Nack) -> Result<(), FaceError> {
        self.send_nack_to(nack, self.default_endpoint)
    }

    /// Send a Nack to `endpoint`.
    pub fn send_nack_to(&mut self, nack: &Nack, endpoint: EndpointId) -> Result<(), FaceError> {
        self.send_encoded(endpoint, |w| nack.encode(w))
    }

    fn send_encoded(
        &mut self,
        endpoint: EndpointId,
        encode: impl FnOnce(&mut TlvWriter<'_>) -> Result<(), EncodeError>,
    ) -> Result<(), FaceError> {
        let mut w = TlvWriter::new(&mut self.tx);
        encode(&mut w)?;
        let len = w.len();
        trace!("face sending {len} bytes to endpoint {endpoint}");
        self.transport.send(&self.tx[..len], endpoint)?;
        Ok(())
    }
}

fn kind(packet: &Packet) -> &'static str {
    match packet {
        Packet::Interest(_) => "Interest",
        Packet::Data(_) => "Data",
        Packet::Nack(_) => "Nack",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::{Name, NackReason};
    use crate::transport::{MemoryTransport, TransportError};

    /// Records what it sees; consumes only the kinds it is told to.
    #[derive(Default)]
    struct Recorder {
        consume_data: bool,
        consume_interest: bool,
        seen: Vec<(&'static str, EndpointId)>,
    }

    impl PacketHandler for Recorder {
        fn process_interest(&mut self, _interest: &Interest, endpoint: EndpointId) -> bool {
            self.seen.push(("interest", endpoint));
            self.consume_interest
        }

        fn process_data(&mut self, _data: &Data, endpoint: EndpointId) -> bool {
            self.seen.push(("data", endpoint));
            self.consume_data
        }
    }

    fn wire(packet: &Packet) -> Vec<u8> {
        let mut buf = [0u8; MAX_PACKET_SIZE];
        let mut w = TlvWriter::new(&mut buf);
        packet.encode(&mut w).unwrap();
        w.written().to_vec()
    }

    fn data_wire(uri: &str) -> Vec<u8> {
        wire(&Packet::Data(Data::new(Name::from_uri(uri).unwrap())))
    }

    #[test]
    fn test_dispatch_stops_at_first_consumer() {
        let first = RefCell::new(Recorder::default());
        let second = RefCell::new(Recorder {
            consume_data: true,
            ..Default::default()
        });
        let third = RefCell::new(Recorder {
            consume_data: true,
            ..Default::default()
        });

        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&first).unwrap();
        face.add_handler(&second).unwrap();
        face.add_handler(&third).unwrap();

        face.transport_mut().inject(&data_wire("/a"), 3).unwrap();
        assert_eq!(face.poll(), 1);

        assert_eq!(first.borrow().seen, vec![("data", 3)]);
        assert_eq!(second.borrow().seen, vec![("data", 3)]);
        assert!(third.borrow().seen.is_empty());
    }

    #[test]
    fn test_unhandled_and_malformed_packets_dropped() {
        let h = RefCell::new(Recorder::default());
        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&h).unwrap();

        face.transport_mut().inject(&[0x06, 0x7f, 0x00], 0).unwrap();
        face.transport_mut().inject(&data_wire("/b"), 0).unwrap();
        face.transport_mut().inject(&[0xff], 0).unwrap();

        assert_eq!(face.poll(), 3);
        assert_eq!(h.borrow().seen, vec![("data", 0)]);
        assert_eq!(face.poll(), 0);
    }

    #[test]
    fn test_poll_without_handlers() {
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::opened());
        face.transport_mut().inject(&data_wire("/c"), 0).unwrap();
        assert_eq!(face.poll(), 1);
    }

    #[test]
    fn test_poll_on_closed_transport_returns_immediately() {
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::new());
        assert_eq!(face.poll(), 0);
    }

    #[test]
    fn test_handler_table_capacity() {
        let handlers: Vec<RefCell<Recorder>> = (0..=MAX_HANDLERS)
            .map(|_| RefCell::new(Recorder::default()))
            .collect();
        let mut face = Face::new(MemoryTransport::opened());
        for h in &handlers[..MAX_HANDLERS] {
            face.add_handler(h).unwrap();
        }
        assert!(matches!(
            face.add_handler(&handlers[MAX_HANDLERS]),
            Err(FaceError::TooManyHandlers)
        ));
        assert_eq!(face.handler_count(), MAX_HANDLERS);
    }

    #[test]
    fn test_remove_handler_by_identity() {
        let a = RefCell::new(Recorder {
            consume_interest: true,
            ..Default::default()
        });
        let b = RefCell::new(Recorder {
            consume_interest: true,
            ..Default::default()
        });
        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&a).unwrap();
        face.add_handler(&b).unwrap();

        assert!(face.remove_handler(&a));
        assert!(!face.remove_handler(&a));

        let interest = Interest::new(Name::from_uri("/i").unwrap()).with_nonce(1);
        face.transport_mut()
            .inject(&wire(&Packet::Interest(interest)), 5)
            .unwrap();
        face.poll();
        assert!(a.borrow().seen.is_empty());
        assert_eq!(b.borrow().seen, vec![("interest", 5)]);
    }

    #[test]
    fn test_borrowed_handler_is_skipped() {
        let busy = RefCell::new(Recorder::default());
        let other = RefCell::new(Recorder::default());
        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&busy).unwrap();
        face.add_handler(&other).unwrap();

        face.transport_mut().inject(&data_wire("/d"), 0).unwrap();
        let guard = busy.borrow_mut();
        face.poll();
        drop(guard);

        assert!(busy.borrow().seen.is_empty());
        assert_eq!(other.borrow().seen, vec![("data", 0)]);
    }

    #[test]
    fn test_poll_is_bounded() {
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::opened());
        for _ in 0..crate::transport::MEMORY_QUEUE_DEPTH {
            face.transport_mut().inject(&data_wire("/e"), 0).unwrap();
        }
        assert!(face.poll() <= MAX_PACKETS_PER_POLL);
    }

    #[test]
    fn test_send_variants() {
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::opened());
        let name = Name::from_uri("/ndn/ping").unwrap();
        let interest = Interest::new(name.clone()).with_nonce(7);

        face.send_interest(&interest).unwrap();
        face.set_default_endpoint(4);
        face.send_data(&Data::new(name)).unwrap();
        face.send_nack_to(&Nack::new(NackReason::NoRoute, interest.clone()), 9)
            .unwrap();

        let t = face.transport_mut();
        let (bytes, endpoint) = t.take_sent().unwrap();
        assert_eq!(endpoint, DEFAULT_ENDPOINT);
        assert_eq!(Packet::decode(&bytes).unwrap(), Packet::Interest(interest));

        let (bytes, endpoint) = t.take_sent().unwrap();
        assert_eq!(endpoint, 4);
        assert!(matches!(Packet::decode(&bytes).unwrap(), Packet::Data(_)));

        let (bytes, endpoint) = t.take_sent().unwrap();
        assert_eq!(endpoint, 9);
        assert!(matches!(Packet::decode(&bytes).unwrap(), Packet::Nack(n) if n.reason() == NackReason::NoRoute));
    }

    #[test]
    fn test_send_on_closed_transport() {
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::new());
        let interest = Interest::new(Name::from_uri("/x").unwrap());
        assert!(matches!(
            face.send_interest(&interest),
            Err(FaceError::Transport(TransportError::NotOpen))
        ));
    }

    /// Reports more bytes than fit in the receive buffer, then one real datagram.
    struct Overreporting {
        queued: Vec<Vec<u8>>,
    }

    impl Transport for Overreporting {
        fn is_open(&self) -> bool {
            true
        }

        fn send(&mut self, _packet: &[u8], _endpoint: EndpointId) -> crate::transport::TransportResult<()> {
            Ok(())
        }

        fn receive(&mut self, buf: &mut [u8]) -> Option<(usize, EndpointId)> {
            let packet = self.queued.pop()?;
            buf[..packet.len()].copy_from_slice(&packet);
            if self.queued.is_empty() {
                Some((packet.len(), 0))
            } else {
                Some((buf.len() + 1, 0))
            }
        }
    }

    #[test]
    fn test_overlong_length_from_transport_dropped() {
        let recorder = RefCell::new(Recorder::default());
        let mut face = Face::new(Overreporting {
            queued: vec![data_wire("/ok"), data_wire("/bad")],
        });
        face.add_handler(&recorder).unwrap();

        assert_eq!(face.poll(), 2);
        assert_eq!(recorder.borrow().seen, vec![("data", 0)]);
    }
}
