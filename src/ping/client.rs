//! Ping client: probe/timeout state machine.

use std::fmt;

use log::{debug, warn};

use crate::core::{elapsed_since, Clock, ConfigError, Millis};
use crate::face::{Face, PacketHandler};
use crate::packet::{Component, Data, Interest, Nack, SequenceBuf};
use crate::transport::{EndpointId, Transport};

use super::{EventCallback, PingConfig, PingEvent, PingStats};

/// Reachability probe client.
///
/// The client rewrites the trailing sequence number component of a
/// caller-owned Interest before each probe. It is driven by calling
/// [`tick`](Self::tick) and by registering it with the [`Face`] that
/// carries its probes, which delivers responses through [`PacketHandler`].
///
/// ```text
///            tick: interval elapsed / probe()
///        ┌────────────────────────────────────┐
///        ▼                                    │
///   ┌─────────┐  Data / Nack / timeout   ┌────┴────┐
///   │ PENDING │ ───────────────────────► │  IDLE   │
///   └─────────┘                          └─────────┘
/// ```
///
/// Only one probe is outstanding at a time. Sending a probe abandons the
/// previous one: late answers to it no longer match the template name and
/// are ignored.
pub struct PingClient<'a, C: Clock> {
    interest: &'a mut Interest,
    clock: C,
    interval_ms: u32,
    timeout_ms: u32,
    seq_buf: SequenceBuf,
    seq: u64,
    last_probe: Option<Millis>,
    is_pending: bool,
    last_rtt: Option<u32>,
    stats: PingStats,
    callback: Option<EventCallback<'a>>,
}

impl<C: Clock> fmt::Debug for PingClient<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PingClient")
            .field("name", &format_args!("{}", self.interest.name()))
            .field("interval_ms", &self.interval_ms)
            .field("timeout_ms", &self.timeout_ms)
            .field("seq", &self.seq)
            .field("is_pending", &self.is_pending)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<'a, C: Clock> PingClient<'a, C> {
    /// Create a client probing with `interest`.
    ///
    /// If the name already ends in a sequence number component, probing
    /// continues from that number. Otherwise a component holding a random
    /// starting number is appended, which fails with
    /// [`ConfigError::NameCapacity`] when the name is full.
    pub fn new(interest: &'a mut Interest, clock: C, config: PingConfig) -> Result<Self, ConfigError> {
        let timeout_ms = config.validate(interest.lifetime_ms())?;

        let name = interest.name_mut();
        let existing = name.last().and_then(|c| c.to_sequence_number().ok());
        let seq = match existing {
            Some(seq) => seq,
            None => {
                let seq = rand::random();
                let component =
                    Component::from_sequence_number(seq).map_err(|_| ConfigError::NameCapacity)?;
                name.push(component).map_err(|_| ConfigError::NameCapacity)?;
                seq
            }
        };

        Ok(Self {
            interest,
            clock,
            interval_ms: config.interval_ms,
            timeout_ms,
            seq_buf: SequenceBuf::default(),
            seq,
            last_probe: None,
            is_pending: false,
            last_rtt: None,
            stats: PingStats::default(),
            callback: None,
        })
    }

    /// Set the event callback, replacing any previous one.
    pub fn on_event<F>(&mut self, callback: F)
    where
        F: FnMut(PingEvent, u64) + 'a,
    {
        self.callback = Some(Box::new(callback));
    }

    /// Advance the state machine.
    ///
    /// Reports a timeout for the pending probe first, then sends a new probe
    /// when the interval has elapsed (or no probe was sent yet).
    pub fn tick<T: Transport>(&mut self, face: &mut Face<'_, T>) {
        let now = self.clock.now_millis();

        if let Some(last) = self.last_probe {
            if self.is_pending && elapsed_since(now, last) >= self.timeout_ms {
                self.is_pending = false;
                self.stats.record_timeout();
                self.emit(PingEvent::Timeout);
            }
        }

        let due = self
            .last_probe
            .is_none_or(|last| elapsed_since(now, last) >= self.interval_ms);
        if due {
            self.send_probe(face, now);
        }
    }

    /// Send a probe now, abandoning any pending one.
    pub fn probe<T: Transport>(&mut self, face: &mut Face<'_, T>) {
        let now = self.clock.now_millis();
        self.send_probe(face, now);
    }

    fn send_probe<T: Transport>(&mut self, face: &mut Face<'_, T>, now: Millis) {
        let next = self.seq.wrapping_add(1);
        let Some(component) = self.interest.name_mut().last_mut() else {
            warn!("ping template has no sequence component");
            return;
        };
        if let Err(e) = component.set_sequence_number(next, &mut self.seq_buf) {
            warn!("ping {} seq {next} not encoded: {e}", self.interest.name());
            return;
        }
        self.seq = next;

        self.last_probe = Some(now);
        self.is_pending = true;
        self.stats.record_sent();

        // The probe still counts; a lost send surfaces as a timeout.
        if let Err(e) = face.send_interest(&*self.interest) {
            warn!("ping {} seq {} not sent: {e}", self.interest.name(), self.seq);
        }
        self.emit(PingEvent::Probe);
    }

    fn emit(&mut self, event: PingEvent) {
        debug!("ping {} seq {}: {event}", self.interest.name(), self.seq);
        if let Some(callback) = self.callback.as_mut() {
            callback(event, self.seq);
        }
    }

    /// Sequence number of the most recent probe.
    pub fn sequence(&self) -> u64 {
        self.seq
    }

    /// Whether a probe awaits a response, nack or timeout.
    pub fn is_pending(&self) -> bool {
        self.is_pending
    }

    /// Round-trip time of the most recent response.
    pub fn last_rtt(&self) -> Option<u32> {
        self.last_rtt
    }

    /// Counters since construction.
    pub fn stats(&self) -> &PingStats {
        &self.stats
    }

    /// Probe template as last sent.
    pub fn interest(&self) -> &Interest {
        &*self.interest
    }

    /// Interval between probes.
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Effective probe timeout.
    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Responses are delivered by the face; this call does nothing.
    #[deprecated(note = "register the client with its Face instead")]
    pub fn process_data_legacy(&mut self, _data: &Data) -> bool {
        false
    }

    /// Nacks are delivered by the face; this call does nothing.
    #[deprecated(note = "register the client with its Face instead")]
    pub fn process_nack_legacy(&mut self, _nack: &Nack, _interest: &Interest) -> bool {
        false
    }
}

impl<C: Clock> PacketHandler for PingClient<'_, C> {
    fn process_data(&mut self, data: &Data, _endpoint: EndpointId) -> bool {
        if !self.is_pending || !self.interest.name().is_prefix_of(data.name()) {
            return false;
        }
        let rtt = self
            .last_probe
            .map_or(0, |last| elapsed_since(self.clock.now_millis(), last));
        self.is_pending = false;
        self.last_rtt = Some(rtt);
        self.stats.record_response(rtt);
        self.emit(PingEvent::Response);
        true
    }

    fn process_nack(&mut self, nack: &Nack, _endpoint: EndpointId) -> bool {
        if !self.is_pending {
            return false;
        }
        if let Some(rejected) = nack.interest() {
            if rejected.name() != self.interest.name() {
                return false;
            }
        }
        debug!("ping {} seq {} nack reason {:?}", self.interest.name(), self.seq, nack.reason());
        self.is_pending = false;
        self.stats.record_nack();
        self.emit(PingEvent::Nack);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::constants::{MAX_NAME_COMPONENTS, MAX_PACKET_SIZE};
    use crate::core::ManualClock;
    use crate::packet::{NackReason, Name, Packet, TlvWriter};
    use crate::transport::MemoryTransport;

    type EventLog = Rc<RefCell<Vec<(PingEvent, u64)>>>;

    const START: u64 = 41;

    fn template(seq: Option<u64>) -> Interest {
        let mut name = Name::from_uri("/ndn/edu/arizona/ping").unwrap();
        if let Some(seq) = seq {
            name.push(Component::from_sequence_number(seq).unwrap()).unwrap();
        }
        Interest::new(name).with_must_be_fresh(true)
    }

    fn record<C: Clock>(client: &mut PingClient<'_, C>) -> EventLog {
        let log = EventLog::default();
        let sink = Rc::clone(&log);
        client.on_event(move |event, seq| sink.borrow_mut().push((event, seq)));
        log
    }

    fn fast() -> PingConfig {
        PingConfig::new(1000).with_timeout(500)
    }

    fn data_for_seq(prefix: &Interest, seq: u64) -> Data {
        let mut name = prefix.name().clone();
        if let Some(last) = name.last_mut() {
            *last = Component::from_sequence_number(seq).unwrap();
        }
        Data::new(name)
    }

    fn face() -> Face<'static, MemoryTransport> {
        Face::new(MemoryTransport::opened())
    }

    fn drain(face: &mut Face<'_, MemoryTransport>) {
        while face.transport_mut().take_sent().is_some() {}
    }

    #[test]
    fn test_interval_and_timeout_ordering() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        for t in (0..1000).step_by(10) {
            clock.set(t);
            client.tick(&mut face);
            drain(&mut face);
        }
        assert_eq!(
            *log.borrow(),
            vec![(PingEvent::Probe, START + 1), (PingEvent::Timeout, START + 1)]
        );

        clock.set(1000);
        client.tick(&mut face);
        assert_eq!(log.borrow().last(), Some(&(PingEvent::Probe, START + 2)));
        assert_eq!(client.stats().sent, 2);
        assert_eq!(client.stats().timed_out, 1);
    }

    #[test]
    fn test_timeout_fires_exactly_at_deadline() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        clock.set(499);
        client.tick(&mut face);
        assert!(client.is_pending());
        clock.set(500);
        client.tick(&mut face);
        assert!(!client.is_pending());
        client.tick(&mut face);
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_survives_clock_wraparound() {
        let clock = ManualClock::new(Millis::MAX - 200);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        for _ in 0..99 {
            clock.advance(10);
            client.tick(&mut face);
            drain(&mut face);
        }
        assert_eq!(
            *log.borrow(),
            vec![(PingEvent::Probe, START + 1), (PingEvent::Timeout, START + 1)]
        );

        clock.advance(10);
        client.tick(&mut face);
        assert_eq!(log.borrow().last(), Some(&(PingEvent::Probe, START + 2)));
    }

    #[test]
    fn test_forced_probe_abandons_previous() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.probe(&mut face);
        let stale = data_for_seq(client.interest(), START + 1);
        clock.set(100);
        client.probe(&mut face);

        assert!(!client.process_data(&stale, 0));
        for t in (100..=900).step_by(50) {
            clock.set(t);
            client.tick(&mut face);
        }

        let events = log.borrow();
        assert!(
            events
                .iter()
                .filter(|(_, seq)| *seq == START + 1)
                .all(|(event, _)| *event == PingEvent::Probe)
        );
        assert!(events.contains(&(PingEvent::Timeout, START + 2)));
        assert_eq!(client.sequence(), START + 2);
    }

    #[test]
    fn test_mismatched_response_ignored() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        let older = data_for_seq(client.interest(), START);
        assert!(!client.process_data(&older, 0));
        let unrelated = Data::new(Name::from_uri("/other/ping").unwrap());
        assert!(!client.process_data(&unrelated, 0));

        assert!(client.is_pending());
        assert_eq!(client.sequence(), START + 1);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_response_resolves_pending() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        clock.set(40);
        let reply = data_for_seq(client.interest(), START + 1);
        assert!(client.process_data(&reply, 0));
        assert!(!client.is_pending());
        assert_eq!(client.last_rtt(), Some(40));

        // A duplicate answer is not consumed.
        assert!(!client.process_data(&reply, 0));
        assert_eq!(log.borrow().last(), Some(&(PingEvent::Response, START + 1)));
        assert_eq!(client.stats().received, 1);
    }

    #[test]
    fn test_nack_clears_pending_then_next_probe() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        let nack = Nack::new(NackReason::NoRoute, client.interest().clone());
        clock.set(20);
        assert!(client.process_nack(&nack, 0));
        assert!(!client.is_pending());
        assert!(!client.process_nack(&nack, 0));

        clock.set(999);
        client.tick(&mut face);
        clock.set(1000);
        client.tick(&mut face);

        assert_eq!(
            *log.borrow(),
            vec![
                (PingEvent::Probe, START + 1),
                (PingEvent::Nack, START + 1),
                (PingEvent::Probe, START + 2),
            ]
        );
    }

    #[test]
    fn test_nack_for_other_interest_ignored() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();

        client.tick(&mut face);
        let other = Interest::new(Name::from_uri("/other").unwrap());
        assert!(!client.process_nack(&Nack::new(NackReason::Congestion, other), 0));
        assert!(client.is_pending());

        assert!(client.process_nack(&Nack::without_interest(NackReason::Congestion), 0));
        assert_eq!(client.stats().nacked, 1);
    }

    #[test]
    fn test_rejects_timeout_not_below_interval() {
        let mut interest = template(Some(START));
        let clock = ManualClock::new(0);
        assert!(matches!(
            PingClient::new(&mut interest, &clock, PingConfig::new(1000).with_timeout(1000)),
            Err(ConfigError::TimeoutNotBelowInterval { .. })
        ));
        // Default timeout is the 4000 ms InterestLifetime.
        assert!(PingClient::new(&mut interest, &clock, PingConfig::new(4000)).is_err());
        let client = PingClient::new(&mut interest, &clock, PingConfig::new(4001)).unwrap();
        assert_eq!(client.timeout_ms(), 4000);
    }

    #[test]
    fn test_rejects_full_name() {
        let mut name = Name::new();
        for _ in 0..MAX_NAME_COMPONENTS {
            name.push(Component::generic(b"x").unwrap()).unwrap();
        }
        let mut interest = Interest::new(name);
        let clock = ManualClock::new(0);
        assert!(matches!(
            PingClient::new(&mut interest, &clock, fast()),
            Err(ConfigError::NameCapacity)
        ));
    }

    #[test]
    fn test_appends_sequence_component() {
        let mut interest = template(None);
        let prefix_len = interest.name().len();
        let clock = ManualClock::new(0);
        let client = PingClient::new(&mut interest, &clock, fast()).unwrap();

        let name = client.interest().name();
        assert_eq!(name.len(), prefix_len + 1);
        assert_eq!(
            name.last().unwrap().to_sequence_number(),
            Ok(client.sequence())
        );
    }

    #[test]
    fn test_callback_replacement() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();

        let first = record(&mut client);
        let second = record(&mut client);
        client.tick(&mut face);

        assert!(first.borrow().is_empty());
        assert_eq!(*second.borrow(), vec![(PingEvent::Probe, START + 1)]);
    }

    #[test]
    #[allow(deprecated)]
    fn test_legacy_entry_points_are_inert() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face = face();
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        let reply = data_for_seq(client.interest(), START + 1);
        let probe = client.interest().clone();
        assert!(!client.process_data_legacy(&reply));
        assert!(!client.process_nack_legacy(&Nack::new(NackReason::NoRoute, probe.clone()), &probe));

        assert!(client.is_pending());
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_send_failure_still_counts_probe() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let mut face: Face<'_, MemoryTransport> = Face::new(MemoryTransport::new());
        let mut client = PingClient::new(&mut interest, &clock, fast()).unwrap();
        let log = record(&mut client);

        client.tick(&mut face);
        clock.set(500);
        client.tick(&mut face);

        assert_eq!(
            *log.borrow(),
            vec![(PingEvent::Probe, START + 1), (PingEvent::Timeout, START + 1)]
        );
        assert_eq!(client.stats().sent, 1);
    }

    #[test]
    fn test_round_trip_through_face() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let client = RefCell::new(PingClient::new(&mut interest, &clock, fast()).unwrap());
        let log = record(&mut client.borrow_mut());
        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&client).unwrap();

        client.borrow_mut().tick(&mut face);
        let (sent, endpoint) = face.transport_mut().take_sent().unwrap();
        let Ok(Packet::Interest(probe)) = Packet::decode(&sent) else {
            panic!("probe is not an Interest");
        };
        assert!(probe.must_be_fresh());
        assert_eq!(probe.name().last().unwrap().to_sequence_number(), Ok(START + 1));

        let mut buf = [0u8; MAX_PACKET_SIZE];
        let mut w = TlvWriter::new(&mut buf);
        Data::new(probe.name().clone())
            .with_content(b"pong")
            .unwrap()
            .encode(&mut w)
            .unwrap();
        face.transport_mut().inject(w.written(), endpoint).unwrap();

        clock.set(25);
        assert_eq!(face.poll(), 1);
        assert_eq!(client.borrow().last_rtt(), Some(25));
        assert_eq!(log.borrow().last(), Some(&(PingEvent::Response, START + 1)));
    }

    #[test]
    fn test_forwarder_nack_through_face() {
        let clock = ManualClock::new(0);
        let mut interest = template(Some(START));
        let client = RefCell::new(PingClient::new(&mut interest, &clock, fast()).unwrap());
        let log = record(&mut client.borrow_mut());
        let mut face = Face::new(MemoryTransport::opened());
        face.add_handler(&client).unwrap();

        client.borrow_mut().tick(&mut face);
        let (probe, endpoint) = face.transport_mut().take_sent().unwrap();

        // LpPacket { Nack { NackReason NoRoute }, Fragment { probe } }, as a forwarder sends it.
        let header = hex::decode("fd032005fd0321019650").unwrap();
        assert!(header.len() + probe.len() + 1 < 253);
        let mut wire = vec![0x64, (header.len() + 1 + probe.len()) as u8];
        wire.extend_from_slice(&header);
        wire.push(probe.len() as u8);
        wire.extend_from_slice(&probe);
        face.transport_mut().inject(&wire, endpoint).unwrap();

        clock.set(30);
        assert_eq!(face.poll(), 1);
        assert!(!client.borrow().is_pending());
        assert_eq!(client.borrow().stats().nacked, 1);
        assert_eq!(
            *log.borrow(),
            vec![(PingEvent::Probe, START + 1), (PingEvent::Nack, START + 1)]
        );
    }
}
