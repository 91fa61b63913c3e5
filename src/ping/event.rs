//! Ping client events.

use std::fmt;

/// State transition reported to the event callback, with the sequence
/// number it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PingEvent {
    /// A probe was sent.
    Probe,
    /// The pending probe was answered.
    Response,
    /// The pending probe expired unanswered.
    Timeout,
    /// The pending probe was rejected.
    Nack,
}

impl fmt::Display for PingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PingEvent::Probe => "probe",
            PingEvent::Response => "response",
            PingEvent::Timeout => "timeout",
            PingEvent::Nack => "nack",
        })
    }
}

/// Callback receiving every [`PingEvent`] and its sequence number.
pub type EventCallback<'a> = Box<dyn FnMut(PingEvent, u64) + 'a>;
