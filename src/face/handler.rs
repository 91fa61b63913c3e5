//! Packet handler capability.

use crate::packet::{Data, Interest, Nack};
use crate::transport::EndpointId;

/// Consumer of packets dispatched by a [`Face`](super::Face).
///
/// Each method returns `true` when the handler consumed the packet, which
/// stops dispatch to later handlers. The defaults decline every packet, so
/// implementors override only the kinds they care about.
pub trait PacketHandler {
    /// Offer an incoming Interest.
    fn process_interest(&mut self, interest: &Interest, endpoint: EndpointId) -> bool {
        let _ = (interest, endpoint);
        false
    }

    /// Offer an incoming Data.
    fn process_data(&mut self, data: &Data, endpoint: EndpointId) -> bool {
        let _ = (data, endpoint);
        false
    }

    /// Offer an incoming Nack.
    fn process_nack(&mut self, nack: &Nack, endpoint: EndpointId) -> bool {
        let _ = (nack, endpoint);
        false
    }
}
