//! Probe counters and round-trip statistics.

/// Running totals over the client's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PingStats {
    /// Probes sent, including ones the transport refused.
    pub sent: u64,
    /// Probes answered with Data.
    pub received: u64,
    /// Probes that expired.
    pub timed_out: u64,
    /// Probes rejected with a Nack.
    pub nacked: u64,
    rtt_min: Option<u32>,
    rtt_max: u32,
    rtt_total: u64,
}

impl PingStats {
    pub(crate) fn record_sent(&mut self) {
        self.sent += 1;
    }

    pub(crate) fn record_response(&mut self, rtt_ms: u32) {
        self.received += 1;
        self.rtt_min = Some(self.rtt_min.map_or(rtt_ms, |m| m.min(rtt_ms)));
        self.rtt_max = self.rtt_max.max(rtt_ms);
        self.rtt_total += u64::from(rtt_ms);
    }

    pub(crate) fn record_timeout(&mut self) {
        self.timed_out += 1;
    }

    pub(crate) fn record_nack(&mut self) {
        self.nacked += 1;
    }

    /// Shortest round trip, in milliseconds.
    pub fn min_rtt(&self) -> Option<u32> {
        self.rtt_min
    }

    /// Longest round trip, in milliseconds.
    pub fn max_rtt(&self) -> Option<u32> {
        self.rtt_min.map(|_| self.rtt_max)
    }

    /// Mean round trip, in milliseconds.
    pub fn avg_rtt(&self) -> Option<u32> {
        if self.received == 0 {
            return None;
        }
        Some((self.rtt_total / self.received) as u32)
    }

    /// Percentage of resolved probes that got no Data.
    pub fn loss_percent(&self) -> Option<f64> {
        let resolved = self.received + self.timed_out + self.nacked;
        if resolved == 0 {
            return None;
        }
        Some((self.timed_out + self.nacked) as f64 * 100.0 / resolved as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = PingStats::default();
        assert_eq!(stats.min_rtt(), None);
        assert_eq!(stats.max_rtt(), None);
        assert_eq!(stats.avg_rtt(), None);
        assert_eq!(stats.loss_percent(), None);
    }

    #[test]
    fn test_rtt_aggregates() {
        let mut stats = PingStats::default();
        for rtt in [30, 10, 20] {
            stats.record_sent();
            stats.record_response(rtt);
        }
        assert_eq!(stats.min_rtt(), Some(10));
        assert_eq!(stats.max_rtt(), Some(30));
        assert_eq!(stats.avg_rtt(), Some(20));
    }

    #[test]
    fn test_loss_percent() {
        let mut stats = PingStats::default();
        stats.record_response(5);
        stats.record_timeout();
        stats.record_nack();
        stats.record_response(5);
        assert_eq!(stats.loss_percent(), Some(50.0));
    }
}
