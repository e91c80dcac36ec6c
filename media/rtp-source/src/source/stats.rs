use rtp::{ExtendedSequenceNumber, NtpTimestamp, RtpTimestamp, SequenceNumber};
use std::time::Instant;

/// Clock rate assumed for all handled payload formats
pub(crate) const CLOCK_RATE: u32 = 90_000;

/// Anchors captured from the first packet received from a source
///
/// Assemblers use these to map RTP timestamps to local time.
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    pub first_sequence_number: ExtendedSequenceNumber,
    pub first_rtp_time: RtpTimestamp,
    pub first_sys_time: Instant,
    pub clock_rate: u32,
}

/// Statistics about the received RTP stream
#[derive(Debug, Clone, Copy)]
pub struct RtpSourceStats {
    /// Packets received, including duplicates and minus abandoned packets
    pub packets_received: i64,

    /// Packets expected from the sequence number range received so far
    pub packets_expected: u32,

    /// `packets_expected - packets_received`, negative if duplicates were received
    pub packets_lost: i64,

    /// Highest extended sequence number received
    pub highest_sequence_number: Option<ExtendedSequenceNumber>,

    /// Packets waiting in the reorder queue
    pub queued: usize,
}

/// Loss figures of the interval since the previous receiver report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LossInterval {
    pub(crate) expected: i64,
    pub(crate) lost: i64,
    pub(crate) fraction_lost: u8,
    pub(crate) cumulative_lost: i32,
}

/// Reception counters following RFC 3550 appendix A.3
#[derive(Debug)]
pub(crate) struct ReceptionStats {
    pub(crate) time_base: Option<TimeBase>,

    pub(crate) base: ExtendedSequenceNumber,
    pub(crate) highest: ExtendedSequenceNumber,

    pub(crate) received: i64,
    prev_received: i64,
    prev_expected: i64,

    /// Last absolute time reference and when it was received
    pub(crate) last_time_reference: Option<(NtpTimestamp, Instant)>,
}

impl ReceptionStats {
    pub(crate) fn new() -> Self {
        ReceptionStats {
            time_base: None,
            base: ExtendedSequenceNumber(0),
            highest: ExtendedSequenceNumber(0),
            received: 0,
            prev_received: 0,
            prev_expected: 0,
            last_time_reference: None,
        }
    }

    /// Initialize the counters from the very first packet
    pub(crate) fn start(
        &mut self,
        now: Instant,
        sequence_number: SequenceNumber,
        rtp_time: RtpTimestamp,
    ) -> ExtendedSequenceNumber {
        let sequence_number = ExtendedSequenceNumber(sequence_number.0.into());

        self.base = sequence_number;
        self.highest = sequence_number;
        self.time_base = Some(TimeBase {
            first_sequence_number: sequence_number,
            first_rtp_time: rtp_time,
            first_sys_time: now,
            clock_rate: CLOCK_RATE,
        });

        sequence_number
    }

    /// Extend the given sequence number, advancing the highest sequence number if required
    pub(crate) fn extend(&mut self, sequence_number: SequenceNumber) -> ExtendedSequenceNumber {
        let extended = self.highest.guess_extended(sequence_number);

        if extended > self.highest {
            self.highest = extended;
        }

        extended
    }

    pub(crate) fn expected(&self) -> u32 {
        if self.time_base.is_none() {
            return 0;
        }

        self.highest.0.wrapping_sub(self.base.0).wrapping_add(1)
    }

    /// Packets were received since the last report
    pub(crate) fn is_due(&self) -> bool {
        self.received - self.prev_received > 0
    }

    /// Compute the loss since the last call and start a new interval
    pub(crate) fn next_interval(&mut self) -> LossInterval {
        let expected = i64::from(self.expected());

        let interval_expected = expected - self.prev_expected;
        let interval_received = self.received - self.prev_received;
        let interval_lost = interval_expected - interval_received;

        let fraction_lost = if interval_expected > 0 && interval_lost > 0 {
            ((interval_lost << 8) / interval_expected) as u8
        } else {
            0
        };

        self.prev_expected = expected;
        self.prev_received = self.received;

        LossInterval {
            expected: interval_expected,
            lost: interval_lost,
            fraction_lost,
            cumulative_lost: expected.wrapping_sub(self.received) as i32,
        }
    }
}
