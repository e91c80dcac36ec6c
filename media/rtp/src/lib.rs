//! RTP wire types shared by the receive side of a media session.

mod ntp_timestamp;
mod rtp_packet;

pub use ntp_timestamp::NtpTimestamp;
pub use rtp_packet::RtpPacket;

pub use rtcp_types;
pub use rtp_types;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ssrc(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SequenceNumber(pub u16);

/// Sequence number extended to 32 bits to remove the ambiguity of the 16 bit wire counter
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExtendedSequenceNumber(pub u32);

impl ExtendedSequenceNumber {
    pub fn rollover_count(&self) -> u32 {
        self.0 >> 16
    }

    pub fn truncated(&self) -> SequenceNumber {
        SequenceNumber((self.0 & u32::from(u16::MAX)) as u16)
    }

    /// Guess the extended version of `seq`, using `self` as the highest sequence number seen so far.
    ///
    /// Three candidates are considered: `seq` placed in the same, the next and the previous rollover
    /// cycle as `self`. The candidate closest to `self` wins. Ties resolve towards the previous cycle,
    /// then the next cycle.
    pub fn guess_extended(&self, seq: SequenceNumber) -> ExtendedSequenceNumber {
        let highest = self.0;
        let seq = u32::from(seq.0);

        let same = seq | (highest & 0xFFFF_0000);
        // (highest & 0xFFFF0000) + 0x10000 without overflowing
        let next = seq | (((highest >> 16) + 1) << 16);
        // (highest & 0xFFFF0000) - 0x10000 without underflowing
        let prev = seq | ((((highest >> 16) | 0x1_0000) - 1) << 16);

        let diff_same = same.abs_diff(highest);
        let diff_next = next.abs_diff(highest);
        let diff_prev = prev.abs_diff(highest);

        let extended = if diff_same < diff_next {
            if diff_same < diff_prev { same } else { prev }
        } else if diff_next < diff_prev {
            next
        } else {
            prev
        };

        ExtendedSequenceNumber(extended)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RtpTimestamp(pub u32);
