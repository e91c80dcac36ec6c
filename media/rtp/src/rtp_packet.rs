use crate::{RtpTimestamp, SequenceNumber, Ssrc};
use bytes::Bytes;

/// Received RTP packet, header fields plus the payload
#[derive(Debug, Clone)]
pub struct RtpPacket {
    pub pt: u8,
    pub sequence_number: SequenceNumber,
    pub ssrc: Ssrc,
    pub timestamp: RtpTimestamp,
    pub marker: bool,
    pub payload: Bytes,
}

impl RtpPacket {
    /// Parse a RTP packet from a received datagram
    ///
    /// The payload references the given bytes, no copy is made.
    pub fn parse(bytes: impl Into<Bytes>) -> Result<Self, rtp_types::RtpParseError> {
        let packet: Bytes = bytes.into();

        let parsed = rtp_types::RtpPacket::parse(&packet[..])?;

        Ok(RtpPacket {
            pt: parsed.payload_type(),
            sequence_number: SequenceNumber(parsed.sequence_number()),
            ssrc: Ssrc(parsed.ssrc()),
            timestamp: RtpTimestamp(parsed.timestamp()),
            marker: parsed.marker_bit(),
            payload: packet.slice_ref(parsed.payload()),
        })
    }
}
