//! Encoders for the RTCP packets a receiver sends back to a media sender
//!
//! Every function appends exactly one fixed-size packet to the given buffer. Callers must make sure
//! the buffer has enough room, see [`RECEIVER_REPORT_LEN`], [`FIR_LEN`] and [`TMMBR_LEN`].

use bytes::BufMut;
use rtp::{
    Ssrc,
    rtcp_types::{
        FciBuilder, FciFeedbackPacketType, Fir, PayloadFeedback, ReceiverReport,
        ReportBlockBuilder, RtcpPacketWriter, RtcpPacketWriterExt, RtcpWriteError,
        TransportFeedback,
    },
};

/// Size of a receiver report carrying a single report block
pub const RECEIVER_REPORT_LEN: usize = 32;
/// Size of a full intra request carrying a single FCI entry
pub const FIR_LEN: usize = 20;
/// Size of a TMMBR carrying a single FCI entry
pub const TMMBR_LEN: usize = 20;

const FMT_TMMBR: u8 = 3;

/// Per packet overhead announced in TMMBR requests
const TMMBR_OVERHEAD: u8 = 40;

fn write_packet(
    out: &mut impl BufMut,
    packet: &impl RtcpPacketWriter,
) -> Result<(), RtcpWriteError> {
    let mut buf = vec![0u8; packet.calculate_size()?];
    let len = packet.write_into(&mut buf)?;

    out.put_slice(&buf[..len]);

    Ok(())
}

/// Write a receiver report with a single report block
pub fn write_receiver_report(
    out: &mut impl BufMut,
    sender_ssrc: Ssrc,
    block: ReportBlockBuilder,
) -> Result<(), RtcpWriteError> {
    let rr = ReceiverReport::builder(sender_ssrc.0).add_report_block(block);

    write_packet(out, &rr)
}

/// Write a codec control message full intra request (RFC 5104 4.3.1)
///
/// The media source field of the feedback header is unused and left zero.
pub fn write_fir(
    out: &mut impl BufMut,
    sender_ssrc: Ssrc,
    media_ssrc: Ssrc,
    seq: u8,
) -> Result<(), RtcpWriteError> {
    let fir = PayloadFeedback::builder_owned(Fir::builder().add_ssrc(media_ssrc.0, seq))
        .sender_ssrc(sender_ssrc.0);

    write_packet(out, &fir)
}

/// Write a temporary maximum media stream bitrate request (RFC 5104 4.2.1)
pub fn write_tmmbr(
    out: &mut impl BufMut,
    sender_ssrc: Ssrc,
    media_ssrc: Ssrc,
    bitrate: MaxBitrate,
) -> Result<(), RtcpWriteError> {
    let tmmbr = TransportFeedback::builder_owned(TmmbrBuilder {
        ssrc: media_ssrc,
        bitrate,
    })
    .sender_ssrc(sender_ssrc.0);

    write_packet(out, &tmmbr)
}

/// FCI of a TMMBR with a single request entry
#[derive(Debug, Clone, Copy)]
struct TmmbrBuilder {
    ssrc: Ssrc,
    bitrate: MaxBitrate,
}

impl RtcpPacketWriter for TmmbrBuilder {
    fn calculate_size(&self) -> Result<usize, RtcpWriteError> {
        Ok(8)
    }

    fn write_into_unchecked(&self, buf: &mut [u8]) -> usize {
        buf[..4].copy_from_slice(&self.ssrc.0.to_be_bytes());
        buf[4..8].copy_from_slice(&self.bitrate.to_bytes());
        8
    }

    fn get_padding(&self) -> Option<u8> {
        None
    }
}

impl FciBuilder<'_> for TmmbrBuilder {
    fn format(&self) -> u8 {
        FMT_TMMBR
    }

    fn supports_feedback_type(&self) -> FciFeedbackPacketType {
        FciFeedbackPacketType::TRANSPORT
    }
}

/// Bitrate in the exponent/mantissa form used by TMMBR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxBitrate {
    pub exp: u32,
    pub mantissa: u32,
}

impl MaxBitrate {
    /// Represent `bitrate` (bits/s) using the lowest set bit at or above bit 4 as exponent.
    ///
    /// Bitrates below 16 have no such bit and encode as zero. The wire format only has room for 17
    /// mantissa bits, [`to_bytes`](Self::to_bytes) drops everything above those. E.g. `10_000_016`
    /// becomes `625001 << 4` and is sent as `(625001 & 0x1FFFF) << 4`.
    pub fn from_bitrate(bitrate: i32) -> Self {
        let exp = (4..32)
            .find(|exp| (bitrate >> exp) & 0x01 != 0)
            .unwrap_or(32);

        let mantissa = bitrate.checked_shr(exp).unwrap_or(0).cast_unsigned();

        Self { exp, mantissa }
    }

    /// Exponent (6 bits), mantissa (17 bits), measured overhead (9 bits)
    pub fn to_bytes(self) -> [u8; 4] {
        let Self { exp, mantissa } = self;

        [
            (((exp << 2) & 0xFC) | ((mantissa >> 15) & 0x03)) as u8,
            ((mantissa >> 7) & 0xFF) as u8,
            ((mantissa & 0x7F) << 1) as u8,
            TMMBR_OVERHEAD,
        ]
    }
}
