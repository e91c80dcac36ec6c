use crate::{
    Assembler, AssemblerFactory, CodecKind, MediaFormat, QualityManager, SourceConfig, TimeUpdate,
    TimeUpdateSink,
    rtcp::{self, FIR_LEN, MaxBitrate, RECEIVER_REPORT_LEN, TMMBR_LEN},
};
use bytes::BufMut;
use queue::PushResult;
use rtp::{NtpTimestamp, RtpPacket, RtpTimestamp, Ssrc, rtcp_types::ReportBlock};
use stats::ReceptionStats;
use std::{
    fmt,
    time::{Duration, Instant},
};
use time::ext::InstantExt as _;

mod queue;
mod stats;

pub use queue::{ReceivedPacket, ReorderQueue};
pub use stats::{RtpSourceStats, TimeBase};

#[derive(Debug, thiserror::Error)]
pub enum RtpSourceError {
    #[error("No assembler available for media format {0:?}")]
    UnsupportedCodec(String),
}

/// Receive state of a single remote RTP sender
///
/// Packets handed to [`receive_rtp`](Self::receive_rtp) are put in order and passed on to the
/// [`Assembler`] of the payload format. Between packets the source produces the RTCP feedback the
/// sender needs: receiver reports, full intra requests and bitrate limit requests.
///
/// All methods are expected to be called from a single context per source.
pub struct RtpSource {
    ssrc: Ssrc,
    local_ssrc: Ssrc,
    codec: CodecKind,

    queue: ReorderQueue,
    stats: ReceptionStats,

    /// `None` if the assembler failed to initialize
    assembler: Option<Box<dyn Assembler>>,
    quality: Box<dyn QualityManager>,
    time_updates: Box<dyn TimeUpdateSink>,

    // RTCP feedback CCM FIR
    fir: Option<FirState>,
}

struct FirState {
    interval: Duration,
    next_seq: u8,
    last_sent: Option<Instant>,
}

impl fmt::Debug for RtpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RtpSource")
            .field("ssrc", &self.ssrc)
            .field("codec", &self.codec)
            .field("queue", &self.queue)
            .field("stats", &self.stats)
            .field("assembler", &self.assembler.as_ref().map(|_| "[opaque]"))
            .finish_non_exhaustive()
    }
}

impl RtpSource {
    /// Create the receive state for the remote sender `ssrc`
    ///
    /// Fails if there is no assembler for the given media format.
    pub fn new(
        ssrc: Ssrc,
        config: &SourceConfig,
        format: &MediaFormat<'_>,
        assemblers: &mut impl AssemblerFactory,
        quality: Box<dyn QualityManager>,
        time_updates: Box<dyn TimeUpdateSink>,
    ) -> Result<Self, RtpSourceError> {
        let codec = CodecKind::from_description(format.description)
            .ok_or_else(|| RtpSourceError::UnsupportedCodec(format.description.into()))?;

        let assembler = assemblers.create(codec, format);

        let assembler = if assembler.init_check() {
            Some(assembler)
        } else {
            log::warn!(
                "Assembler for {:?} of {ssrc:?} failed to initialize, dropping all its packets",
                format.description
            );
            None
        };

        let fir = codec.fir_enabled().then(|| FirState {
            interval: config.fir_interval,
            next_seq: rand::random(),
            last_sent: None,
        });

        Ok(RtpSource {
            ssrc,
            local_ssrc: config.local_ssrc,
            codec,
            queue: ReorderQueue::default(),
            stats: ReceptionStats::new(),
            assembler,
            quality,
            time_updates,
            fir,
        })
    }

    pub fn ssrc(&self) -> Ssrc {
        self.ssrc
    }

    pub fn codec(&self) -> CodecKind {
        self.codec
    }

    pub fn fir_enabled(&self) -> bool {
        self.fir.is_some()
    }

    /// Anchors of the first received packet, `None` until then
    pub fn time_base(&self) -> Option<&TimeBase> {
        self.stats.time_base.as_ref()
    }

    /// Packets not yet consumed by the assembler
    pub fn queue(&self) -> &ReorderQueue {
        &self.queue
    }

    /// Hand off a received RTP packet to the source
    ///
    /// Returns `false` if the packet was discarded as duplicate.
    pub fn receive_rtp(&mut self, now: Instant, packet: RtpPacket) -> bool {
        if !self.accept(now, packet) {
            return false;
        }

        let (Some(assembler), Some(time_base)) = (&mut self.assembler, &self.stats.time_base)
        else {
            log::trace!("No assembler for {:?}, dropping packet", self.ssrc);
            self.queue.clear();
            return true;
        };

        assembler.on_packet_ready(&mut self.queue, time_base);

        true
    }

    fn accept(&mut self, now: Instant, packet: RtpPacket) -> bool {
        self.stats.received += 1;

        let sequence_number = if self.stats.time_base.is_none() {
            let sequence_number = self.stats.start(now, packet.sequence_number, packet.timestamp);

            log::debug!(
                "First packet of {:?}: seq={} rtp-time={}",
                self.ssrc,
                sequence_number.0,
                packet.timestamp.0
            );

            sequence_number
        } else {
            self.stats.extend(packet.sequence_number)
        };

        match self.queue.push(sequence_number, packet) {
            PushResult::Added => true,
            PushResult::Duplicate => {
                log::debug!(
                    "Discarding duplicate packet seq={} of {:?}",
                    sequence_number.0,
                    self.ssrc
                );
                false
            }
        }
    }

    /// The sender left the session
    pub fn on_bye(&mut self) {
        if let Some(assembler) = &mut self.assembler {
            assembler.on_bye();
        }
    }

    /// Record a mapping between the sender's RTP and absolute time, as received in sender reports
    pub fn on_time_reference(
        &mut self,
        now: Instant,
        rtp_time: RtpTimestamp,
        ntp_time: NtpTimestamp,
    ) {
        self.stats.last_time_reference = Some((ntp_time, now));

        self.time_updates.post(TimeUpdate {
            ssrc: self.ssrc,
            rtp_time,
            ntp_time,
        });
    }

    /// A later stage discarded `count` packets it got from this source
    pub fn on_buffer_abandoned(&mut self, count: u32) {
        self.stats.received -= i64::from(count);
    }

    pub fn set_min_max_bitrate(&mut self, min: i32, max: i32) {
        self.quality.set_min_max_bitrate(min, max);
    }

    /// Packets were received since the last receiver report
    pub fn is_due(&self) -> bool {
        self.stats.is_due()
    }

    /// Write a receiver report for this source into `out`
    ///
    /// Starts a new loss interval and passes the loss of the finished one to the [`QualityManager`].
    /// Returns `false` without touching any state if `out` doesn't have room for the report.
    pub fn build_receiver_report(&mut self, now: Instant, out: &mut impl BufMut) -> bool {
        if out.remaining_mut() < RECEIVER_REPORT_LEN {
            log::warn!("RTCP buffer too small to fit receiver report");
            return false;
        }

        let interval = self.stats.next_interval();

        self.quality.set_target_bitrate(interval.fraction_lost);

        log::debug!(
            "{:?} expected {} packets, lost {}",
            self.ssrc,
            interval.expected,
            interval.lost
        );

        let (last_sr, delay) = match self.stats.last_time_reference {
            Some((ntp_time, received_at)) if ntp_time != NtpTimestamp::ZERO => {
                let delay = now.signed_duration_since(received_at);
                let delay = (delay.as_seconds_f64() * 65536.0) as u32;

                (ntp_time.to_fixed_u32(), delay)
            }
            _ => (0, 0),
        };

        // Only the lower 24 bits are transmitted
        let cumulative_lost = interval.cumulative_lost.cast_unsigned() & 0x00FF_FFFF;

        let block = ReportBlock::builder(self.ssrc.0)
            .fraction_lost(interval.fraction_lost)
            .cumulative_lost(cumulative_lost)
            .extended_sequence_number(self.stats.highest.0)
            .interarrival_jitter(0)
            .last_sender_report_timestamp(last_sr)
            .delay_since_last_sender_report_timestamp(delay);

        if let Err(e) = rtcp::write_receiver_report(out, self.local_ssrc, block) {
            log::warn!("Failed to write receiver report for {:?}, {e}", self.ssrc);
            return false;
        }

        true
    }

    /// Write a full intra request into `out`
    ///
    /// Does nothing if the payload format doesn't support it or the last request was sent too recently.
    pub fn add_fir(&mut self, now: Instant, out: &mut impl BufMut) -> bool {
        let Some(fir) = &mut self.fir else {
            return false;
        };

        let throttled = fir.last_sent.is_some_and(|last_sent| {
            last_sent
                .checked_add(fir.interval)
                .is_none_or(|next_allowed| next_allowed > now)
        });

        if throttled {
            return false;
        }

        // A request that doesn't fit still starts the interval
        fir.last_sent = Some(now);

        if out.remaining_mut() < FIR_LEN {
            log::warn!("RTCP buffer too small to fit FIR");
            return false;
        }

        if let Err(e) = rtcp::write_fir(out, self.local_ssrc, self.ssrc, fir.next_seq) {
            log::warn!("Failed to write FIR for {:?}, {e}", self.ssrc);
            return false;
        }

        fir.next_seq = fir.next_seq.wrapping_add(1);

        log::trace!("Added FIR request for {:?}", self.ssrc);

        true
    }

    /// Write a TMMBR with the [`QualityManager`]'s current target bitrate into `out`
    pub fn add_tmmbr(&mut self, out: &mut impl BufMut) -> bool {
        let target_bitrate = self.quality.target_bitrate();

        if target_bitrate <= 0 {
            return false;
        }

        if out.remaining_mut() < TMMBR_LEN {
            log::warn!("RTCP buffer too small to fit TMMBR");
            return false;
        }

        log::trace!(
            "Requesting {:?} to limit bitrate to {target_bitrate}",
            self.ssrc
        );

        if let Err(e) = rtcp::write_tmmbr(
            out,
            self.local_ssrc,
            self.ssrc,
            MaxBitrate::from_bitrate(target_bitrate),
        ) {
            log::warn!("Failed to write TMMBR for {:?}, {e}", self.ssrc);
            return false;
        }

        true
    }

    /// Write all due RTCP packets into `out`
    ///
    /// Receiver report & TMMBR are only written if packets were received since the last report.
    pub fn collect_reports(&mut self, now: Instant, out: &mut impl BufMut) {
        if self.is_due() && self.build_receiver_report(now, out) {
            self.add_tmmbr(out);
        }

        self.add_fir(now, out);
    }

    pub fn stats(&self) -> RtpSourceStats {
        let expected = self.stats.expected();

        RtpSourceStats {
            packets_received: self.stats.received,
            packets_expected: expected,
            packets_lost: i64::from(expected) - self.stats.received,
            highest_sequence_number: self.stats.time_base.map(|_| self.stats.highest),
            queued: self.queue.len(),
        }
    }
}
