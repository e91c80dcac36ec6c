use rtp::{NtpTimestamp, RtpTimestamp, Ssrc};
use std::sync::mpsc;

/// Mapping of a source's RTP timestamp to absolute time, e.g. from a RTCP sender report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeUpdate {
    pub ssrc: Ssrc,
    pub rtp_time: RtpTimestamp,
    pub ntp_time: NtpTimestamp,
}

/// Receiver of [`TimeUpdate`]s
///
/// Posting never blocks and is best effort, updates nobody listens to anymore are discarded.
pub trait TimeUpdateSink: Send {
    fn post(&self, update: TimeUpdate);
}

impl TimeUpdateSink for mpsc::Sender<TimeUpdate> {
    fn post(&self, update: TimeUpdate) {
        if let Err(e) = self.send(update) {
            log::debug!("Discarding time update for {:?}, {e}", update.ssrc);
        }
    }
}

#[cfg(feature = "tokio")]
impl TimeUpdateSink for tokio::sync::mpsc::UnboundedSender<TimeUpdate> {
    fn post(&self, update: TimeUpdate) {
        if let Err(e) = self.send(update) {
            log::debug!("Discarding time update for {:?}, {e}", update.ssrc);
        }
    }
}
