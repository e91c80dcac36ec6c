use rtp::Ssrc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// SSRC used as sender of all RTCP packets generated by the source
    pub local_ssrc: Ssrc,
    /// Minimum time between two full intra requests
    pub fir_interval: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            local_ssrc: Ssrc(0xDEAD_BEEF),
            fir_interval: Duration::from_secs(5),
        }
    }
}
