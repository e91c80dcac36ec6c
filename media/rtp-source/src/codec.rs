/// Media format of a RTP source as described by the session description
#[derive(Debug, Clone, Copy)]
pub struct MediaFormat<'a> {
    /// Encoding name and clock rate from the rtpmap attribute, e.g. `H264/90000`
    pub description: &'a str,
    /// Format specific parameters from the fmtp attribute
    pub params: &'a str,
}

/// Payload formats a source can be created for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    /// `H264/`
    H264,
    /// `H265/`
    H265,
    /// `H263-1998/` or `H263-2000/`
    H263,
    /// `MP4V-ES/` or `mpeg4-generic/`
    Mpeg4Elementary,
    /// `MP4A-LATM/`
    Mpeg4Audio,
    /// `AMR/`
    Amr,
    /// `AMR-WB/`
    AmrWb,
    /// `PCMU/` or `PCMA/`
    RawAudio,
    /// `MP2T/`
    Mpeg2Ts,
}

impl CodecKind {
    /// Find the payload format from the description's encoding name
    pub fn from_description(description: &str) -> Option<Self> {
        let kind = if description.starts_with("H264/") {
            Self::H264
        } else if description.starts_with("H265/") {
            Self::H265
        } else if description.starts_with("MP4A-LATM/") {
            Self::Mpeg4Audio
        } else if description.starts_with("H263-1998/") || description.starts_with("H263-2000/") {
            Self::H263
        } else if description.starts_with("AMR/") {
            Self::Amr
        } else if description.starts_with("AMR-WB/") {
            Self::AmrWb
        } else if description.starts_with("MP4V-ES/")
            || starts_with_ignore_case(description, "mpeg4-generic/")
        {
            Self::Mpeg4Elementary
        } else if description.starts_with("PCMU/") || description.starts_with("PCMA/") {
            Self::RawAudio
        } else if starts_with_ignore_case(description, "MP2T/") {
            Self::Mpeg2Ts
        } else {
            return None;
        };

        Some(kind)
    }

    /// Whether the sender can be asked for a full intra frame
    pub fn fir_enabled(self) -> bool {
        match self {
            Self::H264 | Self::H265 | Self::H263 | Self::Mpeg4Elementary => true,
            Self::Mpeg4Audio | Self::Amr | Self::AmrWb | Self::RawAudio | Self::Mpeg2Ts => false,
        }
    }
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_formats_enable_fir() {
        for (description, kind) in [
            ("H264/90000", CodecKind::H264),
            ("H265/90000", CodecKind::H265),
            ("H263-1998/90000", CodecKind::H263),
            ("H263-2000/90000", CodecKind::H263),
            ("MP4V-ES/90000", CodecKind::Mpeg4Elementary),
            ("mpeg4-generic/90000", CodecKind::Mpeg4Elementary),
            ("MPEG4-GENERIC/90000", CodecKind::Mpeg4Elementary),
        ] {
            assert_eq!(CodecKind::from_description(description), Some(kind));
            assert!(kind.fir_enabled());
        }
    }

    #[test]
    fn audio_formats_disable_fir() {
        for (description, kind) in [
            ("MP4A-LATM/90000", CodecKind::Mpeg4Audio),
            ("AMR/8000", CodecKind::Amr),
            ("AMR-WB/16000", CodecKind::AmrWb),
            ("PCMU/8000", CodecKind::RawAudio),
            ("PCMA/8000", CodecKind::RawAudio),
            ("mp2t/90000", CodecKind::Mpeg2Ts),
        ] {
            assert_eq!(CodecKind::from_description(description), Some(kind));
            assert!(!kind.fir_enabled());
        }
    }

    #[test]
    fn unknown_formats() {
        for description in ["", "H264", "h264/90000", "VP8/90000", "opus/48000/2", "AMR"] {
            assert_eq!(CodecKind::from_description(description), None);
        }
    }

    #[test]
    fn prefix_on_multibyte_boundary() {
        assert!(!starts_with_ignore_case("ü", "m"));
        assert!(CodecKind::from_description("MP2ü/").is_none());
    }
}
