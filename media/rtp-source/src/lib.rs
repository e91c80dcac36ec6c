//! # Receive side of a RTP media stream
//!
//! [`RtpSource`] tracks a single remote sender (SSRC) of a session. It restores the order of the
//! received packets, hands them to the payload format's [`Assembler`] and generates the RTCP
//! feedback for the sender:
//!
//! - receiver reports (RFC 3550)
//! - full intra requests (RFC 5104), for video formats
//! - temporary maximum media bitrate requests (RFC 5104), driven by a [`QualityManager`]
//!
//! The source is sans-io, the current time is passed into every call that depends on it and RTCP
//! packets are written into caller supplied buffers.

mod assembler;
mod codec;
mod config;
mod notify;
mod quality;
pub mod rtcp;
mod source;

pub use assembler::{Assembler, AssemblerFactory};
pub use codec::{CodecKind, MediaFormat};
pub use config::SourceConfig;
pub use notify::{TimeUpdate, TimeUpdateSink};
pub use quality::QualityManager;
pub use source::{
    ReceivedPacket, ReorderQueue, RtpSource, RtpSourceError, RtpSourceStats, TimeBase,
};

pub use rtp;
