use bytes::Bytes;
use ezk_rtp_source::{
    Assembler, AssemblerFactory, CodecKind, MediaFormat, QualityManager, ReorderQueue, RtpSource,
    SourceConfig, TimeBase, TimeUpdate,
    rtp::{RtpPacket, RtpTimestamp, SequenceNumber, Ssrc},
};
use std::sync::{Arc, Mutex, mpsc};

pub(crate) const REMOTE_SSRC: Ssrc = Ssrc(0x0A0B_0C0D);
pub(crate) const LOCAL_SSRC: Ssrc = Ssrc(0x0102_0304);

/// Everything the collaborators of a source observed
#[derive(Debug, Default)]
pub(crate) struct Observed {
    pub(crate) created: Vec<CodecKind>,
    /// Queue length on every `on_packet_ready` call
    pub(crate) queue_lens: Vec<usize>,
    /// Extended sequence numbers of packets consumed by a draining assembler
    pub(crate) consumed: Vec<u32>,
    pub(crate) byes: usize,
    pub(crate) fractions_lost: Vec<u8>,
    pub(crate) min_max_bitrate: Option<(i32, i32)>,
}

pub(crate) type Probe = Arc<Mutex<Observed>>;

struct TestAssembler {
    probe: Probe,
    valid: bool,
    drain: bool,
}

impl Assembler for TestAssembler {
    fn init_check(&self) -> bool {
        self.valid
    }

    fn on_packet_ready(&mut self, queue: &mut ReorderQueue, _time_base: &TimeBase) {
        let mut observed = self.probe.lock().unwrap();
        observed.queue_lens.push(queue.len());

        if self.drain {
            while let Some(received) = queue.pop_front() {
                observed.consumed.push(received.sequence_number.0);
            }
        }
    }

    fn on_bye(&mut self) {
        self.probe.lock().unwrap().byes += 1;
    }
}

pub(crate) struct TestAssemblerFactory {
    pub(crate) probe: Probe,
    pub(crate) valid: bool,
    pub(crate) drain: bool,
}

impl AssemblerFactory for TestAssemblerFactory {
    fn create(&mut self, codec: CodecKind, _format: &MediaFormat<'_>) -> Box<dyn Assembler> {
        self.probe.lock().unwrap().created.push(codec);

        Box::new(TestAssembler {
            probe: self.probe.clone(),
            valid: self.valid,
            drain: self.drain,
        })
    }
}

pub(crate) struct TestQuality {
    pub(crate) probe: Probe,
    pub(crate) target_bitrate: i32,
}

impl QualityManager for TestQuality {
    fn set_target_bitrate(&mut self, fraction_lost: u8) {
        self.probe.lock().unwrap().fractions_lost.push(fraction_lost);
    }

    fn target_bitrate(&self) -> i32 {
        self.target_bitrate
    }

    fn set_min_max_bitrate(&mut self, min: i32, max: i32) {
        self.probe.lock().unwrap().min_max_bitrate = Some((min, max));
    }
}

pub(crate) struct TestSource {
    pub(crate) source: RtpSource,
    pub(crate) probe: Probe,
    pub(crate) time_updates: mpsc::Receiver<TimeUpdate>,
}

pub(crate) struct TestSourceBuilder {
    description: &'static str,
    target_bitrate: i32,
    valid: bool,
    drain: bool,
}

impl TestSourceBuilder {
    pub(crate) fn new(description: &'static str) -> Self {
        Self {
            description,
            target_bitrate: 0,
            valid: true,
            drain: false,
        }
    }

    pub(crate) fn target_bitrate(mut self, target_bitrate: i32) -> Self {
        self.target_bitrate = target_bitrate;
        self
    }

    pub(crate) fn invalid_assembler(mut self) -> Self {
        self.valid = false;
        self
    }

    pub(crate) fn draining(mut self) -> Self {
        self.drain = true;
        self
    }

    pub(crate) fn build(self) -> TestSource {
        let _ = env_logger::builder().is_test(true).try_init();

        let probe = Probe::default();
        let (tx, rx) = mpsc::channel();

        let config = SourceConfig {
            local_ssrc: LOCAL_SSRC,
            ..SourceConfig::default()
        };

        let source = RtpSource::new(
            REMOTE_SSRC,
            &config,
            &MediaFormat {
                description: self.description,
                params: "",
            },
            &mut TestAssemblerFactory {
                probe: probe.clone(),
                valid: self.valid,
                drain: self.drain,
            },
            Box::new(TestQuality {
                probe: probe.clone(),
                target_bitrate: self.target_bitrate,
            }),
            Box::new(tx),
        )
        .unwrap();

        TestSource {
            source,
            probe,
            time_updates: rx,
        }
    }
}

pub(crate) fn make_packet(seq: u16) -> RtpPacket {
    RtpPacket {
        pt: 96,
        sequence_number: SequenceNumber(seq),
        ssrc: REMOTE_SSRC,
        timestamp: RtpTimestamp(u32::from(seq) * 3000),
        marker: false,
        payload: Bytes::from_static(&[0; 8]),
    }
}

pub(crate) fn queued(source: &RtpSource) -> Vec<u32> {
    source
        .queue()
        .iter()
        .map(|received| received.sequence_number.0)
        .collect()
}
