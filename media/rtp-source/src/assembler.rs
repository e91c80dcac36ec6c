use crate::{CodecKind, MediaFormat, ReorderQueue, TimeBase};

/// Payload reassembler consuming the ordered packets of a [`RtpSource`](crate::RtpSource)
///
/// One implementation exists per payload format, they are created through an [`AssemblerFactory`].
pub trait Assembler: Send {
    /// Returns `false` if the assembler could not be initialized from the format parameters.
    ///
    /// A source drops all packets instead of handing them to an assembler that failed this check.
    fn init_check(&self) -> bool {
        true
    }

    /// Called every time a new packet was added to the queue.
    ///
    /// The assembler takes packets out of the queue once it has everything it needs to produce a frame.
    /// Packets left in the queue are kept for the next call.
    fn on_packet_ready(&mut self, queue: &mut ReorderQueue, time_base: &TimeBase);

    /// The sender left the session
    fn on_bye(&mut self);
}

/// Creates the [`Assembler`] for a payload format
pub trait AssemblerFactory {
    fn create(&mut self, codec: CodecKind, format: &MediaFormat<'_>) -> Box<dyn Assembler>;
}
