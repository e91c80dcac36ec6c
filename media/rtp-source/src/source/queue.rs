use rtp::{ExtendedSequenceNumber, RtpPacket};
use std::{collections::VecDeque, fmt};

/// Packet accepted by a [`ReorderQueue`], tagged with its extended sequence number
#[derive(Debug, Clone)]
pub struct ReceivedPacket {
    pub sequence_number: ExtendedSequenceNumber,
    pub packet: RtpPacket,
}

/// Received packets ordered by their extended sequence number
///
/// Front of queue are the oldest packets (lowest sequence number)
/// Back of queue are the newest packets (highest sequence number)
///
/// Packets stay in here until the assembler consumes them.
#[derive(Default)]
pub struct ReorderQueue {
    queue: VecDeque<ReceivedPacket>,
}

impl fmt::Debug for ReorderQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.queue.iter().map(|entry| entry.sequence_number.0))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PushResult {
    Added,
    Duplicate,
}

impl ReorderQueue {
    pub(crate) fn push(
        &mut self,
        sequence_number: ExtendedSequenceNumber,
        packet: RtpPacket,
    ) -> PushResult {
        // front (1 2 3 4 5 6 7 8 9) back
        let index = self
            .queue
            .partition_point(|entry| entry.sequence_number < sequence_number);

        if self
            .queue
            .get(index)
            .is_some_and(|entry| entry.sequence_number == sequence_number)
        {
            return PushResult::Duplicate;
        }

        self.queue.insert(
            index,
            ReceivedPacket {
                sequence_number,
                packet,
            },
        );

        PushResult::Added
    }

    pub(crate) fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The packet with the lowest sequence number
    pub fn front(&self) -> Option<&ReceivedPacket> {
        self.queue.front()
    }

    pub fn pop_front(&mut self) -> Option<ReceivedPacket> {
        self.queue.pop_front()
    }

    /// Iterate over all queued packets in ascending sequence number order
    pub fn iter(&self) -> impl Iterator<Item = &ReceivedPacket> + '_ {
        self.queue.iter()
    }
}
