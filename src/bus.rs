// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Bus callback contract.
//!
//! [`BusSlave`] is everything the I2C interrupt is allowed to touch: the producer half of the
//! frame queue, the receive-side part of the codec, and the status reporter. Both callbacks run to
//! completion without blocking, allocating, or looking at motor state directly.

use crate::protocol::{FrameCodec, FrameProducer};
use crate::status::StatusReporter;

pub struct BusSlave<'a, const Q: usize, const A: usize> {
    producer: FrameProducer<'a, Q>,
    codec: FrameCodec,
    status: StatusReporter<'a, A>,
}

impl<'a, const Q: usize, const A: usize> BusSlave<'a, Q, A> {
    pub fn new(
        producer: FrameProducer<'a, Q>,
        codec: FrameCodec,
        status: StatusReporter<'a, A>,
    ) -> Self {
        Self {
            producer,
            codec,
            status,
        }
    }

    /// A complete write transaction arrived. Returns `true` if the frame was queued.
    pub fn on_receive(&mut self, bytes: &[u8]) -> bool {
        if !self.codec.accepts_on_receive(bytes) {
            debug!("bus: frame of {=usize} bytes rejected on receive", bytes.len());
            return false;
        }
        if !self.producer.try_push(bytes) {
            warn!(
                "bus: command queue full, dropped frame ({=u32} total)",
                self.producer.dropped()
            );
            return false;
        }
        true
    }

    /// The master is reading: answer with the running bitmap.
    #[inline]
    pub fn on_request(&self) -> u8 {
        self.status.report()
    }

    /// Frames lost to a full queue since startup.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.producer.dropped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{FrameQueue, ValidationPoint};
    use crate::status::RunningFlags;

    #[test]
    fn queues_accepted_frames_in_order() {
        let flags = RunningFlags::<8>::new();
        let mut queue = FrameQueue::<4>::new();
        let (producer, mut consumer) = queue.split();
        let status = StatusReporter::new(&flags);
        let mut bus = BusSlave::new(producer, FrameCodec::from_config(), status);

        assert!(bus.on_receive(&[7, 0xff, 0]));
        assert!(bus.on_receive(&[0, 1, 1]));

        assert_eq!(consumer.try_pop().unwrap().as_bytes(), &[7, 0xff, 0]);
        assert_eq!(consumer.try_pop().unwrap().as_bytes(), &[0, 1, 1]);
        assert!(consumer.try_pop().is_none());
    }

    #[test]
    fn drops_when_full_and_keeps_older_frames() {
        let flags = RunningFlags::<8>::new();
        let mut queue = FrameQueue::<3>::new();
        let (producer, mut consumer) = queue.split();
        let status = StatusReporter::new(&flags);
        let mut bus = BusSlave::new(producer, FrameCodec::from_config(), status);

        assert!(bus.on_receive(&[7, 0, 7]));
        assert!(bus.on_receive(&[7, 1, 8]));
        assert!(!bus.on_receive(&[7, 2, 9]));
        assert_eq!(bus.dropped(), 1);

        assert_eq!(consumer.try_pop().unwrap().as_bytes(), &[7, 0, 7]);
        assert_eq!(consumer.try_pop().unwrap().as_bytes(), &[7, 1, 8]);
        assert!(consumer.try_pop().is_none());
    }

    #[test]
    fn rejects_empty_and_oversized_frames() {
        let flags = RunningFlags::<8>::new();
        let mut queue = FrameQueue::<4>::new();
        let (producer, consumer) = queue.split();
        let status = StatusReporter::new(&flags);
        let mut bus = BusSlave::new(producer, FrameCodec::from_config(), status);

        assert!(!bus.on_receive(&[]));
        assert!(!bus.on_receive(&[0; 9]));
        assert!(consumer.is_empty());
        // Rejections are not queue drops.
        assert_eq!(bus.dropped(), 0);
    }

    #[test]
    fn checks_checksum_in_interrupt_when_configured() {
        let flags = RunningFlags::<8>::new();
        let mut queue = FrameQueue::<4>::new();
        let (producer, consumer) = queue.split();
        let codec = FrameCodec::new(true, ValidationPoint::Receive, 8);
        let mut bus = BusSlave::new(producer, codec, StatusReporter::new(&flags));

        assert!(!bus.on_receive(&[3, 0, 0, 1, 0, 5]));
        assert!(bus.on_receive(&[3, 0, 0, 1, 0, 4]));
        assert_eq!(consumer.len(), 1);
    }

    #[test]
    fn request_reports_running_bitmap() {
        let flags = RunningFlags::<8>::new();
        let mut queue = FrameQueue::<2>::new();
        let (producer, _consumer) = queue.split();
        let bus = BusSlave::new(producer, FrameCodec::from_config(), StatusReporter::new(&flags));

        assert_eq!(bus.on_request(), 0);
        flags.publish(0, true);
        flags.publish(7, true);
        assert_eq!(bus.on_request(), 0b1000_0001);
    }
}
