// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame queue between the I2C receive interrupt (producer) and the main loop (consumer).
//!
//! Built on `heapless::spsc`, which publishes the tail index only after the slot is written, so
//! the consumer never observes a half-copied frame and the producer never waits on the consumer.
//! Frames are stored as opaque bytes; decoding happens on the consumer side.
//!
//! ```ignore
//! let queue = cortex_m::singleton!(: CommandQueue = CommandQueue::new()).unwrap();
//! let (producer, consumer) = queue.split();
//! ```

use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;

use crate::config::{CMD_QUEUE_LENGTH, MAX_FRAME_LEN};

/// One received frame, copied verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawFrame {
    bytes: Vec<u8, MAX_FRAME_LEN>,
}

impl RawFrame {
    /// Copy `bytes` into a new frame. `None` if empty or longer than [`MAX_FRAME_LEN`].
    pub fn new(bytes: &[u8]) -> Option<Self> {
        if bytes.is_empty() {
            return None;
        }
        Vec::from_slice(bytes).ok().map(|bytes| Self { bytes })
    }

    #[inline]
    pub fn command_id(&self) -> u8 {
        self.bytes[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Fixed-size frame queue. `heapless` keeps one slot free, so it holds `N - 1` frames.
pub struct FrameQueue<const N: usize> {
    inner: Queue<RawFrame, N>,
}

/// Queue sized for [`CMD_QUEUE_LENGTH`] pending frames.
pub type CommandQueue = FrameQueue<{ CMD_QUEUE_LENGTH + 1 }>;

impl<const N: usize> FrameQueue<N> {
    pub const fn new() -> Self {
        Self {
            inner: Queue::new(),
        }
    }

    /// Number of frames the queue can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    /// Split into the interrupt-side producer and main-loop consumer.
    pub fn split(&mut self) -> (FrameProducer<'_, N>, FrameConsumer<'_, N>) {
        let (producer, consumer) = self.inner.split();
        (
            FrameProducer {
                inner: producer,
                dropped: 0,
            },
            FrameConsumer { inner: consumer },
        )
    }
}

impl<const N: usize> Default for FrameQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer half, owned by the receive interrupt.
pub struct FrameProducer<'q, const N: usize> {
    inner: Producer<'q, RawFrame, N>,
    dropped: u32,
}

impl<'q, const N: usize> FrameProducer<'q, N> {
    /// Copy a frame into the queue. Never blocks; returns `false` and counts the frame as
    /// dropped if the queue is full or the length is out of bounds.
    pub fn try_push(&mut self, bytes: &[u8]) -> bool {
        let pushed = match RawFrame::new(bytes) {
            Some(frame) => self.inner.enqueue(frame).is_ok(),
            None => false,
        };
        if !pushed {
            self.dropped = self.dropped.wrapping_add(1);
        }
        pushed
    }

    /// Frames dropped since startup.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        !self.inner.ready()
    }
}

/// Consumer half, owned by the main loop.
pub struct FrameConsumer<'q, const N: usize> {
    inner: Consumer<'q, RawFrame, N>,
}

impl<'q, const N: usize> FrameConsumer<'q, N> {
    /// Take the oldest frame, if any. Never blocks.
    #[inline]
    pub fn try_pop(&mut self) -> Option<RawFrame> {
        self.inner.dequeue()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.inner.ready()
    }
}
