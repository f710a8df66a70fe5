// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Main-loop side of the node.
//!
//! [`Node`] owns everything the interrupt must not touch: the consumer half of the frame queue,
//! the axes, and the dispatcher. Each [`tick`](Node::tick) handles at most one queued frame and
//! then gives every axis one chance to step, so a burst of commands can never starve the motors.

use crate::control::Dispatcher;
use crate::hw::EnableLine;
use crate::motors::{AxisRegistry, MotionPrimitive};
use crate::protocol::{Direction, FrameCodec, FrameConsumer, FrameResult};
use crate::status::RunningFlags;

pub struct Node<'a, M, E, const Q: usize, const N: usize> {
    consumer: FrameConsumer<'a, Q>,
    codec: FrameCodec,
    registry: AxisRegistry<M, N>,
    dispatcher: Dispatcher<E>,
    flags: &'a RunningFlags<N>,
    rejected: u32,
}

impl<'a, M, E, const Q: usize, const N: usize> Node<'a, M, E, Q, N>
where
    M: MotionPrimitive,
    E: EnableLine,
{
    pub fn new(
        consumer: FrameConsumer<'a, Q>,
        codec: FrameCodec,
        registry: AxisRegistry<M, N>,
        dispatcher: Dispatcher<E>,
        flags: &'a RunningFlags<N>,
    ) -> Self {
        Self {
            consumer,
            codec,
            registry,
            dispatcher,
            flags,
            rejected: 0,
        }
    }

    /// Apply default limits and send every hand to 12 o'clock: hour hands counter-clockwise,
    /// minute hands clockwise, so each pair visibly separates.
    pub fn startup(&mut self) {
        let planner = self.dispatcher.planner();
        for axis in self.registry.hour_axes_mut() {
            planner.home(axis, Direction::Ccw);
        }
        for axis in self.registry.minute_axes_mut() {
            planner.home(axis, Direction::Cw);
        }
        info!("homing {=usize} axes", N);
        self.registry.publish(self.flags);
    }

    /// One scheduler pass.
    pub fn tick(&mut self) {
        self.poll_command();
        self.registry.advance_all(self.flags);
    }

    /// Decode and dispatch the oldest queued frame, if any.
    pub fn poll_command(&mut self) -> Option<FrameResult> {
        let frame = self.consumer.try_pop()?;
        let result = self.codec.decode(frame.as_bytes());
        match result {
            Ok(cmd) => {
                trace!("dispatch {}", cmd);
                self.dispatcher.dispatch(&mut self.registry, cmd);
            }
            Err(reason) => {
                self.rejected = self.rejected.wrapping_add(1);
                debug!("rejected frame {=u8}: {}", frame.command_id(), reason);
            }
        }
        Some(result)
    }

    #[inline]
    pub fn registry(&self) -> &AxisRegistry<M, N> {
        &self.registry
    }

    #[inline]
    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }

    /// Frames that failed validation since startup.
    #[inline]
    pub fn rejected(&self) -> u32 {
        self.rejected
    }

    /// Frames waiting in the queue.
    #[inline]
    pub fn pending(&self) -> usize {
        self.consumer.len()
    }

    /// `true` while any axis is still moving.
    pub fn is_busy(&self) -> bool {
        self.registry.iter().any(|axis| axis.is_running())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::STEPS_PER_REVOLUTION;
    use crate::control::MotionPlanner;
    use crate::motors::testing::{FakeAxis, FakeEnable};
    use crate::protocol::{
        AxisSelector, Command, FrameProducer, FrameQueue, RejectReason, Routing,
    };

    type TestNode<'a> = Node<'a, FakeAxis, FakeEnable, 8, 8>;

    fn setup<'a>(
        queue: &'a mut FrameQueue<8>,
        flags: &'a RunningFlags<8>,
    ) -> (TestNode<'a>, FrameProducer<'a, 8>) {
        let (producer, consumer) = queue.split();
        let registry = AxisRegistry::new(core::array::from_fn(|_| FakeAxis::at(0)));
        let dispatcher = Dispatcher::new(MotionPlanner::default(), FakeEnable::default());
        let node = Node::new(consumer, FrameCodec::from_config(), registry, dispatcher, flags);
        (node, producer)
    }

    #[test]
    fn startup_homes_pairs_in_opposite_directions() {
        let mut queue = FrameQueue::new();
        let flags = RunningFlags::new();
        let (mut node, _producer) = setup(&mut queue, &flags);

        node.startup();

        let half = STEPS_PER_REVOLUTION / 2;
        for i in 0..4 {
            let minute = node.registry().get(i).unwrap();
            assert_eq!(minute.current, half);
            assert_eq!(minute.target, STEPS_PER_REVOLUTION);
            assert_eq!(minute.max_speed, 700.0);
            assert_eq!(minute.acceleration, 300.0);

            let hour = node.registry().get(i + 4).unwrap();
            assert_eq!(hour.current, half);
            assert_eq!(hour.target, 0);
        }
        assert_eq!(flags.bitmap(), 0xFF);
    }

    #[test]
    fn handles_one_frame_per_tick() {
        let mut queue = FrameQueue::new();
        let flags = RunningFlags::new();
        let (mut node, mut producer) = setup(&mut queue, &flags);

        let first = Command::MoveRelative {
            axis: AxisSelector::One(1),
            distance: 3,
            direction: Direction::Cw,
        };
        let second = Command::MoveRelative {
            axis: AxisSelector::One(2),
            distance: 3,
            direction: Direction::Ccw,
        };
        assert!(producer.try_push(&first.encode(true)));
        assert!(producer.try_push(&second.encode(true)));

        node.tick();
        assert_eq!(node.registry().get(1).unwrap().target, 3);
        assert_eq!(node.registry().get(2).unwrap().target, 0);
        // Axis 1 took its first step in the same tick.
        assert_eq!(node.registry().get(1).unwrap().current, 1);

        node.tick();
        assert_eq!(node.registry().get(2).unwrap().target, -3);
    }

    #[test]
    fn rejected_frames_are_counted_and_skipped() {
        let mut queue = FrameQueue::new();
        let flags = RunningFlags::new();
        let (mut node, mut producer) = setup(&mut queue, &flags);

        assert!(producer.try_push(&[3, 0, 0, 1, 0, 5]));
        let result = node.poll_command();
        assert_eq!(
            result,
            Some(Err(RejectReason::BadChecksum {
                expected: 4,
                found: 5
            }))
        );
        assert_eq!(node.rejected(), 1);
        assert!(!node.is_busy());

        assert!(producer.try_push(&[3, 0, 0, 1, 0, 4]));
        assert_eq!(
            node.poll_command(),
            Some(Ok(Command::MoveTo {
                axis: AxisSelector::One(0),
                position: 0,
                routing: Routing::Fixed(Direction::Cw),
            }))
        );
        assert_eq!(node.poll_command(), None);
    }

    #[test]
    fn flags_clear_once_all_axes_arrive() {
        let mut queue = FrameQueue::new();
        let flags = RunningFlags::new();
        let (mut node, mut producer) = setup(&mut queue, &flags);

        let cmd = Command::MoveTo {
            axis: AxisSelector::All,
            position: 5,
            routing: Routing::Shortest,
        };
        assert!(producer.try_push(&cmd.encode(true)));

        node.tick();
        assert_eq!(flags.bitmap(), 0xFF);
        for _ in 0..4 {
            node.tick();
        }
        assert_eq!(flags.bitmap(), 0);
        assert!(!node.is_busy());
        assert!(node.registry().iter().all(|axis| axis.current == 5));
    }

    #[test]
    fn enable_command_reaches_the_enable_line() {
        let mut queue = FrameQueue::new();
        let flags = RunningFlags::new();
        let (mut node, mut producer) = setup(&mut queue, &flags);

        let cmd = Command::SetDriverEnabled { enabled: true };
        assert!(producer.try_push(&cmd.encode(true)));
        node.tick();
        assert!(node.dispatcher().enable_line().enabled);
    }
}
