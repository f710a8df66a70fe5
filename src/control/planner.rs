// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Circular motion planning.
//!
//! A hand's position only matters modulo one revolution, so an absolute move is planned as a
//! signed step count from the current position: pick a direction, measure the distance to the next
//! occurrence of the target that way, then pad with whole revolutions where the command asks for
//! them. The result is handed to the motion primitive as a new absolute target; the planner never
//! steps a motor itself.
//!
//! Shortest-path ties (target exactly half a revolution away) go clockwise.

use crate::config;
use crate::motors::MotionPrimitive;
use crate::protocol::{Direction, Routing};

/// Direction plus unsigned step count.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct Route {
    pub direction: Direction,
    pub steps: i32,
}

impl Route {
    #[inline]
    pub fn new(direction: Direction, steps: i32) -> Self {
        Self { direction, steps }
    }

    /// Signed step delta.
    #[inline]
    pub fn displacement(&self) -> i32 {
        self.steps * self.direction.sign()
    }
}

/// Distance from `from` to the next occurrence of `to` travelling in `direction`. Always in
/// `0..steps_per_rev`.
#[inline]
pub fn directed_distance(from: i32, to: i32, direction: Direction, steps_per_rev: i32) -> i32 {
    match direction {
        Direction::Cw => (to - from).rem_euclid(steps_per_rev),
        Direction::Ccw => (from - to).rem_euclid(steps_per_rev),
    }
}

/// Shorter way round. Exactly half a revolution resolves clockwise.
pub fn shortest_route(from: i32, to: i32, steps_per_rev: i32) -> Route {
    let cw = directed_distance(from, to, Direction::Cw, steps_per_rev);
    if cw <= steps_per_rev / 2 {
        Route::new(Direction::Cw, cw)
    } else {
        Route::new(Direction::Ccw, steps_per_rev - cw)
    }
}

/// Fixed-direction route plus `extra_revs` whole laps.
pub fn extra_revolutions_route(
    from: i32,
    to: i32,
    direction: Direction,
    extra_revs: u8,
    steps_per_rev: i32,
) -> Route {
    let base = directed_distance(from, to, direction, steps_per_rev);
    Route::new(direction, base + extra_revs as i32 * steps_per_rev)
}

/// Fixed-direction route padded with whole laps until it is at least `min_steps` long.
pub fn min_steps_route(
    from: i32,
    to: i32,
    direction: Direction,
    min_steps: u16,
    steps_per_rev: i32,
) -> Route {
    let base = directed_distance(from, to, direction, steps_per_rev);
    let min_steps = min_steps as i32;
    if base >= min_steps {
        return Route::new(direction, base);
    }
    let laps = (min_steps - base + steps_per_rev - 1) / steps_per_rev;
    Route::new(direction, base + laps * steps_per_rev)
}

/// Applies move requests to a single axis.
#[derive(Copy, Clone, Debug)]
pub struct MotionPlanner {
    steps_per_rev: i32,
}

impl MotionPlanner {
    pub const fn new(steps_per_rev: i32) -> Self {
        Self { steps_per_rev }
    }

    #[inline]
    pub fn steps_per_rev(&self) -> i32 {
        self.steps_per_rev
    }

    /// Position within one revolution.
    #[inline]
    pub fn wrap(&self, position: i32) -> i32 {
        position.rem_euclid(self.steps_per_rev)
    }

    /// Absolute move along the requested routing.
    pub fn move_to<M: MotionPrimitive>(
        &self,
        axis: &mut M,
        position: i16,
        routing: Routing,
    ) -> Route {
        let from = self.origin(axis);
        let to = position as i32;
        let route = match routing {
            Routing::Shortest => shortest_route(from, to, self.steps_per_rev),
            Routing::Fixed(direction) => Route::new(
                direction,
                directed_distance(from, to, direction, self.steps_per_rev),
            ),
        };
        self.apply(axis, route)
    }

    /// Absolute move with whole extra laps before landing.
    pub fn move_to_extra_revolutions<M: MotionPrimitive>(
        &self,
        axis: &mut M,
        position: i16,
        direction: Direction,
        extra_revs: u8,
    ) -> Route {
        let from = self.origin(axis);
        let route = extra_revolutions_route(
            from,
            position as i32,
            direction,
            extra_revs,
            self.steps_per_rev,
        );
        self.apply(axis, route)
    }

    /// Absolute move that travels at least `min_steps`.
    pub fn move_to_min_steps<M: MotionPrimitive>(
        &self,
        axis: &mut M,
        position: i16,
        direction: Direction,
        min_steps: u16,
    ) -> Route {
        let from = self.origin(axis);
        let route = min_steps_route(
            from,
            position as i32,
            direction,
            min_steps,
            self.steps_per_rev,
        );
        self.apply(axis, route)
    }

    /// Free displacement from the current target (or position, when idle). Not tied to the clock
    /// face, so repeated moves may leave the hand anywhere.
    pub fn move_relative<M: MotionPrimitive>(
        &self,
        axis: &mut M,
        distance: u16,
        direction: Direction,
    ) {
        let base = self.relative_base(axis);
        axis.move_to(base.saturating_add(distance as i32 * direction.sign()));
    }

    /// Small nudge, stacked like a relative move. The master repeats the command with
    /// alternating directions to make the hand oscillate.
    pub fn wiggle<M: MotionPrimitive>(&self, axis: &mut M, distance: u16, direction: Direction) {
        self.move_relative(axis, distance, direction);
    }

    pub fn stop<M: MotionPrimitive>(&self, axis: &mut M) {
        axis.stop();
    }

    pub fn set_max_speed<M: MotionPrimitive>(&self, axis: &mut M, speed: u16) {
        axis.set_max_speed(speed as f32);
    }

    pub fn set_acceleration<M: MotionPrimitive>(&self, axis: &mut M, accel: u16) {
        axis.set_acceleration(accel as f32);
    }

    /// Power-on setup: default limits, assume the hand rests at the default position, and sweep
    /// it to 12 o'clock in `direction`.
    pub fn home<M: MotionPrimitive>(&self, axis: &mut M, direction: Direction) -> Route {
        axis.set_max_speed(config::DEFAULT_MAX_SPEED);
        axis.set_acceleration(config::DEFAULT_ACCELERATION);
        let start = (self.steps_per_rev as f32 * config::DEFAULT_POSITION_FRACTION) as i32;
        axis.set_current_position(start);
        self.move_to(axis, 0, Routing::Fixed(direction))
    }

    /// Starting point for an absolute move. An idle axis is rebased into the first revolution so
    /// absolute step counts stay small; a moving one is left alone.
    fn origin<M: MotionPrimitive>(&self, axis: &mut M) -> i32 {
        let current = axis.current_position();
        if !axis.is_running() && current != self.wrap(current) {
            axis.set_current_position(self.wrap(current));
        }
        axis.current_position()
    }

    /// Base for a relative move: the pending target while running, otherwise the rebased
    /// position.
    fn relative_base<M: MotionPrimitive>(&self, axis: &mut M) -> i32 {
        if axis.is_running() {
            axis.target_position()
        } else {
            self.origin(axis)
        }
    }

    fn apply<M: MotionPrimitive>(&self, axis: &mut M, route: Route) -> Route {
        let target = axis.current_position() + route.displacement();
        axis.move_to(target);
        route
    }
}

impl Default for MotionPlanner {
    fn default() -> Self {
        Self::new(config::STEPS_PER_REVOLUTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motors::testing::FakeAxis;

    const N: i32 = 4320;

    fn planner() -> MotionPlanner {
        MotionPlanner::new(N)
    }

    fn samples() -> impl Iterator<Item = i32> {
        (0..N).step_by(97).chain([0, 1, N / 2 - 1, N / 2, N / 2 + 1, N - 1])
    }

    #[test]
    fn directed_distance_stays_within_one_revolution() {
        assert_eq!(directed_distance(100, 200, Direction::Cw, N), 100);
        assert_eq!(directed_distance(100, 200, Direction::Ccw, N), N - 100);
        assert_eq!(directed_distance(200, 200, Direction::Cw, N), 0);
        assert_eq!(directed_distance(200, 200, Direction::Ccw, N), 0);
        assert_eq!(directed_distance(10, -10, Direction::Ccw, N), 20);
        assert_eq!(directed_distance(10, N + 30, Direction::Cw, N), 20);
    }

    #[test]
    fn shortest_never_takes_the_long_way() {
        for from in samples() {
            for to in samples() {
                let route = shortest_route(from, to, N);
                let other = N - route.steps;
                assert!(route.steps <= N / 2, "{} -> {}: {:?}", from, to, route);
                assert!(other >= N / 2 || route.steps == 0);
                assert_eq!((from + route.displacement()).rem_euclid(N), to.rem_euclid(N));
            }
        }
    }

    #[test]
    fn shortest_tie_goes_clockwise() {
        // Hand at 6 o'clock heading to 12 o'clock.
        assert_eq!(shortest_route(2160, 0, N), Route::new(Direction::Cw, 2160));
        assert_eq!(shortest_route(0, 2160, N), Route::new(Direction::Cw, 2160));
    }

    #[test]
    fn shortest_picks_counter_clockwise_when_shorter() {
        assert_eq!(shortest_route(100, N - 100, N), Route::new(Direction::Ccw, 200));
        assert_eq!(shortest_route(N - 100, 100, N), Route::new(Direction::Cw, 200));
    }

    #[test]
    fn extra_revolutions_add_whole_laps() {
        let route = extra_revolutions_route(100, 200, Direction::Cw, 2, N);
        assert_eq!(route, Route::new(Direction::Cw, 100 + 2 * N));
        assert_eq!(route.steps, 8740);

        let route = extra_revolutions_route(100, 200, Direction::Ccw, 1, N);
        assert_eq!(route, Route::new(Direction::Ccw, N - 100 + N));
    }

    #[test]
    fn min_steps_floor() {
        for from in samples() {
            for to in samples() {
                for min in [0u16, 1, 500, 4319, 4320, 4321, 9000, u16::MAX] {
                    for dir in [Direction::Cw, Direction::Ccw] {
                        let base = directed_distance(from, to, dir, N);
                        let route = min_steps_route(from, to, dir, min, N);
                        assert!(route.steps >= min as i32);
                        assert_eq!((route.steps - base) % N, 0);
                        // No more padding than needed.
                        assert!(route.steps - N < min as i32 || route.steps == base);
                    }
                }
            }
        }
    }

    #[test]
    fn end_to_end_tie_lands_on_twelve() {
        let mut axis = FakeAxis::at(2160);
        let route = planner().move_to(&mut axis, 0, Routing::Shortest);
        assert_eq!(route, Route::new(Direction::Cw, 2160));
        assert_eq!(axis.run_to_completion(), 2160);
        assert_eq!(planner().wrap(axis.current), 0);
    }

    #[test]
    fn end_to_end_extra_revolutions() {
        let mut axis = FakeAxis::at(100);
        planner().move_to_extra_revolutions(&mut axis, 200, Direction::Cw, 2);
        assert_eq!(axis.target - axis.current, 8740);
        axis.run_to_completion();
        assert_eq!(planner().wrap(axis.current), 200);
    }

    #[test]
    fn move_to_family_lands_exactly() {
        let p = planner();
        for start in [0, 1, 2160, 4000, -300, 3 * N + 17] {
            for position in [0i16, 1, 1080, 2160, 4319, -1, 5000] {
                let expected = p.wrap(position as i32);

                let mut axis = FakeAxis::at(start);
                p.move_to(&mut axis, position, Routing::Shortest);
                axis.run_to_completion();
                assert_eq!(p.wrap(axis.current), expected);

                let mut axis = FakeAxis::at(start);
                p.move_to(&mut axis, position, Routing::Fixed(Direction::Ccw));
                axis.run_to_completion();
                assert_eq!(p.wrap(axis.current), expected);

                let mut axis = FakeAxis::at(start);
                p.move_to_extra_revolutions(&mut axis, position, Direction::Ccw, 3);
                axis.run_to_completion();
                assert_eq!(p.wrap(axis.current), expected);

                let mut axis = FakeAxis::at(start);
                p.move_to_min_steps(&mut axis, position, Direction::Cw, 7000);
                axis.run_to_completion();
                assert_eq!(p.wrap(axis.current), expected);
            }
        }
    }

    #[test]
    fn fixed_direction_moves_the_right_way() {
        let mut axis = FakeAxis::at(1000);
        p_move(&mut axis, 900, Direction::Cw);
        assert_eq!(axis.target, 1000 + N - 100);

        let mut axis = FakeAxis::at(1000);
        p_move(&mut axis, 1100, Direction::Ccw);
        assert_eq!(axis.target, 1000 - (N - 100));

        let mut axis = FakeAxis::at(1000);
        p_move(&mut axis, 1000, Direction::Ccw);
        assert_eq!(axis.target, 1000);
    }

    fn p_move(axis: &mut FakeAxis, position: i16, direction: Direction) {
        planner().move_to(axis, position, Routing::Fixed(direction));
    }

    #[test]
    fn idle_axis_is_rebased_before_absolute_move() {
        let mut axis = FakeAxis::at(5 * N + 10);
        planner().move_to(&mut axis, 20, Routing::Shortest);
        assert_eq!(axis.current, 10);
        assert_eq!(axis.target, 20);
    }

    #[test]
    fn moving_axis_is_routed_from_its_current_position() {
        let mut axis = FakeAxis::at(N + 10);
        axis.target = N + 500;
        planner().move_to(&mut axis, 0, Routing::Shortest);
        assert_eq!(axis.current, N + 10);
        assert_eq!(axis.target, N);
    }

    #[test]
    fn relative_move_accumulates_on_target() {
        let p = planner();
        let mut axis = FakeAxis::at(0);
        p.move_relative(&mut axis, 300, Direction::Cw);
        assert_eq!(axis.target, 300);
        axis.advance();
        // Still running: stacks on top of the pending target.
        p.move_relative(&mut axis, 50, Direction::Ccw);
        assert_eq!(axis.target, 250);

        axis.run_to_completion();
        p.move_relative(&mut axis, 5000, Direction::Cw);
        assert_eq!(axis.target, 5250);
    }

    #[test]
    fn wiggle_stacks_on_pending_target() {
        let p = planner();
        let mut axis = FakeAxis::at(100);
        axis.target = 400;
        p.wiggle(&mut axis, 20, Direction::Cw);
        assert_eq!(axis.target, 420);

        axis.run_to_completion();
        p.wiggle(&mut axis, 20, Direction::Ccw);
        assert_eq!(axis.target, 400);
    }

    #[test]
    fn relative_moves_rebase_idle_axis() {
        let p = planner();
        let mut axis = FakeAxis::at(i32::MAX - 50);
        let rebased = p.wrap(i32::MAX - 50);

        p.move_relative(&mut axis, 100, Direction::Cw);
        assert_eq!(axis.current, rebased);
        assert_eq!(axis.target, rebased + 100);

        let mut axis = FakeAxis::at(i32::MIN + 10);
        let rebased = p.wrap(i32::MIN + 10);
        p.wiggle(&mut axis, 30, Direction::Ccw);
        assert_eq!(axis.current, rebased);
        assert_eq!(axis.target, rebased - 30);
    }

    #[test]
    fn relative_moves_on_running_axis_saturate() {
        let p = planner();
        let mut axis = FakeAxis::at(0);
        axis.target = i32::MAX - 10;
        p.move_relative(&mut axis, 100, Direction::Cw);
        assert_eq!(axis.target, i32::MAX);
        // Still moving: the in-flight position is left alone.
        assert_eq!(axis.current, 0);
    }

    #[test]
    fn limits_and_stop_are_forwarded() {
        let p = planner();
        let mut axis = FakeAxis::at(0);
        p.set_max_speed(&mut axis, 900);
        p.set_acceleration(&mut axis, 120);
        p.stop(&mut axis);
        assert_eq!(axis.max_speed, 900.0);
        assert_eq!(axis.acceleration, 120.0);
        assert_eq!(axis.stops, 1);
    }

    #[test]
    fn homing_sweeps_from_six_oclock() {
        let p = planner();
        let mut minute = FakeAxis::at(0);
        let mut hour = FakeAxis::at(0);

        assert_eq!(p.home(&mut minute, Direction::Cw), Route::new(Direction::Cw, 2160));
        assert_eq!(p.home(&mut hour, Direction::Ccw), Route::new(Direction::Ccw, 2160));
        assert_eq!((minute.current, minute.target), (2160, 4320));
        assert_eq!((hour.current, hour.target), (2160, 0));
        assert_eq!(minute.max_speed, config::DEFAULT_MAX_SPEED);
        assert_eq!(hour.acceleration, config::DEFAULT_ACCELERATION);
    }
}
