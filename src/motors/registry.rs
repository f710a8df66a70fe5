// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Fixed set of axes driven by one node.
//!
//! Axes are stored in wiring order: minute hands first, then hour hands. Index `i` is also bit `i`
//! of the status bitmap.

use crate::config::NUM_MINUTE_AXES;
use crate::motors::MotionPrimitive;
use crate::protocol::AxisSelector;
use crate::status::RunningFlags;

/// Axis index that does not exist on this node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(target_os = "none", derive(defmt::Format))]
pub struct UnknownAxis(pub u8);

pub struct AxisRegistry<M, const N: usize> {
    axes: [M; N],
}

impl<M: MotionPrimitive, const N: usize> AxisRegistry<M, N> {
    pub fn new(axes: [M; N]) -> Self {
        Self { axes }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&M> {
        self.axes.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut M> {
        self.axes.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &M> {
        self.axes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut M> {
        self.axes.iter_mut()
    }

    /// Resolve a selector to the axes it addresses, in index order.
    pub fn select_mut(&mut self, selector: AxisSelector) -> Result<&mut [M], UnknownAxis> {
        match selector {
            AxisSelector::All => Ok(&mut self.axes[..]),
            AxisSelector::One(id) => {
                let i = id as usize;
                self.axes.get_mut(i..=i).ok_or(UnknownAxis(id))
            }
        }
    }

    pub fn minute_axes_mut(&mut self) -> &mut [M] {
        let split = NUM_MINUTE_AXES.min(N);
        &mut self.axes[..split]
    }

    pub fn hour_axes_mut(&mut self) -> &mut [M] {
        let split = NUM_MINUTE_AXES.min(N);
        &mut self.axes[split..]
    }

    /// Give every axis one chance to step, then publish its running state.
    pub fn advance_all(&mut self, flags: &RunningFlags<N>) {
        for (i, axis) in self.axes.iter_mut().enumerate() {
            let running = axis.advance();
            flags.publish(i, running);
        }
    }

    /// Publish running state without stepping.
    pub fn publish(&self, flags: &RunningFlags<N>) {
        for (i, axis) in self.axes.iter().enumerate() {
            flags.publish(i, axis.is_running());
        }
    }
}
