// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host-facing callbacks: run notices and position write-back.

use alloc::vec::Vec;
use core::fmt;

use kurbo::Point;

/// Outcome of a finished resolver run, shown to the user.
///
/// Superseded runs produce no notice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    /// No pair needed separation on the last iteration.
    Converged {
        /// Iterations performed, including the final quiet one.
        iterations: u32,
    },
    /// The iteration budget ran out with overlaps left.
    NotConverged {
        /// Iterations performed.
        iterations: u32,
    },
}

impl Notice {
    /// Returns `true` for [`Notice::Converged`].
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Self::Converged { .. })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Converged { iterations } => {
                write!(f, "Layout converged after {iterations} iterations")
            }
            Self::NotConverged { iterations } => {
                write!(f, "Layout did not converge within {iterations} iterations")
            }
        }
    }
}

/// Receives the notice at the end of a resolver run.
pub trait Notifier {
    /// Called once per completed run.
    fn notify(&mut self, notice: Notice);
}

impl<F: FnMut(Notice)> Notifier for F {
    fn notify(&mut self, notice: Notice) {
        self(notice);
    }
}

/// Discards every notice.
impl Notifier for () {
    fn notify(&mut self, _: Notice) {}
}

/// Receives positions written back after each iteration.
///
/// Only points that moved during the iteration are reported.
pub trait PositionSink {
    /// Stores the new position of item `index`.
    fn set_position(&mut self, index: usize, position: Point);
}

impl<F: FnMut(usize, Point)> PositionSink for F {
    fn set_position(&mut self, index: usize, position: Point) {
        self(index, position);
    }
}

/// Discards every position.
impl PositionSink for () {
    fn set_position(&mut self, _: usize, _: Point) {}
}

impl PositionSink for [Point] {
    fn set_position(&mut self, index: usize, position: Point) {
        if let Some(slot) = self.get_mut(index) {
            *slot = position;
        }
    }
}

impl PositionSink for Vec<Point> {
    fn set_position(&mut self, index: usize, position: Point) {
        self.as_mut_slice().set_position(index, position);
    }
}
