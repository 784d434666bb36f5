// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced synchronously by [`RippleEffect`](crate::RippleEffect).
//!
//! Both kinds are reported before the host is touched, so a failed call never
//! leaves a partially built scaffold or a half-inserted ripple behind.

/// Which coordinate of a ripple request was rejected.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Axis {
    /// The horizontal contact coordinate.
    X,
    /// The vertical contact coordinate.
    Y,
    /// The covering diameter derived from the contact point and wrapper box.
    Size,
}

impl core::fmt::Display for Axis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Size => "size",
        })
    }
}

/// Failures reported by ripple construction and triggering.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RippleError {
    /// The host does not recognize the target as a live element.
    #[error("target is not a live host element")]
    InvalidTarget,
    /// A ripple was requested with a non-numeric coordinate or size.
    #[error("ripple {axis} must be a valid number")]
    InvalidCoordinate {
        /// The rejected coordinate.
        axis: Axis,
    },
}
