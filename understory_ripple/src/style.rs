// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed style declarations handed to the [`Host`](crate::host::Host).
//!
//! The crate never builds style strings. It describes each change as a
//! [`Property`] and lets the host translate it into whatever its style system
//! understands (CSS, a retained scene graph, a test record).

use core::time::Duration;

/// Box generation mode. Scaffold and ripple surfaces are always blocks.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Display {
    /// Block-level box.
    Block,
}

/// Positioning scheme, as resolved by the host's style system.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Position {
    /// Normal flow.
    Static,
    /// Normal flow; establishes a containing block for absolute children.
    Relative,
    /// Out of flow, positioned against the nearest containing block.
    Absolute,
    /// Positioned against the viewport.
    Fixed,
    /// Normal flow until a scroll threshold.
    Sticky,
}

impl Position {
    /// Whether absolutely positioned children anchor to this box.
    ///
    /// Only `relative` and `absolute` are accepted as anchors; anything else
    /// gets forced to `relative` by the scaffold.
    pub fn anchors_overlay(self) -> bool {
        matches!(self, Self::Relative | Self::Absolute)
    }
}

/// Overflow handling of the wrapper.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Overflow {
    /// Clip ripples to the wrapper box.
    Hidden,
    /// Let ripples spill past the wrapper box.
    Visible,
}

/// Corner rounding of a surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BorderRadius {
    /// Follow the parent's corner radii.
    Inherit,
    /// Full circle (`50%`).
    Circle,
}

/// Whether a surface takes part in hit testing.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointerEvents {
    /// Default hit testing.
    Auto,
    /// Never the target of pointer input.
    None,
}

/// Property animated by a [`Transition`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Animated {
    /// Surface opacity.
    Opacity,
    /// Surface transform.
    Transform,
}

/// One entry of a transition list.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition<'a> {
    /// Property the transition applies to.
    pub property: Animated,
    /// Transition length.
    pub duration: Duration,
    /// Timing function, passed through verbatim.
    pub easing: &'a str,
    /// Delay before the transition starts.
    pub delay: Duration,
}

/// A single style declaration applied to one host element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Property<'a> {
    /// `display`.
    Display(Display),
    /// `position`.
    Position(Position),
    /// `top`, `right`, `bottom` and `left`, all set to the same length.
    Inset(f64),
    /// `left`, in pixels.
    Left(f64),
    /// `top`, in pixels.
    Top(f64),
    /// `width`, in pixels.
    Width(f64),
    /// `height`, in pixels.
    Height(f64),
    /// `border-radius`.
    BorderRadius(BorderRadius),
    /// `color`.
    Color(&'a str),
    /// `background-color`.
    BackgroundColor(&'a str),
    /// `overflow`.
    Overflow(Overflow),
    /// `pointer-events`.
    PointerEvents(PointerEvents),
    /// `opacity`.
    Opacity(f64),
    /// A transform that centers the box on its `left`/`top` point and scales it.
    ///
    /// Equivalent to `translate(-50%, -50%) scale(s)`.
    CenteredScale(f64),
    /// `transition`, one entry per animated property.
    Transition(&'a [Transition<'a>]),
}

impl Property<'_> {
    /// Name of the declaration in CSS terms, for hosts that key styles by name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Display(_) => "display",
            Self::Position(_) => "position",
            Self::Inset(_) => "inset",
            Self::Left(_) => "left",
            Self::Top(_) => "top",
            Self::Width(_) => "width",
            Self::Height(_) => "height",
            Self::BorderRadius(_) => "border-radius",
            Self::Color(_) => "color",
            Self::BackgroundColor(_) => "background-color",
            Self::Overflow(_) => "overflow",
            Self::PointerEvents(_) => "pointer-events",
            Self::Opacity(_) => "opacity",
            Self::CenteredScale(_) => "transform",
            Self::Transition(_) => "transition",
        }
    }
}
