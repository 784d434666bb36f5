// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scaffold builder: the wrapper and hover layer owned by an instance.
//!
//! ```text
//! target
//! └── wrapper        (first child; covers target, clips ripples, ignores pointers)
//!     ├── hover layer (first child; full cover, opacity 0 or configured)
//!     └── ripples…    (appended as they enter)
//! ```
//!
//! If the target's resolved position cannot anchor an absolute overlay it is
//! forced to `relative`. That change stays after the instance is destroyed.

use core::time::Duration;

use crate::host::Host;
use crate::options::{ResolvedOptions, RippleFlags};
use crate::style::{
    Animated, BorderRadius, Display, Overflow, PointerEvents, Position, Property, Transition,
};

#[derive(Copy, Clone, Debug)]
pub(crate) struct Scaffold<E> {
    pub(crate) wrapper: E,
    pub(crate) hover_layer: E,
}

pub(crate) fn build<H: Host>(
    host: &mut H,
    target: H::Element,
    options: &ResolvedOptions<H::Element>,
) -> Scaffold<H::Element> {
    let wrapper = host.create_element();
    host.set_properties(
        wrapper,
        &[
            Property::Display(Display::Block),
            Property::Position(Position::Absolute),
            Property::Inset(0.0),
            Property::BorderRadius(if options.flags.contains(RippleFlags::ROUNDED) {
                BorderRadius::Circle
            } else {
                BorderRadius::Inherit
            }),
            Property::Color(&options.color),
            Property::Overflow(if options.flags.contains(RippleFlags::UNBOUNDED) {
                Overflow::Visible
            } else {
                Overflow::Hidden
            }),
            Property::PointerEvents(PointerEvents::None),
        ],
    );
    host.prepend_child(target, wrapper);

    let hover_layer = host.create_element();
    let fade = [Transition {
        property: Animated::Opacity,
        duration: options.fade_time(),
        easing: &options.easing,
        delay: Duration::ZERO,
    }];
    host.set_properties(
        hover_layer,
        &[
            Property::Display(Display::Block),
            Property::Position(Position::Absolute),
            Property::Inset(0.0),
            Property::BackgroundColor("currentColor"),
            Property::Opacity(0.0),
            Property::Transition(&fade),
        ],
    );
    host.prepend_child(wrapper, hover_layer);

    if !host.computed_position(target).anchors_overlay() {
        host.set_property(target, Property::Position(Position::Relative));
    }

    Scaffold {
        wrapper,
        hover_layer,
    }
}
