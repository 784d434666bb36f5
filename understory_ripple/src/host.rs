// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The host boundary: everything the ripple needs from the surrounding UI.
//!
//! ## Overview
//!
//! The crate does not own an element tree, a style engine, an event loop or a
//! clock. It reaches all of these through [`Host`], which a toolkit implements
//! once over its own element handles. [`HeadlessHost`](crate::headless::HeadlessHost)
//! is an in-memory implementation for tests and tooling.
//!
//! ## Driving contract
//!
//! A host that runs an effect is expected to:
//!
//! 1. Deliver events from the listeners the effect registered through
//!    [`Host::add_listener`] to [`RippleEffect::handle_event`](crate::RippleEffect::handle_event).
//! 2. Call [`RippleEffect::animation_frame`](crate::RippleEffect::animation_frame)
//!    once per rendering frame after [`Host::request_animation_frame`] was called.
//! 3. Call [`RippleEffect::fire_timers`](crate::RippleEffect::fire_timers) once
//!    [`Host::now`] reaches [`RippleEffect::next_deadline`](crate::RippleEffect::next_deadline).

use core::fmt::Debug;
use core::hash::Hash;
use core::time::Duration;

use kurbo::Rect;

use crate::style::{Position, Property};

/// Where a listener is registered.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventTarget<E> {
    /// A specific element.
    Element(E),
    /// The top-level window; receives every release regardless of where it happened.
    Window,
}

/// Input event types the effect listens for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EventKind {
    /// Mouse button pressed.
    MouseDown,
    /// Mouse button released.
    MouseUp,
    /// Touch contact started.
    TouchStart,
    /// Touch contact ended.
    TouchEnd,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Pointer entered the element.
    MouseEnter,
    /// Pointer left the element.
    MouseLeave,
}

/// Host-assigned identity of a registered listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a host-side listener handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The host-side handle.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Element, style, event and timing services of the surrounding UI.
pub trait Host {
    /// Handle to a host element. Cheap to copy; equality is identity.
    type Element: Copy + Eq + Hash + Debug;

    /// Whether `element` refers to a live element this host can style and insert.
    fn is_element(&self, element: &Self::Element) -> bool;

    /// Create a detached, unstyled element.
    fn create_element(&mut self) -> Self::Element;

    /// Insert `child` as the first child of `parent`.
    fn prepend_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Insert `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Element, child: Self::Element);

    /// Detach `element` (and its subtree) from its parent.
    ///
    /// Removing an element that is already detached is a no-op.
    fn remove_element(&mut self, element: Self::Element);

    /// Apply one style declaration to `element`.
    fn set_property(&mut self, element: Self::Element, property: Property<'_>);

    /// Apply several declarations in order.
    fn set_properties(&mut self, element: Self::Element, properties: &[Property<'_>]) {
        for property in properties {
            self.set_property(element, *property);
        }
    }

    /// The resolved `position` of `element`.
    fn computed_position(&self, element: Self::Element) -> Position;

    /// The border box of `element` in client coordinates.
    fn bounding_rect(&self, element: Self::Element) -> Rect;

    /// Start delivering `kind` events on `target` to the effect.
    fn add_listener(&mut self, target: EventTarget<Self::Element>, kind: EventKind) -> ListenerId;

    /// Stop delivering events for a listener returned by [`Host::add_listener`].
    fn remove_listener(&mut self, id: ListenerId);

    /// Called once a removed ripple element will never be used again.
    ///
    /// Hosts that pool or arena-allocate elements can reclaim it here.
    fn release_element(&mut self, element: Self::Element) {
        let _ = element;
    }

    /// Monotonic time used for ripple timers.
    fn now(&self) -> Duration;

    /// Ask for a call to [`RippleEffect::animation_frame`](crate::RippleEffect::animation_frame)
    /// at the next rendering frame.
    fn request_animation_frame(&mut self);
}
