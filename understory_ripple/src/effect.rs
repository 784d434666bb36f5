// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The effect instance: scaffold, listeners, ripples and teardown.
//!
//! ## Lifecycle
//!
//! [`RippleEffect::new`] builds the scaffold, registers the trigger listeners
//! and records one teardown action per side effect. [`RippleEffect::destroy`]
//! runs those actions exactly once, in order; calling it again does nothing.
//!
//! Destroying does not cancel ripples already in flight. Their timers keep
//! running if the host keeps driving the instance, and they detach their own
//! elements when done. [`RippleEffect::trigger`] also keeps working after
//! destroy; the ripple just lands in a detached wrapper.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;
use core::time::Duration;

use kurbo::Point;
use smallvec::SmallVec;

use crate::error::{Axis, RippleError};
use crate::geometry::{RippleGeometry, cover_diameter};
use crate::host::{EventKind, EventTarget, Host, ListenerId};
use crate::input::{PendingRelease, TOUCHSCREEN, TouchFlag};
use crate::options::{ResolvedOptions, RippleFlags, RippleOptions};
use crate::ripple::{ExitPolicy, Ripple, RippleEvent, RippleId, RipplePhase};
use crate::scaffold;

/// One reversible side effect of construction.
#[derive(Copy, Clone, Debug)]
enum Teardown<E> {
    Unlisten(ListenerId),
    Detach(E),
}

/// A ripple effect attached to one target element.
pub struct RippleEffect<E> {
    pub(crate) target: E,
    pub(crate) wrapper: E,
    pub(crate) hover_layer: E,
    pub(crate) options: ResolvedOptions<E>,
    pub(crate) touch: &'static TouchFlag,
    pub(crate) listeners: SmallVec<[(ListenerId, EventKind); 5]>,
    pub(crate) pending: Vec<PendingRelease>,
    pub(crate) ripples: Vec<Ripple<E>>,
    pub(crate) backlog: Vec<RippleEvent>,
    pub(crate) hovered: bool,
    next_id: u64,
    teardown: Vec<Teardown<E>>,
    destroyed: bool,
}

impl<E: Debug> Debug for RippleEffect<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RippleEffect")
            .field("target", &self.target)
            .field("wrapper", &self.wrapper)
            .field("listeners", &self.listeners.len())
            .field("ripples", &self.ripples.len())
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + Hash + Debug> RippleEffect<E> {
    /// Attach a new effect to `target`.
    ///
    /// Fails with [`RippleError::InvalidTarget`] before touching the host if
    /// `target` is not a live element. Instances built here share the
    /// process-wide [`TOUCHSCREEN`] flag.
    pub fn new<H: Host<Element = E>>(
        host: &mut H,
        target: E,
        options: RippleOptions<E>,
    ) -> Result<Self, RippleError> {
        Self::with_touch_flag(host, target, options, &TOUCHSCREEN)
    }

    /// Like [`RippleEffect::new`], consulting `touch` instead of the shared flag.
    pub fn with_touch_flag<H: Host<Element = E>>(
        host: &mut H,
        target: E,
        options: RippleOptions<E>,
        touch: &'static TouchFlag,
    ) -> Result<Self, RippleError> {
        if !host.is_element(&target) {
            return Err(RippleError::InvalidTarget);
        }
        let options = options.resolve(target);
        let scaffold = scaffold::build(host, target, &options);

        let mut kinds: SmallVec<[EventKind; 5]> = SmallVec::new();
        if options.flags.contains(RippleFlags::KEYDOWN) {
            kinds.push(EventKind::KeyDown);
        }
        kinds.extend([
            EventKind::MouseDown,
            EventKind::TouchStart,
            EventKind::MouseEnter,
            EventKind::MouseLeave,
        ]);
        let trigger = EventTarget::Element(options.trigger);
        let listeners: SmallVec<[(ListenerId, EventKind); 5]> = kinds
            .into_iter()
            .map(|kind| (host.add_listener(trigger, kind), kind))
            .collect();

        let mut teardown: Vec<Teardown<E>> =
            listeners.iter().map(|&(id, _)| Teardown::Unlisten(id)).collect();
        teardown.push(Teardown::Detach(scaffold.wrapper));

        log::debug!(
            "ripple effect attached to {target:?} (trigger {:?}, {} listeners)",
            options.trigger,
            listeners.len()
        );
        Ok(Self {
            target,
            wrapper: scaffold.wrapper,
            hover_layer: scaffold.hover_layer,
            options,
            touch,
            listeners,
            pending: Vec::new(),
            ripples: Vec::new(),
            backlog: Vec::new(),
            hovered: false,
            next_id: 0,
            teardown,
            destroyed: false,
        })
    }

    /// The element the effect belongs to.
    pub fn target(&self) -> E {
        self.target
    }

    /// The element whose events drive the effect.
    pub fn trigger_element(&self) -> E {
        self.options.trigger
    }

    /// The overlay inserted as the target's first child.
    pub fn wrapper(&self) -> E {
        self.wrapper
    }

    /// The hover highlight inside the wrapper.
    pub fn hover_layer(&self) -> E {
        self.hover_layer
    }

    /// The resolved configuration.
    pub fn options(&self) -> &ResolvedOptions<E> {
        &self.options
    }

    /// Whether the pointer is over the trigger.
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether [`destroy`](Self::destroy) has run.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Current phase of a ripple, or `None` once it has been removed.
    pub fn ripple_phase(&self, id: RippleId) -> Option<RipplePhase> {
        self.ripple(id).map(|r| r.phase)
    }

    /// Host element of a live ripple.
    pub fn ripple_element(&self, id: RippleId) -> Option<E> {
        self.ripple(id).map(|r| r.element)
    }

    /// Geometry a live ripple was spawned with.
    pub fn ripple_geometry(&self, id: RippleId) -> Option<RippleGeometry> {
        self.ripple(id).map(|r| r.geometry)
    }

    /// Live ripples and their phases, oldest first.
    pub fn ripples(&self) -> impl Iterator<Item = (RippleId, RipplePhase)> + '_ {
        self.ripples.iter().map(|r| (r.id, r.phase))
    }

    fn ripple(&self, id: RippleId) -> Option<&Ripple<E>> {
        self.ripples.iter().find(|r| r.id == id)
    }

    /// Spawn a ripple at wrapper-relative `(x, y)`.
    ///
    /// The ripple is created and styled right away and inserted on the next
    /// animation frame. Fails with [`RippleError::InvalidCoordinate`] before
    /// any host mutation if `x`, `y` or the derived diameter is NaN.
    pub fn trigger<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        x: f64,
        y: f64,
        policy: ExitPolicy,
    ) -> Result<RippleId, RippleError> {
        if x.is_nan() {
            return Err(RippleError::InvalidCoordinate { axis: Axis::X });
        }
        if y.is_nan() {
            return Err(RippleError::InvalidCoordinate { axis: Axis::Y });
        }
        let origin = Point::new(x, y);
        let size = host.bounding_rect(self.wrapper).size();
        let diameter = cover_diameter(size, origin);
        // `f64::max` drops a NaN operand, so check the box as well.
        if size.width.is_nan() || size.height.is_nan() || diameter.is_nan() {
            return Err(RippleError::InvalidCoordinate { axis: Axis::Size });
        }

        let id = RippleId(self.next_id);
        self.next_id += 1;
        let geometry = RippleGeometry { origin, diameter };
        self.ripples
            .push(Ripple::spawn(host, id, geometry, &self.options, policy));
        host.request_animation_frame();
        Ok(id)
    }

    /// Release a deferred ripple.
    ///
    /// If its hold timer has expired the exit starts now; otherwise it starts
    /// as soon as the timer expires. Timed and removed ripples are unaffected.
    pub fn exit<H: Host<Element = E>>(&mut self, host: &mut H, id: RippleId) -> Vec<RippleEvent> {
        let mut out = Vec::new();
        if let Some(ripple) = self.ripples.iter_mut().find(|r| r.id == id) {
            ripple.release(host, &self.options, &mut out);
        }
        out
    }

    /// Advance every ripple waiting on a frame by one step.
    ///
    /// Call once per rendering frame while [`wants_frame`](Self::wants_frame)
    /// holds; the effect re-requests frames through the host as needed.
    pub fn animation_frame<H: Host<Element = E>>(&mut self, host: &mut H) -> Vec<RippleEvent> {
        let mut out = core::mem::take(&mut self.backlog);
        for ripple in &mut self.ripples {
            ripple.on_frame(host, self.wrapper, &self.options, &mut out);
        }
        if self.wants_frame() {
            host.request_animation_frame();
        }
        out
    }

    /// Fire every timer due at [`Host::now`] and drop removed ripples.
    ///
    /// Timers armed by this call are never fired by it, even when already due
    /// (a zero `duration`); the next call picks them up.
    pub fn fire_timers<H: Host<Element = E>>(&mut self, host: &mut H) -> Vec<RippleEvent> {
        let mut out = core::mem::take(&mut self.backlog);
        let now = host.now();
        for ripple in &mut self.ripples {
            ripple.on_timer(host, &self.options, now, &mut out);
        }
        self.ripples.retain(|r| r.phase != RipplePhase::Removed);
        out
    }

    /// Whether any ripple is waiting on an animation frame.
    pub fn wants_frame(&self) -> bool {
        self.ripples.iter().any(Ripple::wants_frame)
    }

    /// Earliest armed timer, in [`Host::now`] time.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.ripples.iter().filter_map(|r| r.deadline).min()
    }

    /// Remove every trigger listener and the wrapper. Runs at most once.
    pub fn destroy<H: Host<Element = E>>(&mut self, host: &mut H) {
        for task in core::mem::take(&mut self.teardown) {
            match task {
                Teardown::Unlisten(id) => host.remove_listener(id),
                Teardown::Detach(element) => host.remove_element(element),
            }
        }
        self.listeners.clear();
        if !self.destroyed {
            log::debug!("ripple effect on {:?} destroyed", self.target);
        }
        self.destroyed = true;
    }
}
