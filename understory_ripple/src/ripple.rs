// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple lifecycle: the per-ripple state machine.
//!
//! ## Phases
//!
//! ```text
//! Spawned ──frame──▶ Entering ──frame──▶ Holding ──exit──▶ Exiting ──timer──▶ Removed
//! ```
//!
//! - `Spawned`: the element exists with its initial style (opacity 0, scale 0)
//!   but is not in the wrapper yet.
//! - `Entering`: inserted; waiting one more frame so the host commits the
//!   initial style before the target style is set. Collapsing the two frames
//!   lets a transition engine coalesce insertion and expansion into a single
//!   style change, and the ripple would pop in without animating.
//! - `Holding`: expanded to full scale at the configured opacity; the hold
//!   timer (`duration + exit_delay`) is armed.
//! - `Exiting`: opacity set to 0; the removal timer (`duration`) is armed.
//! - `Removed`: detached and handed back through
//!   [`Host::release_element`](crate::host::Host::release_element).
//!
//! A timer whose deadline does not fit in a [`Duration`] is never armed, so
//! the ripple stays in its phase.
//!
//! Phases only move forward. A ripple advances at most one frame step per
//! call to [`RippleEffect::animation_frame`](crate::RippleEffect::animation_frame).
//!
//! ## Exit policies
//!
//! With [`ExitPolicy::Timed`] the hold timer starts the exit directly.
//! With [`ExitPolicy::Deferred`] the hold timer only makes the exit available
//! (reported as [`RippleEvent::ExitReady`]); the exit starts once the ripple is
//! released, through [`RippleEffect::exit`](crate::RippleEffect::exit) or a
//! release event. A release that arrives early is remembered, see
//! [`PressState`].

use alloc::vec::Vec;
use core::time::Duration;

use crate::geometry::RippleGeometry;
use crate::host::Host;
use crate::input::PressState;
use crate::options::ResolvedOptions;
use crate::style::{Animated, BorderRadius, Display, Position, Property, Transition};

/// Identifier of a ripple within one effect instance.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct RippleId(pub(crate) u64);

impl RippleId {
    /// Raw sequence number; ripples of one instance are numbered from 0.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Lifecycle phase of a ripple.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum RipplePhase {
    /// Created and styled, not yet inserted.
    Spawned,
    /// Inserted, waiting for the host to commit the initial style.
    Entering,
    /// Fully expanded and visible.
    Holding,
    /// Fading out.
    Exiting,
    /// Detached from the host.
    Removed,
}

/// How a ripple leaves the `Holding` phase.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ExitPolicy {
    /// Exit by itself once the hold timer expires.
    #[default]
    Timed,
    /// Exit only once released, and never before the hold timer expires.
    Deferred,
}

/// Observable lifecycle events, returned by the effect's driver calls.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RippleEvent {
    /// A ripple entered a new phase.
    Phase(RippleId, RipplePhase),
    /// A deferred ripple's hold timer expired; it may now exit.
    ExitReady(RippleId),
}

#[derive(Clone, Debug)]
pub(crate) struct Ripple<E> {
    pub(crate) id: RippleId,
    pub(crate) element: E,
    pub(crate) geometry: RippleGeometry,
    pub(crate) phase: RipplePhase,
    pub(crate) deadline: Option<Duration>,
    pub(crate) press: Option<PressState>,
}

impl<E: Copy> Ripple<E> {
    /// Create and style the ripple element; nothing is inserted yet.
    pub(crate) fn spawn<H: Host<Element = E>>(
        host: &mut H,
        id: RippleId,
        geometry: RippleGeometry,
        options: &ResolvedOptions<E>,
        policy: ExitPolicy,
    ) -> Self {
        let element = host.create_element();
        let transitions = [
            Transition {
                property: Animated::Transform,
                duration: options.duration,
                easing: &options.easing,
                delay: Duration::ZERO,
            },
            Transition {
                property: Animated::Opacity,
                duration: options.fade_time(),
                easing: &options.easing,
                delay: Duration::ZERO,
            },
        ];
        host.set_properties(
            element,
            &[
                Property::Display(Display::Block),
                Property::BackgroundColor("currentColor"),
                Property::Position(Position::Absolute),
                Property::Left(geometry.origin.x),
                Property::Top(geometry.origin.y),
                Property::Width(geometry.diameter),
                Property::Height(geometry.diameter),
                Property::BorderRadius(BorderRadius::Circle),
                Property::Opacity(0.0),
                Property::CenteredScale(0.0),
                Property::Transition(&transitions),
            ],
        );
        log::trace!("ripple {id:?} spawned at {:?}", geometry.origin);
        Self {
            id,
            element,
            geometry,
            phase: RipplePhase::Spawned,
            deadline: None,
            press: match policy {
                ExitPolicy::Timed => None,
                ExitPolicy::Deferred => Some(PressState::new()),
            },
        }
    }

    fn enter_phase(&mut self, next: RipplePhase, out: &mut Vec<RippleEvent>) {
        debug_assert!(next > self.phase, "ripple phases only move forward");
        log::trace!("ripple {:?}: {:?} -> {:?}", self.id, self.phase, next);
        self.phase = next;
        out.push(RippleEvent::Phase(self.id, next));
    }

    /// Take one frame step, if the current phase waits on a frame.
    pub(crate) fn on_frame<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        wrapper: E,
        options: &ResolvedOptions<E>,
        out: &mut Vec<RippleEvent>,
    ) {
        match self.phase {
            RipplePhase::Spawned => {
                host.append_child(wrapper, self.element);
                self.enter_phase(RipplePhase::Entering, out);
            }
            RipplePhase::Entering => {
                host.set_properties(
                    self.element,
                    &[
                        Property::Opacity(options.opacity),
                        Property::CenteredScale(1.0),
                    ],
                );
                self.deadline = host.now().checked_add(options.hold_time());
                self.enter_phase(RipplePhase::Holding, out);
            }
            RipplePhase::Holding | RipplePhase::Exiting | RipplePhase::Removed => {}
        }
    }

    /// Whether this ripple still needs frame callbacks.
    pub(crate) fn wants_frame(&self) -> bool {
        matches!(self.phase, RipplePhase::Spawned | RipplePhase::Entering)
    }

    /// Fire the armed timer if it is due at `now`.
    pub(crate) fn on_timer<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        options: &ResolvedOptions<E>,
        now: Duration,
        out: &mut Vec<RippleEvent>,
    ) {
        if !self.deadline.is_some_and(|at| at <= now) {
            return;
        }
        self.deadline = None;
        match self.phase {
            RipplePhase::Holding => {
                let exit_now = match &mut self.press {
                    None => true,
                    Some(press) => {
                        out.push(RippleEvent::ExitReady(self.id));
                        press.exit_available()
                    }
                };
                if exit_now {
                    self.begin_exit(host, options, out);
                }
            }
            RipplePhase::Exiting => {
                host.remove_element(self.element);
                host.release_element(self.element);
                self.enter_phase(RipplePhase::Removed, out);
            }
            RipplePhase::Spawned | RipplePhase::Entering | RipplePhase::Removed => {}
        }
    }

    /// Release a deferred ripple. Returns `false` for timed ripples.
    ///
    /// The exit starts right away if it is already available; otherwise it
    /// starts when the hold timer expires.
    pub(crate) fn release<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        options: &ResolvedOptions<E>,
        out: &mut Vec<RippleEvent>,
    ) -> bool {
        let Some(press) = &mut self.press else {
            return false;
        };
        if press.release() && self.phase == RipplePhase::Holding {
            self.begin_exit(host, options, out);
        }
        true
    }

    fn begin_exit<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        options: &ResolvedOptions<E>,
        out: &mut Vec<RippleEvent>,
    ) {
        host.set_property(self.element, Property::Opacity(0.0));
        self.deadline = host.now().checked_add(options.duration);
        self.enter_phase(RipplePhase::Exiting, out);
    }
}
