// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interaction coordinator: turn presses, releases and hover into ripples.
//!
//! ## Listeners
//!
//! An instance listens on its trigger element for `MouseDown`, `TouchStart`,
//! `KeyDown` (unless disabled), `MouseEnter` and `MouseLeave`. Each press with
//! [`RippleFlags::AUTOEXIT`](crate::options::RippleFlags::AUTOEXIT) also
//! registers one-shot release listeners on the window:
//!
//! | Press        | Release listeners      |
//! |--------------|------------------------|
//! | `MouseDown`  | `MouseUp`, `TouchEnd`  |
//! | `TouchStart` | `MouseUp`, `TouchEnd`  |
//! | `KeyDown`    | `KeyUp`                |
//!
//! The first accepted release ends the press and retires its sibling listener.
//!
//! ## Emulated mouse input
//!
//! Touch screens follow a touch sequence with emulated mouse events. The
//! process-wide [`TouchFlag`] records whether a touch was ever seen; once set,
//! mouse presses and mouse releases are ignored so a tap yields one ripple.
//! The flag starts clear, flips on the first `TouchStart`, and is never reset.
//!
//! ## Early releases
//!
//! A held ripple cannot exit before its hold timer expires. If the release
//! comes first, [`PressState`] remembers it and the exit starts the moment the
//! timer makes it available, so no release is lost.

use alloc::vec::Vec;
use core::sync::atomic::{AtomicBool, Ordering};

use kurbo::Point;
use smallvec::SmallVec;

use crate::effect::RippleEffect;
use crate::geometry::{Contact, resolve_origin};
use crate::host::{EventKind, EventTarget, Host, ListenerId};
use crate::options::RippleFlags;
use crate::ripple::{ExitPolicy, RippleEvent, RippleId};
use crate::style::Property;

/// An input event delivered by the host.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Input {
    /// Mouse button pressed at a client position.
    MouseDown(Point),
    /// Mouse button released.
    MouseUp,
    /// Touch started; carries the client position of the first target touch.
    TouchStart(Point),
    /// Touch ended.
    TouchEnd,
    /// Key pressed.
    KeyDown,
    /// Key released.
    KeyUp,
    /// Pointer entered the trigger.
    MouseEnter,
    /// Pointer left the trigger.
    MouseLeave,
}

impl Input {
    /// The listener kind this input is delivered to.
    pub fn kind(&self) -> EventKind {
        match self {
            Self::MouseDown(_) => EventKind::MouseDown,
            Self::MouseUp => EventKind::MouseUp,
            Self::TouchStart(_) => EventKind::TouchStart,
            Self::TouchEnd => EventKind::TouchEnd,
            Self::KeyDown => EventKind::KeyDown,
            Self::KeyUp => EventKind::KeyUp,
            Self::MouseEnter => EventKind::MouseEnter,
            Self::MouseLeave => EventKind::MouseLeave,
        }
    }
}

/// Process-wide record of touch capability.
///
/// Starts clear, is set by the first observed touch, and is never cleared.
#[derive(Debug, Default)]
pub struct TouchFlag(AtomicBool);

/// The flag shared by every instance built with [`RippleEffect::new`].
pub static TOUCHSCREEN: TouchFlag = TouchFlag::new();

impl TouchFlag {
    /// A clear flag. Useful for isolating instances in tests.
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Whether a touch has been observed.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Record that the host saw a touch.
    pub fn set(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Feed any document-level input; a `TouchStart` sets the flag.
    ///
    /// Hosts should call this for touches outside instrumented elements too.
    pub fn observe(&self, input: &Input) {
        if matches!(input, Input::TouchStart(_)) && !self.is_set() {
            log::debug!("touch input observed; ignoring mouse presses from now on");
            self.set();
        }
    }
}

/// Per-press state of a deferred ripple.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PressState {
    pressing: bool,
    exit_ready: bool,
}

impl Default for PressState {
    fn default() -> Self {
        Self::new()
    }
}

impl PressState {
    /// A press that is held and whose ripple cannot exit yet.
    pub const fn new() -> Self {
        Self {
            pressing: true,
            exit_ready: false,
        }
    }

    /// Whether the press is still held.
    pub fn is_pressing(&self) -> bool {
        self.pressing
    }

    /// Whether the ripple's exit has become available.
    pub fn is_exit_ready(&self) -> bool {
        self.exit_ready
    }

    /// Mark the press released. Returns whether the ripple should exit now.
    pub fn release(&mut self) -> bool {
        self.pressing = false;
        self.exit_ready
    }

    /// Mark the exit available. Returns whether the ripple should exit now.
    pub fn exit_available(&mut self) -> bool {
        self.exit_ready = true;
        !self.pressing
    }
}

/// Source device of a press.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PressSource {
    /// Mouse button.
    Mouse,
    /// Touch contact.
    Touch,
    /// Keyboard.
    Keyboard,
}

impl PressSource {
    /// Window events that may end a press from this source.
    pub fn release_kinds(self) -> &'static [EventKind] {
        match self {
            Self::Mouse | Self::Touch => &[EventKind::MouseUp, EventKind::TouchEnd],
            Self::Keyboard => &[EventKind::KeyUp],
        }
    }
}

/// A one-shot window listener waiting to release a ripple.
#[derive(Copy, Clone, Debug)]
pub(crate) struct PendingRelease {
    pub(crate) listener: ListenerId,
    pub(crate) kind: EventKind,
    pub(crate) ripple: RippleId,
}

impl<E: Copy + Eq + core::hash::Hash + core::fmt::Debug> RippleEffect<E> {
    /// Deliver one input event.
    ///
    /// `target` is where the event was observed: the trigger element for
    /// presses and hover, the window for releases. Events for which this
    /// instance holds no listener are ignored, so nothing happens after
    /// [`destroy`](Self::destroy). Every input still reaches the touch flag,
    /// wherever it landed. Returns the ripple a press spawned, if any.
    pub fn handle_event<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        target: EventTarget<E>,
        input: &Input,
    ) -> Option<RippleId> {
        let spawned = match target {
            EventTarget::Window => {
                self.on_window_event(host, input.kind());
                None
            }
            EventTarget::Element(element)
                if element != self.options.trigger || !self.is_listening(input.kind()) =>
            {
                None
            }
            EventTarget::Element(_) => {
                match *input {
                    Input::MouseDown(p) => self.on_press(host, PressSource::Mouse, Some(p)),
                    Input::TouchStart(p) => self.on_press(host, PressSource::Touch, Some(p)),
                    Input::KeyDown => self.on_press(host, PressSource::Keyboard, None),
                    Input::MouseEnter => {
                        self.set_hover(host, true);
                        None
                    }
                    Input::MouseLeave => {
                        self.set_hover(host, false);
                        None
                    }
                    Input::MouseUp | Input::TouchEnd | Input::KeyUp => None,
                }
            }
        };
        // The touch reaches the window after the trigger has handled it.
        self.touch.observe(input);
        spawned
    }

    fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.iter().any(|&(_, k)| k == kind)
    }

    fn on_press<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        source: PressSource,
        position: Option<Point>,
    ) -> Option<RippleId> {
        if source == PressSource::Mouse && self.touch.is_set() {
            log::trace!("ignoring emulated mouse press on {:?}", self.options.trigger);
            return None;
        }
        let contact = match (source, position) {
            (PressSource::Keyboard, _) | (_, None) => Contact::Center,
            (_, Some(p)) => Contact::Client(p),
        };
        let rect = host.bounding_rect(self.wrapper);
        let centered = self.options.flags.contains(RippleFlags::CENTERED);
        let origin = resolve_origin(contact, rect, centered);

        let policy = if self.options.autoexit() {
            ExitPolicy::Deferred
        } else {
            ExitPolicy::Timed
        };
        let id = match self.trigger(host, origin.x, origin.y, policy) {
            Ok(id) => id,
            Err(err) => {
                log::debug!("press on {:?} spawned no ripple: {err}", self.options.trigger);
                return None;
            }
        };
        if policy == ExitPolicy::Timed {
            return Some(id);
        }
        for &kind in source.release_kinds() {
            let listener = host.add_listener(EventTarget::Window, kind);
            self.pending.push(PendingRelease {
                listener,
                kind,
                ripple: id,
            });
        }
        Some(id)
    }

    fn on_window_event<H: Host<Element = E>>(&mut self, host: &mut H, kind: EventKind) {
        let mut fired: SmallVec<[PendingRelease; 4]> = SmallVec::new();
        self.pending.retain(|p| {
            if p.kind == kind {
                fired.push(*p);
                false
            } else {
                true
            }
        });
        if fired.is_empty() {
            return;
        }
        let ignore_mouse = kind == EventKind::MouseUp && self.touch.is_set();
        let mut events: Vec<RippleEvent> = Vec::new();
        for release in fired {
            host.remove_listener(release.listener);
            if ignore_mouse {
                continue;
            }
            self.retire_siblings(host, release.ripple);
            if let Some(ripple) = self.ripples.iter_mut().find(|r| r.id == release.ripple) {
                ripple.release(host, &self.options, &mut events);
            }
        }
        self.backlog.extend(events);
    }

    fn retire_siblings<H: Host<Element = E>>(&mut self, host: &mut H, ripple: RippleId) {
        self.pending.retain(|p| {
            if p.ripple == ripple {
                host.remove_listener(p.listener);
                false
            } else {
                true
            }
        });
    }

    fn set_hover<H: Host<Element = E>>(&mut self, host: &mut H, hovered: bool) {
        self.hovered = hovered;
        let opacity = if hovered { self.options.opacity } else { 0.0 };
        host.set_property(self.hover_layer, Property::Opacity(opacity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RippleOptions;
    use crate::headless::{ElementId, HeadlessHost};
    use crate::ripple::RipplePhase;
    use core::time::Duration;
    use kurbo::Rect;

    fn setup(
        options: RippleOptions<ElementId>,
        touch: &'static TouchFlag,
    ) -> (HeadlessHost, RippleEffect<ElementId>, ElementId) {
        let mut host = HeadlessHost::new();
        let target = host.insert(None, Rect::new(100.0, 50.0, 200.0, 110.0));
        let effect = RippleEffect::with_touch_flag(&mut host, target, options, touch).unwrap();
        (host, effect, target)
    }

    fn expand(host: &mut HeadlessHost, effect: &mut RippleEffect<ElementId>) {
        host.run_frame(effect);
        host.run_frame(effect);
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn mouse_press_is_wrapper_relative() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(120.0, 60.0)),
            )
            .unwrap();
        let g = effect.ripple_geometry(id).unwrap();
        assert_eq!(g.origin, Point::new(20.0, 10.0));
        assert!((g.diameter - 188.68).abs() < 0.01);
        // Release listeners wait on the window.
        assert!(host.is_listening(EventTarget::Window, EventKind::MouseUp));
        assert!(host.is_listening(EventTarget::Window, EventKind::TouchEnd));
    }

    #[test]
    fn centered_ignores_contact_point() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new().centered(true), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(101.0, 51.0)),
            )
            .unwrap();
        assert_eq!(
            effect.ripple_geometry(id).unwrap().origin,
            Point::new(50.0, 30.0)
        );
    }

    #[test]
    fn keyboard_press_starts_at_center() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let id = host
            .dispatch(&mut effect, EventTarget::Element(target), &Input::KeyDown)
            .unwrap();
        assert_eq!(
            effect.ripple_geometry(id).unwrap().origin,
            Point::new(50.0, 30.0)
        );
        assert!(host.is_listening(EventTarget::Window, EventKind::KeyUp));
        assert!(!host.is_listening(EventTarget::Window, EventKind::MouseUp));

        expand(&mut host, &mut effect);
        host.advance_timers(&mut effect, ms(400));
        host.dispatch(&mut effect, EventTarget::Window, &Input::KeyUp);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
        assert_eq!(host.listeners_on(EventTarget::Window), 0);
    }

    #[test]
    fn keydown_can_be_disabled() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new().keydown(false), &TOUCH);
        let got = effect.handle_event(&mut host, EventTarget::Element(target), &Input::KeyDown);
        assert_eq!(got, None);
        assert_eq!(effect.ripples().count(), 0);
    }

    #[test]
    fn held_press_outlives_duration() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(150.0, 80.0)),
            )
            .unwrap();
        expand(&mut host, &mut effect);
        let events = host.advance_timers(&mut effect, ms(2000));
        assert_eq!(events, [RippleEvent::ExitReady(id)]);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Holding));
        let element = effect.ripple_element(id).unwrap();
        assert_eq!(host.style(element).unwrap().opacity, Some(0.12));

        host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
        assert_eq!(host.style(element).unwrap().opacity, Some(0.0));
        // The sibling touch listener was retired with the release.
        assert_eq!(host.listeners_on(EventTarget::Window), 0);

        let events = host.advance_timers(&mut effect, ms(400));
        assert_eq!(
            events,
            [
                RippleEvent::Phase(id, RipplePhase::Exiting),
                RippleEvent::Phase(id, RipplePhase::Removed)
            ]
        );
    }

    #[test]
    fn quick_release_exits_after_hold_time() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(150.0, 80.0)),
            )
            .unwrap();
        // Released before the ripple has even been inserted.
        host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Spawned));
        expand(&mut host, &mut effect);
        host.advance_timers(&mut effect, ms(399));
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Holding));
        host.advance_timers(&mut effect, ms(1));
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
    }

    #[test]
    fn without_autoexit_ripples_time_out() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new().autoexit(false), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(150.0, 80.0)),
            )
            .unwrap();
        assert_eq!(host.listeners_on(EventTarget::Window), 0);
        expand(&mut host, &mut effect);
        host.advance_timers(&mut effect, ms(400));
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
    }

    #[test]
    fn emulated_mouse_after_touch_is_ignored() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let trigger = EventTarget::Element(target);
        let at = Point::new(120.0, 60.0);

        let id = host
            .dispatch(&mut effect, trigger, &Input::TouchStart(at))
            .unwrap();
        assert!(TOUCH.is_set());
        host.dispatch(&mut effect, EventTarget::Window, &Input::TouchEnd);
        assert!(host.dispatch(&mut effect, trigger, &Input::MouseDown(at)).is_none());
        assert_eq!(effect.ripples().count(), 1);

        expand(&mut host, &mut effect);
        host.advance_timers(&mut effect, ms(400));
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
    }

    #[test]
    fn touch_outside_trigger_sets_flag() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let other = host.insert(None, Rect::new(0.0, 0.0, 20.0, 20.0));
        let touch = Input::TouchStart(Point::new(5.0, 5.0));
        assert_eq!(host.dispatch(&mut effect, EventTarget::Element(other), &touch), None);
        assert!(TOUCH.is_set());

        let got = host.dispatch(
            &mut effect,
            EventTarget::Element(target),
            &Input::MouseDown(Point::new(120.0, 60.0)),
        );
        assert_eq!(got, None);
        assert_eq!(effect.ripples().count(), 0);
    }

    #[test]
    fn window_touch_sets_flag() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, _) = setup(RippleOptions::new(), &TOUCH);
        host.dispatch(&mut effect, EventTarget::Window, &Input::TouchStart(Point::ZERO));
        assert!(TOUCH.is_set());
    }

    #[test]
    fn touch_elsewhere_disables_mouse_presses() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        TOUCH.observe(&Input::TouchStart(Point::ZERO));
        let got = host.dispatch(
            &mut effect,
            EventTarget::Element(target),
            &Input::MouseDown(Point::new(120.0, 60.0)),
        );
        assert_eq!(got, None);
        assert_eq!(effect.ripples().count(), 0);
    }

    #[test]
    fn emulated_mouse_up_does_not_release_touch() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new(), &TOUCH);
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::TouchStart(Point::new(120.0, 60.0)),
            )
            .unwrap();
        expand(&mut host, &mut effect);
        host.advance_timers(&mut effect, ms(400));
        host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Holding));
        host.dispatch(&mut effect, EventTarget::Window, &Input::TouchEnd);
        assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
    }

    #[test]
    fn hover_toggles_layer_opacity() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let (mut host, mut effect, target) = setup(RippleOptions::new().opacity(0.2), &TOUCH);
        let layer = effect.hover_layer();
        host.dispatch(&mut effect, EventTarget::Element(target), &Input::MouseEnter);
        assert!(effect.is_hovered());
        assert_eq!(host.style(layer).unwrap().opacity, Some(0.2));
        // Ripples do not touch the hover layer.
        let id = host
            .dispatch(
                &mut effect,
                EventTarget::Element(target),
                &Input::MouseDown(Point::new(120.0, 60.0)),
            )
            .unwrap();
        expand(&mut host, &mut effect);
        host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
        host.advance_timers(&mut effect, ms(800));
        assert_eq!(effect.ripple_phase(id), None);
        assert_eq!(host.style(layer).unwrap().opacity, Some(0.2));
        host.dispatch(&mut effect, EventTarget::Element(target), &Input::MouseLeave);
        assert!(!effect.is_hovered());
        assert_eq!(host.style(layer).unwrap().opacity, Some(0.0));
    }

    #[test]
    fn separate_trigger_element_drives_target() {
        static TOUCH: TouchFlag = TouchFlag::new();
        let mut host = HeadlessHost::new();
        let target = host.insert(None, Rect::new(0.0, 0.0, 40.0, 40.0));
        let handle = host.insert(None, Rect::new(100.0, 0.0, 120.0, 20.0));
        let mut effect = RippleEffect::with_touch_flag(
            &mut host,
            target,
            RippleOptions::new().trigger(handle),
            &TOUCH,
        )
        .unwrap();
        assert_eq!(host.listeners_on(EventTarget::Element(target)), 0);
        assert_eq!(host.listeners_on(EventTarget::Element(handle)), 5);
        let id = host
            .dispatch(&mut effect, EventTarget::Element(handle), &Input::KeyDown)
            .unwrap();
        host.run_frame(&mut effect);
        let element = effect.ripple_element(id).unwrap();
        assert_eq!(host.parent(element), Some(effect.wrapper()));
        assert_eq!(host.parent(effect.wrapper()), Some(target));
    }

    #[test]
    fn release_before_exit_is_remembered() {
        let mut p = PressState::new();
        assert!(!p.release());
        assert!(!p.is_pressing());
        assert!(p.exit_available());
    }

    #[test]
    fn exit_waits_for_release() {
        let mut p = PressState::new();
        assert!(!p.exit_available());
        assert!(p.is_exit_ready());
        assert!(p.release());
    }

    #[test]
    fn touch_flag_is_monotonic() {
        let flag = TouchFlag::new();
        assert!(!flag.is_set());
        flag.observe(&Input::MouseDown(Point::ZERO));
        assert!(!flag.is_set());
        flag.observe(&Input::TouchStart(Point::ZERO));
        assert!(flag.is_set());
        flag.observe(&Input::TouchEnd);
        assert!(flag.is_set());
    }

    #[test]
    fn keyboard_waits_for_key_up() {
        assert_eq!(PressSource::Keyboard.release_kinds(), &[EventKind::KeyUp]);
        assert_eq!(
            PressSource::Touch.release_kinds(),
            &[EventKind::MouseUp, EventKind::TouchEnd]
        );
    }
}
