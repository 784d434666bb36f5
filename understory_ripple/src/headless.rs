// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An in-memory [`Host`] for tests, demos and benchmarks.
//!
//! ## Model
//!
//! - Elements live in generational slots; a destroyed element's id goes stale
//!   and [`Host::is_element`] rejects it.
//! - Layout is explicit: elements inserted with [`HeadlessHost::insert`] carry
//!   a client rectangle. Elements without one (overlays) cover their parent,
//!   and detached ones report an empty rectangle.
//! - Styles are recorded per element in an [`ElementStyle`]; later
//!   declarations overwrite earlier ones.
//! - Time only moves through [`HeadlessHost::advance`].
//! - Frame requests are latched until [`HeadlessHost::take_frame_request`].
//!
//! ```
//! use kurbo::{Point, Rect};
//! use understory_ripple::headless::HeadlessHost;
//! use understory_ripple::host::EventTarget;
//! use understory_ripple::input::{Input, TouchFlag};
//! use understory_ripple::{RippleEffect, RippleOptions};
//!
//! static TOUCH: TouchFlag = TouchFlag::new();
//!
//! let mut host = HeadlessHost::new();
//! let button = host.insert(None, Rect::new(0.0, 0.0, 100.0, 40.0));
//! let mut effect =
//!     RippleEffect::with_touch_flag(&mut host, button, RippleOptions::new(), &TOUCH).unwrap();
//!
//! let id = host
//!     .dispatch(&mut effect, EventTarget::Element(button), &Input::MouseDown(Point::new(10.0, 10.0)))
//!     .unwrap();
//! host.run_frame(&mut effect);
//! host.run_frame(&mut effect);
//! assert!(effect.ripple_phase(id).is_some());
//! ```

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::time::Duration;

use hashbrown::HashMap;
use kurbo::Rect;
use smallvec::SmallVec;

use crate::effect::RippleEffect;
use crate::host::{EventKind, EventTarget, Host, ListenerId};
use crate::input::Input;
use crate::ripple::{RippleEvent, RippleId};
use crate::style::{
    Animated, BorderRadius, Display, Overflow, PointerEvents, Position, Property,
};

/// Generational handle of a headless element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ElementId(u32, u32);

impl ElementId {
    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Owned copy of a [`Transition`](crate::style::Transition).
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionRecord {
    /// Animated property.
    pub property: Animated,
    /// Transition length.
    pub duration: Duration,
    /// Timing function.
    pub easing: String,
    /// Start delay.
    pub delay: Duration,
}

/// Last value applied for each declaration of an element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ElementStyle {
    /// `display`.
    pub display: Option<Display>,
    /// `position`.
    pub position: Option<Position>,
    /// Shared `top`/`right`/`bottom`/`left`.
    pub inset: Option<f64>,
    /// `left`.
    pub left: Option<f64>,
    /// `top`.
    pub top: Option<f64>,
    /// `width`.
    pub width: Option<f64>,
    /// `height`.
    pub height: Option<f64>,
    /// `border-radius`.
    pub border_radius: Option<BorderRadius>,
    /// `color`.
    pub color: Option<String>,
    /// `background-color`.
    pub background_color: Option<String>,
    /// `overflow`.
    pub overflow: Option<Overflow>,
    /// `pointer-events`.
    pub pointer_events: Option<PointerEvents>,
    /// `opacity`.
    pub opacity: Option<f64>,
    /// Scale of the centered transform.
    pub scale: Option<f64>,
    /// `transition`.
    pub transitions: SmallVec<[TransitionRecord; 2]>,
}

impl ElementStyle {
    fn apply(&mut self, property: Property<'_>) {
        match property {
            Property::Display(v) => self.display = Some(v),
            Property::Position(v) => self.position = Some(v),
            Property::Inset(v) => self.inset = Some(v),
            Property::Left(v) => self.left = Some(v),
            Property::Top(v) => self.top = Some(v),
            Property::Width(v) => self.width = Some(v),
            Property::Height(v) => self.height = Some(v),
            Property::BorderRadius(v) => self.border_radius = Some(v),
            Property::Color(v) => self.color = Some(v.to_string()),
            Property::BackgroundColor(v) => self.background_color = Some(v.to_string()),
            Property::Overflow(v) => self.overflow = Some(v),
            Property::PointerEvents(v) => self.pointer_events = Some(v),
            Property::Opacity(v) => self.opacity = Some(v),
            Property::CenteredScale(v) => self.scale = Some(v),
            Property::Transition(list) => {
                self.transitions = list
                    .iter()
                    .map(|t| TransitionRecord {
                        property: t.property,
                        duration: t.duration,
                        easing: t.easing.to_string(),
                        delay: t.delay,
                    })
                    .collect();
            }
        }
    }
}

#[derive(Clone, Debug)]
struct Node {
    generation: u32,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    layout: Option<Rect>,
    style: ElementStyle,
}

/// In-memory element tree, listener table, clock and frame latch.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    nodes: Vec<Option<Node>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    listeners: HashMap<ListenerId, (EventTarget<ElementId>, EventKind)>,
    next_listener: u64,
    now: Duration,
    frame_requested: bool,
}

impl HeadlessHost {
    /// An empty host at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, layout: Option<Rect>) -> ElementId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            self.generations[idx] += 1;
            (idx, self.generations[idx])
        } else {
            self.nodes.push(None);
            self.generations.push(1);
            (self.nodes.len() - 1, 1)
        };
        self.nodes[idx] = Some(Node {
            generation,
            parent: None,
            children: Vec::new(),
            layout,
            style: ElementStyle::default(),
        });
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementId uses 32-bit indices by design."
        )]
        ElementId(idx as u32, generation)
    }

    fn node(&self, id: ElementId) -> Option<&Node> {
        self.nodes
            .get(id.idx())?
            .as_ref()
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: ElementId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())?
            .as_mut()
            .filter(|n| n.generation == id.1)
    }

    /// Insert a laid-out element with client rectangle `bounds`, appended to `parent`.
    pub fn insert(&mut self, parent: Option<ElementId>, bounds: Rect) -> ElementId {
        let id = self.alloc(Some(bounds));
        if let Some(p) = parent {
            self.append_child(p, id);
        }
        id
    }

    /// Free an element's slot; its id becomes stale. Children are detached.
    pub fn destroy_element(&mut self, id: ElementId) {
        self.remove_element(id);
        let Some(node) = self.node_mut(id) else {
            return;
        };
        let children = core::mem::take(&mut node.children);
        for child in children {
            if let Some(c) = self.node_mut(child) {
                c.parent = None;
            }
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    /// Move an element's client rectangle.
    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(node) = self.node_mut(id) {
            node.layout = Some(bounds);
        }
    }

    /// Author a `position` on an element.
    pub fn set_position(&mut self, id: ElementId, position: Position) {
        self.set_property(id, Property::Position(position));
    }

    /// Number of live elements, attached or not.
    pub fn element_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Parent of an element, if attached.
    pub fn parent(&self, id: ElementId) -> Option<ElementId> {
        self.node(id)?.parent
    }

    /// Children of an element in order; empty for stale ids.
    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.node(id).map_or(&[], |n| &n.children)
    }

    /// Recorded style of an element.
    pub fn style(&self, id: ElementId) -> Option<&ElementStyle> {
        self.node(id).map(|n| &n.style)
    }

    /// Total registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Registered listeners on one target.
    pub fn listeners_on(&self, target: EventTarget<ElementId>) -> usize {
        self.listeners.values().filter(|(t, _)| *t == target).count()
    }

    /// Whether a listener for `kind` is registered on `target`.
    pub fn is_listening(&self, target: EventTarget<ElementId>, kind: EventKind) -> bool {
        self.listeners.values().any(|&(t, k)| t == target && k == kind)
    }

    /// Move the clock forward.
    pub fn advance(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Return and clear the frame request latch.
    pub fn take_frame_request(&mut self) -> bool {
        core::mem::take(&mut self.frame_requested)
    }

    /// Deliver `input` observed on `target` to `effect`.
    ///
    /// Every input is forwarded, listener or not, so touches anywhere reach
    /// the touch flag. The effect itself ignores events it does not listen for.
    pub fn dispatch(
        &mut self,
        effect: &mut RippleEffect<ElementId>,
        target: EventTarget<ElementId>,
        input: &Input,
    ) -> Option<RippleId> {
        effect.handle_event(self, target, input)
    }

    /// Run one rendering frame if one was requested.
    pub fn run_frame(&mut self, effect: &mut RippleEffect<ElementId>) -> Vec<RippleEvent> {
        if !self.take_frame_request() {
            return Vec::new();
        }
        effect.animation_frame(self)
    }

    /// Advance the clock by `dt`, then fire due timers until none is due.
    pub fn advance_timers(
        &mut self,
        effect: &mut RippleEffect<ElementId>,
        dt: Duration,
    ) -> Vec<RippleEvent> {
        self.advance(dt);
        let mut out = Vec::new();
        while effect.next_deadline().is_some_and(|at| at <= self.now) {
            out.extend(effect.fire_timers(self));
        }
        out
    }
}

impl Host for HeadlessHost {
    type Element = ElementId;

    fn is_element(&self, element: &ElementId) -> bool {
        self.node(*element).is_some()
    }

    fn create_element(&mut self) -> ElementId {
        self.alloc(None)
    }

    fn prepend_child(&mut self, parent: ElementId, child: ElementId) {
        if self.node(parent).is_none() {
            return;
        }
        self.remove_element(child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.insert(0, child);
        }
    }

    fn append_child(&mut self, parent: ElementId, child: ElementId) {
        if self.node(parent).is_none() {
            return;
        }
        self.remove_element(child);
        if let Some(c) = self.node_mut(child) {
            c.parent = Some(parent);
        }
        if let Some(p) = self.node_mut(parent) {
            p.children.push(child);
        }
    }

    fn remove_element(&mut self, element: ElementId) {
        let Some(parent) = self.node_mut(element).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.node_mut(parent) {
            p.children.retain(|&c| c != element);
        }
    }

    fn set_property(&mut self, element: ElementId, property: Property<'_>) {
        if let Some(node) = self.node_mut(element) {
            node.style.apply(property);
        }
    }

    fn computed_position(&self, element: ElementId) -> Position {
        self.node(element)
            .and_then(|n| n.style.position)
            .unwrap_or(Position::Static)
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        let mut cur = Some(element);
        while let Some(node) = cur.and_then(|id| self.node(id)) {
            if let Some(rect) = node.layout {
                return rect;
            }
            cur = node.parent;
        }
        Rect::ZERO
    }

    fn add_listener(&mut self, target: EventTarget<ElementId>, kind: EventKind) -> ListenerId {
        let id = ListenerId::new(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, (target, kind));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn release_element(&mut self, element: ElementId) {
        self.destroy_element(element);
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn request_animation_frame(&mut self) {
        self.frame_requested = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_ids_are_rejected_after_reuse() {
        let mut host = HeadlessHost::new();
        let a = host.insert(None, Rect::new(0.0, 0.0, 1.0, 1.0));
        host.destroy_element(a);
        let b = host.create_element();
        assert_ne!(a, b);
        assert!(!host.is_element(&a));
        assert!(host.is_element(&b));
    }

    #[test]
    fn overlays_cover_their_parent() {
        let mut host = HeadlessHost::new();
        let root = host.insert(None, Rect::new(5.0, 5.0, 25.0, 15.0));
        let overlay = host.create_element();
        assert_eq!(host.bounding_rect(overlay), Rect::ZERO);
        host.prepend_child(root, overlay);
        assert_eq!(host.bounding_rect(overlay), Rect::new(5.0, 5.0, 25.0, 15.0));
    }

    #[test]
    fn prepend_and_append_keep_order() {
        let mut host = HeadlessHost::new();
        let root = host.insert(None, Rect::ZERO);
        let a = host.insert(Some(root), Rect::ZERO);
        let b = host.create_element();
        let c = host.create_element();
        host.prepend_child(root, b);
        host.append_child(root, c);
        assert_eq!(host.children(root), &[b, a, c]);
        host.remove_element(a);
        host.remove_element(a);
        assert_eq!(host.children(root), &[b, c]);
        assert_eq!(host.parent(a), None);
    }

    #[test]
    fn later_declarations_overwrite() {
        let mut host = HeadlessHost::new();
        let e = host.create_element();
        host.set_properties(e, &[Property::Opacity(0.0), Property::Opacity(0.5)]);
        assert_eq!(host.style(e).unwrap().opacity, Some(0.5));
        assert_eq!(host.computed_position(e), Position::Static);
    }

    #[test]
    fn released_elements_free_their_slot() {
        let mut host = HeadlessHost::new();
        let root = host.insert(None, Rect::ZERO);
        let overlay = host.create_element();
        host.append_child(root, overlay);
        host.release_element(overlay);
        assert_eq!(host.element_count(), 1);
        assert!(host.children(root).is_empty());
        assert!(!host.is_element(&overlay));
    }

    #[test]
    fn listeners_are_tracked_per_target() {
        let mut host = HeadlessHost::new();
        let e = host.create_element();
        let a = host.add_listener(EventTarget::Element(e), EventKind::MouseDown);
        let _b = host.add_listener(EventTarget::Window, EventKind::MouseUp);
        assert_eq!(host.listeners_on(EventTarget::Element(e)), 1);
        assert!(host.is_listening(EventTarget::Window, EventKind::MouseUp));
        host.remove_listener(a);
        assert_eq!(host.listener_count(), 1);
    }
}
