// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Press and hold through a custom host.
//!
//! Implements [`Host`] over a tiny flat element table that prints every
//! mutation, then uses a [`Registry`] to attach one effect per button.
//! A held press keeps its ripple on screen well past the configured duration.
//!
//! Run:
//! - `cargo run -p understory_demos --example ripple_press_hold`

use core::time::Duration;

use kurbo::{Point, Rect};
use understory_ripple::host::{EventKind, EventTarget, Host, ListenerId};
use understory_ripple::input::Input;
use understory_ripple::style::{Position, Property};
use understory_ripple::{Registry, RippleOptions, RipplePhase};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
struct Node(usize);

#[derive(Default)]
struct PrintHost {
    rects: Vec<Option<Rect>>,
    parents: Vec<Option<Node>>,
    next_listener: u64,
    now: Duration,
    frame: bool,
}

impl PrintHost {
    fn button(&mut self, rect: Rect) -> Node {
        self.rects.push(Some(rect));
        self.parents.push(None);
        Node(self.rects.len() - 1)
    }
}

impl Host for PrintHost {
    type Element = Node;

    fn is_element(&self, element: &Node) -> bool {
        element.0 < self.rects.len()
    }

    fn create_element(&mut self) -> Node {
        self.rects.push(None);
        self.parents.push(None);
        Node(self.rects.len() - 1)
    }

    fn prepend_child(&mut self, parent: Node, child: Node) {
        println!("  prepend {child:?} to {parent:?}");
        self.parents[child.0] = Some(parent);
    }

    fn append_child(&mut self, parent: Node, child: Node) {
        println!("  append {child:?} to {parent:?}");
        self.parents[child.0] = Some(parent);
    }

    fn remove_element(&mut self, element: Node) {
        println!("  remove {element:?}");
        self.parents[element.0] = None;
    }

    fn set_property(&mut self, element: Node, property: Property<'_>) {
        println!("  {element:?}.{} = {property:?}", property.name());
    }

    fn computed_position(&self, _element: Node) -> Position {
        Position::Static
    }

    fn bounding_rect(&self, element: Node) -> Rect {
        let mut cur = Some(element);
        while let Some(node) = cur {
            if let Some(rect) = self.rects[node.0] {
                return rect;
            }
            cur = self.parents[node.0];
        }
        Rect::ZERO
    }

    fn add_listener(&mut self, target: EventTarget<Node>, kind: EventKind) -> ListenerId {
        self.next_listener += 1;
        println!("  listen {kind:?} on {target:?}");
        ListenerId::new(self.next_listener)
    }

    fn remove_listener(&mut self, id: ListenerId) {
        println!("  unlisten {}", id.get());
    }

    fn now(&self) -> Duration {
        self.now
    }

    fn request_animation_frame(&mut self) {
        self.frame = true;
    }
}

fn main() {
    let mut host = PrintHost::default();
    let ok = host.button(Rect::new(0.0, 0.0, 80.0, 32.0));
    let mut registry = Registry::new();

    println!("== Attach ==");
    let effect = registry
        .attach_to(&mut host, ok, RippleOptions::new().rounded(true))
        .expect("button is a live element");
    let again = registry
        .attach_to(&mut host, ok, RippleOptions::new())
        .expect("button is a live element");
    assert!(std::rc::Rc::ptr_eq(&effect, &again));

    println!("== Press ==");
    let mut effect = effect.borrow_mut();
    let id = effect
        .handle_event(
            &mut host,
            EventTarget::Element(ok),
            &Input::TouchStart(Point::new(20.0, 16.0)),
        )
        .expect("press spawns a ripple");

    println!("== Frames ==");
    while std::mem::take(&mut host.frame) {
        let events = effect.animation_frame(&mut host);
        println!("  -> {events:?}");
    }

    println!("== Held for two seconds ==");
    host.now += Duration::from_secs(2);
    let events = effect.fire_timers(&mut host);
    println!("  -> {events:?}");
    assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Holding));

    println!("== Release ==");
    effect.handle_event(&mut host, EventTarget::Window, &Input::TouchEnd);
    assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
    host.now = effect.next_deadline().unwrap_or(host.now);
    let events = effect.fire_timers(&mut host);
    println!("  -> {events:?}");
    assert_eq!(effect.ripple_phase(id), None);

    println!("== Destroy ==");
    effect.destroy(&mut host);
    drop(effect);
    assert!(registry.get(&ok).is_none());
}
