// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ripple basics.
//!
//! Attach an effect to a button, tap it quickly, and follow the ripple through
//! its phases on the headless host.
//!
//! Run:
//! - `cargo run -p understory_demos --example ripple_basics`

use core::time::Duration;

use kurbo::{Point, Rect};
use understory_ripple::headless::HeadlessHost;
use understory_ripple::host::EventTarget;
use understory_ripple::input::Input;
use understory_ripple::{RippleEffect, RippleOptions, RipplePhase};

fn main() {
    let mut host = HeadlessHost::new();
    let button = host.insert(None, Rect::new(40.0, 40.0, 160.0, 80.0));
    let mut effect = RippleEffect::new(&mut host, button, RippleOptions::new().opacity(0.2))
        .expect("button is a live element");

    println!("== Scaffold ==");
    println!("  wrapper: {:?}", effect.wrapper());
    println!("  hover layer: {:?}", effect.hover_layer());
    println!("  target position forced to: {:?}", host.style(button).unwrap().position);

    // Tap near the left edge.
    let id = host
        .dispatch(
            &mut effect,
            EventTarget::Element(button),
            &Input::MouseDown(Point::new(50.0, 60.0)),
        )
        .expect("press spawns a ripple");
    let geometry = effect.ripple_geometry(id).unwrap();
    println!("== Press ==\n  origin {:?}, diameter {:.2}", geometry.origin, geometry.diameter);
    host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);

    let mut events = host.run_frame(&mut effect);
    events.extend(host.run_frame(&mut effect));
    println!("== Frames ==\n  {:?}", events);

    // The release came early, so the exit waits for the hold timer.
    let events = host.advance_timers(&mut effect, Duration::from_millis(400));
    println!("== Hold expired ==\n  {:?}", events);
    assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));

    let events = host.advance_timers(&mut effect, Duration::from_millis(400));
    println!("== Exit finished ==\n  {:?}", events);
    assert_eq!(effect.ripple_phase(id), None);

    effect.destroy(&mut host);
    assert!(host.children(button).is_empty());
    println!("destroyed; {} listeners left", host.listener_count());
}
