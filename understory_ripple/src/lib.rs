// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_ripple --heading-base-level=0

//! Understory Ripple: headless press-feedback ripples for UI elements.
//!
//! ## Overview
//!
//! Attach a [`RippleEffect`] to an element and it keeps a small overlay in
//! sync with user input: a circle expands from the contact point on press,
//! holds while the press is held, and fades out after release. A second,
//! independent layer highlights the element while the pointer hovers it.
//!
//! The crate owns the timing and ordering logic and nothing else. The element
//! tree, style engine, event loop and clock belong to a [`Host`](host::Host)
//! implemented by the toolkit. [`headless::HeadlessHost`] is an in-memory host
//! for tests and tooling.
//!
//! ## Pieces
//!
//! - [`options`]: partial configuration merged over defaults.
//! - [`style`]: typed declarations the host translates into its style system.
//! - [`geometry`]: ripple origin and the diameter covering the target.
//! - [`input`]: press, release and hover coordination, touch disambiguation.
//! - [`ripple`]: the per-ripple `Spawned → Entering → Holding → Exiting → Removed` machine.
//! - [`RippleEffect`]: one instance per target; scaffold, listeners, teardown.
//! - [`Registry`]: at most one live instance per target, held weakly.
//!
//! ## Driving an effect
//!
//! The host forwards events to [`RippleEffect::handle_event`], calls
//! [`RippleEffect::animation_frame`] on each frame it was asked for, and calls
//! [`RippleEffect::fire_timers`] when its clock reaches
//! [`RippleEffect::next_deadline`]. Each ripple needs two frames to appear:
//! one to insert it with its initial style and one to start the expansion.
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Point, Rect};
//! use understory_ripple::headless::HeadlessHost;
//! use understory_ripple::host::EventTarget;
//! use understory_ripple::input::{Input, TouchFlag};
//! use understory_ripple::ripple::RipplePhase;
//! use understory_ripple::{RippleEffect, RippleOptions};
//!
//! static TOUCH: TouchFlag = TouchFlag::new();
//!
//! let mut host = HeadlessHost::new();
//! let button = host.insert(None, Rect::new(0.0, 0.0, 120.0, 40.0));
//! let mut effect =
//!     RippleEffect::with_touch_flag(&mut host, button, RippleOptions::new(), &TOUCH).unwrap();
//!
//! // Press and hold.
//! let press = Input::MouseDown(Point::new(30.0, 20.0));
//! let id = host.dispatch(&mut effect, EventTarget::Element(button), &press).unwrap();
//! host.run_frame(&mut effect);
//! host.run_frame(&mut effect);
//! host.advance_timers(&mut effect, Duration::from_millis(1000));
//! assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Holding));
//!
//! // Release anywhere.
//! host.dispatch(&mut effect, EventTarget::Window, &Input::MouseUp);
//! assert_eq!(effect.ripple_phase(id), Some(RipplePhase::Exiting));
//! host.advance_timers(&mut effect, Duration::from_millis(400));
//! assert_eq!(effect.ripple_phase(id), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with `std`.
//! - `libm`: build Kurbo with `libm` for `no_std` targets.
//! - `serde`: deserialize [`RippleOptions`] from partial documents.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod effect;
mod registry;
mod scaffold;

pub mod error;
pub mod geometry;
pub mod headless;
pub mod host;
pub mod input;
pub mod options;
pub mod ripple;
pub mod style;

pub use effect::RippleEffect;
pub use error::RippleError;
pub use options::{ResolvedOptions, RippleOptions};
pub use registry::{Registry, SharedEffect};
pub use ripple::{ExitPolicy, RippleEvent, RippleId, RipplePhase};
