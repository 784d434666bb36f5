// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Options resolver: merge caller configuration over the built-in defaults.
//!
//! ## Overview
//!
//! [`RippleOptions`] is the partial record a caller hands to
//! [`RippleEffect::new`](crate::RippleEffect::new) or
//! [`Registry::attach_to`](crate::Registry::attach_to). Every field is optional.
//! [`RippleOptions::resolve`] fills the gaps and produces the
//! [`ResolvedOptions`] an instance keeps for its whole lifetime.
//!
//! | Field        | Default          |
//! |--------------|------------------|
//! | `color`      | `"currentColor"` |
//! | `opacity`    | `0.12`           |
//! | `duration`   | 400 ms           |
//! | `easing`     | `"ease-in"`      |
//! | `exit_delay` | 0 ms             |
//! | `unbounded`  | `false`          |
//! | `autoexit`   | `true`           |
//! | `rounded`    | `false`          |
//! | `centered`   | `false`          |
//! | `keydown`    | `true`           |
//! | `trigger`    | the target       |
//!
//! ```
//! use core::time::Duration;
//! use understory_ripple::options::{RippleFlags, RippleOptions};
//!
//! let resolved = RippleOptions::<u32>::new()
//!     .opacity(0.3)
//!     .centered(true)
//!     .resolve(7);
//! assert_eq!(resolved.opacity, 0.3);
//! assert_eq!(resolved.duration, Duration::from_millis(400));
//! assert!(resolved.flags.contains(RippleFlags::CENTERED | RippleFlags::AUTOEXIT));
//! assert_eq!(resolved.trigger, 7);
//! ```
//!
//! ## Serde
//!
//! With the `serde` feature, [`RippleOptions`] deserializes from a partial
//! document using the short key names (`exitdelay`, `autoexit`, ...).
//! Durations are given in milliseconds and unknown keys are ignored.
//! The trigger element is never read from a document.

use alloc::borrow::Cow;
use core::time::Duration;

use bitflags::bitflags;

/// Default ripple and hover color: inherit the wrapper's text color.
pub const DEFAULT_COLOR: &str = "currentColor";
/// Default peak opacity of ripples and the hover layer.
pub const DEFAULT_OPACITY: f64 = 0.12;
/// Default enter transition length.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(400);
/// Default timing function.
pub const DEFAULT_EASING: &str = "ease-in";

bitflags! {
    /// Boolean switches of a resolved configuration.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RippleFlags: u8 {
        /// Let ripples overflow the target's box.
        const UNBOUNDED = 0b0000_0001;
        /// Hold ripples until the press that spawned them is released.
        const AUTOEXIT  = 0b0000_0010;
        /// Clip the wrapper to a perfect circle.
        const ROUNDED   = 0b0000_0100;
        /// Always spawn pointer ripples from the center of the target.
        const CENTERED  = 0b0000_1000;
        /// Spawn ripples on key presses.
        const KEYDOWN   = 0b0001_0000;
    }
}

impl Default for RippleFlags {
    fn default() -> Self {
        Self::AUTOEXIT | Self::KEYDOWN
    }
}

/// Caller-supplied configuration; unset fields take the defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Deserialize),
    serde(default, bound = "")
)]
pub struct RippleOptions<E> {
    /// Ripple and hover color. An empty string also selects [`DEFAULT_COLOR`].
    pub color: Option<Cow<'static, str>>,
    /// Peak opacity, `0.0..=1.0`.
    pub opacity: Option<f64>,
    /// Enter transition length; the fade-out and hover transitions use half of it.
    #[cfg_attr(feature = "serde", serde(with = "millis"))]
    pub duration: Option<Duration>,
    /// Timing function handed to the host's transition engine.
    pub easing: Option<Cow<'static, str>>,
    /// Extra time a fully expanded ripple lingers before it may exit.
    #[cfg_attr(feature = "serde", serde(rename = "exitdelay", with = "millis"))]
    pub exit_delay: Option<Duration>,
    /// See [`RippleFlags::UNBOUNDED`].
    pub unbounded: Option<bool>,
    /// See [`RippleFlags::AUTOEXIT`].
    pub autoexit: Option<bool>,
    /// See [`RippleFlags::ROUNDED`].
    pub rounded: Option<bool>,
    /// See [`RippleFlags::CENTERED`].
    pub centered: Option<bool>,
    /// See [`RippleFlags::KEYDOWN`].
    pub keydown: Option<bool>,
    /// Element whose events drive the effect; defaults to the target.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub trigger: Option<E>,
}

impl<E> Default for RippleOptions<E> {
    fn default() -> Self {
        Self {
            color: None,
            opacity: None,
            duration: None,
            easing: None,
            exit_delay: None,
            unbounded: None,
            autoexit: None,
            rounded: None,
            centered: None,
            keydown: None,
            trigger: None,
        }
    }
}

impl<E> RippleOptions<E> {
    /// An empty configuration: every field resolves to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ripple color.
    pub fn color(mut self, color: impl Into<Cow<'static, str>>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set the peak opacity.
    pub fn opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Set the enter transition length.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the timing function.
    pub fn easing(mut self, easing: impl Into<Cow<'static, str>>) -> Self {
        self.easing = Some(easing.into());
        self
    }

    /// Set the exit delay.
    pub fn exit_delay(mut self, delay: Duration) -> Self {
        self.exit_delay = Some(delay);
        self
    }

    /// Allow ripples to overflow the target.
    pub fn unbounded(mut self, on: bool) -> Self {
        self.unbounded = Some(on);
        self
    }

    /// Hold ripples until release.
    pub fn autoexit(mut self, on: bool) -> Self {
        self.autoexit = Some(on);
        self
    }

    /// Clip to a circle.
    pub fn rounded(mut self, on: bool) -> Self {
        self.rounded = Some(on);
        self
    }

    /// Spawn pointer ripples from the center.
    pub fn centered(mut self, on: bool) -> Self {
        self.centered = Some(on);
        self
    }

    /// Enable or disable keyboard triggering.
    pub fn keydown(mut self, on: bool) -> Self {
        self.keydown = Some(on);
        self
    }

    /// Listen on a different element than the target.
    pub fn trigger(mut self, trigger: E) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Merge over the defaults. `target` becomes the trigger unless one was set.
    pub fn resolve(self, target: E) -> ResolvedOptions<E> {
        let mut flags = RippleFlags::default();
        for (value, flag) in [
            (self.unbounded, RippleFlags::UNBOUNDED),
            (self.autoexit, RippleFlags::AUTOEXIT),
            (self.rounded, RippleFlags::ROUNDED),
            (self.centered, RippleFlags::CENTERED),
            (self.keydown, RippleFlags::KEYDOWN),
        ] {
            if let Some(on) = value {
                flags.set(flag, on);
            }
        }
        ResolvedOptions {
            color: self
                .color
                .filter(|c| !c.is_empty())
                .unwrap_or(Cow::Borrowed(DEFAULT_COLOR)),
            opacity: self.opacity.unwrap_or(DEFAULT_OPACITY),
            duration: self.duration.unwrap_or(DEFAULT_DURATION),
            easing: self.easing.unwrap_or(Cow::Borrowed(DEFAULT_EASING)),
            exit_delay: self.exit_delay.unwrap_or(Duration::ZERO),
            flags,
            trigger: self.trigger.unwrap_or(target),
        }
    }
}

/// Complete configuration held by an instance; never changes after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedOptions<E> {
    /// Ripple and hover color.
    pub color: Cow<'static, str>,
    /// Peak opacity of ripples and the hover layer.
    pub opacity: f64,
    /// Enter transition length.
    pub duration: Duration,
    /// Timing function.
    pub easing: Cow<'static, str>,
    /// Linger time after the enter transition.
    pub exit_delay: Duration,
    /// Boolean switches.
    pub flags: RippleFlags,
    /// Element whose events drive the effect.
    pub trigger: E,
}

impl<E> ResolvedOptions<E> {
    /// Time from full expansion until an exit may begin.
    pub fn hold_time(&self) -> Duration {
        self.duration.saturating_add(self.exit_delay)
    }

    /// Length of opacity transitions (fade-in, fade-out, hover).
    pub fn fade_time(&self) -> Duration {
        self.duration / 2
    }

    /// Whether ripples wait for the spawning press to be released.
    pub fn autoexit(&self) -> bool {
        self.flags.contains(RippleFlags::AUTOEXIT)
    }
}

#[cfg(feature = "serde")]
mod millis {
    use core::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(ms) = Option::<f64>::deserialize(deserializer)? else {
            return Ok(None);
        };
        Duration::try_from_secs_f64(ms / 1000.0)
            .map(Some)
            .map_err(serde::de::Error::custom)
    }
}
