// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One effect per target: an explicit association from element to instance.
//!
//! ## Retention
//!
//! The registry holds instances weakly. Callers own the [`SharedEffect`]
//! handles returned by [`Registry::attach_to`]; once every handle is dropped
//! the instance is gone and the next `attach_to` builds a fresh one. Dropping
//! an instance does not tear it down, so call `destroy` first when the
//! scaffold should go away with it.
//!
//! Destroyed instances count as absent even while handles to them survive.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::effect::RippleEffect;
use crate::error::RippleError;
use crate::host::Host;
use crate::options::RippleOptions;

/// Shared handle to a registered instance.
pub type SharedEffect<E> = Rc<RefCell<RippleEffect<E>>>;

/// Map from target element to its single live effect.
pub struct Registry<E> {
    entries: HashMap<E, Weak<RefCell<RippleEffect<E>>>>,
}

impl<E: Debug> Debug for Registry<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Registry")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<E: Copy + Eq + Hash + Debug> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

fn live<E: Copy + Eq + Hash + Debug>(
    weak: &Weak<RefCell<RippleEffect<E>>>,
) -> Option<SharedEffect<E>> {
    let effect = weak.upgrade()?;
    // An instance borrowed by a caller right now is in use, hence alive.
    let destroyed = effect.try_borrow().is_ok_and(|e| e.is_destroyed());
    (!destroyed).then_some(effect)
}

impl<E: Copy + Eq + Hash + Debug> Registry<E> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// The live instance attached to `target`, if any.
    pub fn get(&self, target: &E) -> Option<SharedEffect<E>> {
        live(self.entries.get(target)?)
    }

    /// Return the instance attached to `target`, creating it on first use.
    ///
    /// `options` are only consulted when a new instance is built.
    pub fn attach_to<H: Host<Element = E>>(
        &mut self,
        host: &mut H,
        target: E,
        options: RippleOptions<E>,
    ) -> Result<SharedEffect<E>, RippleError> {
        if let Some(existing) = self.get(&target) {
            return Ok(existing);
        }
        let effect = Rc::new(RefCell::new(RippleEffect::new(host, target, options)?));
        self.prune();
        self.entries.insert(target, Rc::downgrade(&effect));
        Ok(effect)
    }

    /// Destroy the instance attached to `target` and forget it.
    ///
    /// Returns whether a live instance was found.
    pub fn destroy<H: Host<Element = E>>(&mut self, host: &mut H, target: &E) -> bool {
        let Some(effect) = self.entries.remove(target).and_then(|w| live(&w)) else {
            return false;
        };
        effect.borrow_mut().destroy(host);
        true
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.entries.values().filter(|w| live(w).is_some()).count()
    }

    /// Whether no live instance is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget dropped and destroyed instances.
    pub fn prune(&mut self) {
        self.entries.retain(|_, w| live(w).is_some());
    }
}
