// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry resolver: ripple origin and covering diameter.
//!
//! A ripple is a circle centered at its origin. Its diameter is the smallest
//! one that still covers every corner of the wrapper box, so the expanded
//! ripple always fills the whole target:
//!
//! ```text
//! diameter = 2 × hypot(max(x, w − x), max(y, h − y))
//! ```
//!
//! ```
//! use kurbo::{Point, Size};
//! use understory_ripple::geometry::cover_diameter;
//!
//! let d = cover_diameter(Size::new(100.0, 60.0), Point::new(20.0, 10.0));
//! assert!((d - 188.68).abs() < 0.01);
//! ```

use kurbo::{Point, Rect, Size, Vec2};

/// How the origin of a ripple is chosen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Contact {
    /// A pointer or touch position in client coordinates.
    Client(Point),
    /// The center of the wrapper box.
    Center,
}

/// Origin (relative to the wrapper box) and diameter of one ripple.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RippleGeometry {
    /// Center of the ripple, relative to the wrapper's top-left corner.
    pub origin: Point,
    /// Diameter of the fully expanded ripple.
    pub diameter: f64,
}

impl RippleGeometry {
    /// Geometry of a ripple at a wrapper-relative `origin` in a box of `size`.
    pub fn at(origin: Point, size: Size) -> Self {
        Self {
            origin,
            diameter: cover_diameter(size, origin),
        }
    }
}

/// Diameter of the smallest circle centered at `origin` that covers the box `size`.
pub fn cover_diameter(size: Size, origin: Point) -> f64 {
    let reach = Vec2::new(
        origin.x.max(size.width - origin.x),
        origin.y.max(size.height - origin.y),
    );
    2.0 * reach.hypot()
}

/// Resolve a contact into a wrapper-relative origin.
///
/// Client positions are shifted by the wrapper's top-left corner; `centered`
/// forces the center regardless of where the contact happened.
pub fn resolve_origin(contact: Contact, wrapper: Rect, centered: bool) -> Point {
    match contact {
        Contact::Client(p) if !centered => Point::new(p.x - wrapper.x0, p.y - wrapper.y0),
        Contact::Client(_) | Contact::Center => {
            Point::new(wrapper.width() / 2.0, wrapper.height() / 2.0)
        }
    }
}
