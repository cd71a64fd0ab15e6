//! Shape primitives and their bounding boxes
//!
//! Each SVG drawing element becomes its own small type that knows how to
//! compute its axis-aligned box. `ShapePrimitive` is the closed set of them,
//! dispatched with `enum_dispatch` so adding a shape means adding a variant
//! and the compiler points at every place that has to care.
//!
//! Missing numeric attributes are `0` by the time a shape is built. That can
//! yield a box the author never meant (a `rect` with only a size sits at the
//! origin); the audit accepts that.

use enum_dispatch::enum_dispatch;

use crate::types::{Bounds, BoundingBox, Point};

use super::tokenize::path_points;

/// Anything that occupies an axis-aligned extent
#[enum_dispatch]
pub trait Bounded {
    /// Box of the drawn geometry, or `Empty` when the shape contributes nothing
    fn bounds(&self) -> BoundingBox;

    /// SVG element name this shape was read from
    fn tag(&self) -> &'static str;
}

// ============================================================================
// Shape Types
// ============================================================================

/// A `path` element, kept as raw `d` text
#[derive(Debug, Clone, PartialEq)]
pub struct PathShape {
    pub data: String,
}

impl PathShape {
    pub fn new(data: impl Into<String>) -> Self {
        PathShape { data: data.into() }
    }
}

impl Bounded for PathShape {
    fn bounds(&self) -> BoundingBox {
        let bbox: BoundingBox = path_points(&self.data).into_iter().collect();
        match bbox {
            // A move-to-only path (every sample identical) draws nothing visible
            BoundingBox::Bounds(b) if b.is_point() => BoundingBox::Empty,
            other => other,
        }
    }

    fn tag(&self) -> &'static str {
        "path"
    }
}

/// A `circle` element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CircleShape {
    pub center: Point,
    pub r: f64,
}

impl Bounded for CircleShape {
    fn bounds(&self) -> BoundingBox {
        if self.r <= 0.0 {
            return BoundingBox::Empty;
        }
        let half = Point::splat(self.r);
        Bounds::from_corners(self.center - half, self.center + half).into()
    }

    fn tag(&self) -> &'static str {
        "circle"
    }
}

/// A `rect` element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RectShape {
    pub origin: Point,
    pub size: Point,
}

impl Bounded for RectShape {
    fn bounds(&self) -> BoundingBox {
        // One positive side is enough: a zero-height rect still spans its width
        if self.size.x <= 0.0 && self.size.y <= 0.0 {
            return BoundingBox::Empty;
        }
        Bounds::from_origin_size(self.origin, self.size).into()
    }

    fn tag(&self) -> &'static str {
        "rect"
    }
}

/// An `ellipse` element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EllipseShape {
    pub center: Point,
    pub radii: Point,
}

impl Bounded for EllipseShape {
    fn bounds(&self) -> BoundingBox {
        if self.radii.x <= 0.0 && self.radii.y <= 0.0 {
            return BoundingBox::Empty;
        }
        Bounds::from_corners(self.center - self.radii, self.center + self.radii).into()
    }

    fn tag(&self) -> &'static str {
        "ellipse"
    }
}

/// A `line` element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineShape {
    pub from: Point,
    pub to: Point,
}

impl Bounded for LineShape {
    /// Always contributes, even at zero length (unlike a path).
    fn bounds(&self) -> BoundingBox {
        Bounds::from_corners(self.from, self.to).into()
    }

    fn tag(&self) -> &'static str {
        "line"
    }
}

/// A `polygon` or `polyline` element
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolyShape {
    pub points: Vec<Point>,
    pub closed: bool,
}

impl Bounded for PolyShape {
    fn bounds(&self) -> BoundingBox {
        self.points.iter().copied().collect()
    }

    fn tag(&self) -> &'static str {
        if self.closed { "polygon" } else { "polyline" }
    }
}

// ============================================================================
// Shape Enum
// ============================================================================

/// One drawing primitive read from a document
#[enum_dispatch(Bounded)]
#[derive(Debug, Clone, PartialEq)]
pub enum ShapePrimitive {
    Path(PathShape),
    Circle(CircleShape),
    Rect(RectShape),
    Ellipse(EllipseShape),
    Line(LineShape),
    Poly(PolyShape),
}
