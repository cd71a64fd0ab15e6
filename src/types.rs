//! Geometry value types for iconbox.
//!
//! Coordinates are SVG user units stored as `f64` inside `glam::DVec2`.
//! A bounding box is either `Empty` or a real `Bounds`; there are no
//! `f64::MAX` sentinels, so "nothing seen yet" is a state you can match on.

use std::fmt;

use glam::{DVec2, dvec2};

/// A 2D coordinate sample (transient, never stored past bounds extraction)
pub type Point = DVec2;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
        }
    }
}

impl std::error::Error for NumericError {}

/// Validate a value that must be finite and `>= 0`.
pub fn non_negative(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Axis-aligned rectangle with `min <= max` on both axes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    /// Build from any two opposite corners; components are sorted so the
    /// invariant holds even for negative widths or radii.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Bounds {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Build from an origin and a size, the way a viewBox is declared.
    pub fn from_origin_size(origin: Point, size: Point) -> Self {
        Self::from_corners(origin, origin + size)
    }

    /// Degenerate box around a single point
    pub fn point(p: Point) -> Self {
        Bounds { min: p, max: p }
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> Point {
        self.max - self.min
    }

    /// All corners coincide: no visible extent on either axis.
    pub fn is_point(&self) -> bool {
        self.min == self.max
    }

    /// Component-wise min/max
    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow by `amount` on every side
    pub fn expand(self, amount: f64) -> Bounds {
        let pad = dvec2(amount, amount);
        Bounds {
            min: self.min - pad,
            max: self.max + pad,
        }
    }

    /// Does `self` fully enclose `other`?
    pub fn contains(&self, other: &Bounds) -> bool {
        self.min.cmple(other.min).all() && self.max.cmpge(other.max).all()
    }
}

/// Either nothing at all, or a real box.
///
/// `Empty` is the identity for [`BoundingBox::union`], so folding any number
/// of shape boxes never needs a special first case.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum BoundingBox {
    #[default]
    Empty,
    Bounds(Bounds),
}

impl BoundingBox {
    pub fn is_empty(&self) -> bool {
        matches!(self, BoundingBox::Empty)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            BoundingBox::Empty => None,
            BoundingBox::Bounds(b) => Some(*b),
        }
    }

    pub fn union(self, other: BoundingBox) -> BoundingBox {
        match (self, other) {
            (BoundingBox::Empty, b) | (b, BoundingBox::Empty) => b,
            (BoundingBox::Bounds(a), BoundingBox::Bounds(b)) => BoundingBox::Bounds(a.union(b)),
        }
    }

    /// Expand to include a point
    pub fn include(self, p: Point) -> BoundingBox {
        self.union(BoundingBox::Bounds(Bounds::point(p)))
    }
}

impl From<Bounds> for BoundingBox {
    fn from(b: Bounds) -> Self {
        BoundingBox::Bounds(b)
    }
}

impl FromIterator<Point> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        iter.into_iter().fold(BoundingBox::Empty, BoundingBox::include)
    }
}

impl FromIterator<BoundingBox> for BoundingBox {
    fn from_iter<I: IntoIterator<Item = BoundingBox>>(iter: I) -> Self {
        iter.into_iter().fold(BoundingBox::Empty, BoundingBox::union)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}) to ({:.1}, {:.1})",
            self.min.x, self.min.y, self.max.x, self.max.y
        )
    }
}
