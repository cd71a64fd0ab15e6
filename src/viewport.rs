//! Declared viewport: the root `viewBox`, `width` and `height` attributes

use std::fmt;

use glam::dvec2;

use crate::errors::ViewportError;
use crate::geometry::tokenize::leading_number;
use crate::types::{Bounds, Point};

/// A parsed `viewBox="minX minY width height"`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewBox {
    pub origin: Point,
    pub size: Point,
}

impl ViewBox {
    pub fn new(min_x: f64, min_y: f64, width: f64, height: f64) -> Self {
        ViewBox {
            origin: dvec2(min_x, min_y),
            size: dvec2(width, height),
        }
    }

    /// Parse the attribute text.
    ///
    /// Items are separated by whitespace or commas. Exactly four finite
    /// numbers are required and the size must not be negative.
    pub fn parse(raw: &str) -> Result<Self, ViewportError> {
        let invalid = || ViewportError::InvalidFormat { raw: raw.to_owned() };

        let parts = raw
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok().filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .ok_or_else(invalid)?;

        let &[min_x, min_y, width, height] = parts.as_slice() else {
            return Err(invalid());
        };
        if width < 0.0 || height < 0.0 {
            return Err(invalid());
        }
        Ok(ViewBox::new(min_x, min_y, width, height))
    }

    pub fn max(&self) -> Point {
        self.origin + self.size
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.origin, self.size)
    }

    /// Smallest viewBox covering `bounds`
    pub fn from_bounds(bounds: Bounds) -> Self {
        ViewBox {
            origin: bounds.min,
            size: bounds.size(),
        }
    }
}

/// Canonical attribute text. Whole numbers print without a fraction.
impl fmt::Display for ViewBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print "-0"
        let c = |v: f64| if v == 0.0 { 0.0 } else { v };
        write!(
            f,
            "{} {} {} {}",
            c(self.origin.x),
            c(self.origin.y),
            c(self.size.x),
            c(self.size.y)
        )
    }
}

/// Everything the root element declares about its drawing area
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Viewport {
    pub view_box: Option<ViewBox>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl Viewport {
    /// Build from raw root attributes.
    ///
    /// An absent `viewBox` is fine (`view_box` is `None`); a present but
    /// malformed one is an error. `width`/`height` are lenient.
    pub fn from_attributes(
        view_box: Option<&str>,
        width: Option<&str>,
        height: Option<&str>,
    ) -> Result<Self, ViewportError> {
        Ok(Viewport {
            view_box: view_box.map(ViewBox::parse).transpose()?,
            width: width.and_then(leading_number),
            height: height.and_then(leading_number),
        })
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.view_box.map(|vb| vb.bounds())
    }
}
