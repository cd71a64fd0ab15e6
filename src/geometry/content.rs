//! Content bounds aggregation

use crate::log::trace;
use crate::types::{Bounds, BoundingBox};

use super::shapes::{Bounded, ShapePrimitive};

/// Union of every primitive's box, plus how many primitives contributed
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentBounds {
    pub bbox: BoundingBox,
    pub contributors: usize,
}

impl ContentBounds {
    /// True iff at least one primitive produced a non-empty box
    pub fn has_content(&self) -> bool {
        self.contributors > 0
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bbox.bounds()
    }

    /// Fold in one more primitive box
    pub fn add(mut self, bbox: BoundingBox) -> Self {
        if !bbox.is_empty() {
            self.contributors += 1;
            self.bbox = self.bbox.union(bbox);
        }
        self
    }
}

/// Fold all primitives into a single content box.
///
/// Union is associative and commutative with `Empty` as identity, so the
/// result does not depend on the order primitives are supplied in.
pub fn aggregate<'a, I>(primitives: I) -> ContentBounds
where
    I: IntoIterator<Item = &'a ShapePrimitive>,
{
    primitives
        .into_iter()
        .fold(ContentBounds::default(), |acc, shape| {
            let bbox = shape.bounds();
            trace!(tag = shape.tag(), ?bbox, "primitive bounds");
            acc.add(bbox)
        })
}
