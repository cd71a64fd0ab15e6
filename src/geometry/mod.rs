//! Geometry extraction for SVG icons
//!
//! This module is organized into submodules:
//! - `tokenize`: pulls plain decimal numbers out of path data and point lists
//! - `shapes`: one bounds function per shape primitive
//! - `content`: folds primitive boxes into the document's content box

pub mod content;
pub mod shapes;
pub mod tokenize;

pub use content::{ContentBounds, aggregate};
pub use shapes::{
    Bounded, CircleShape, EllipseShape, LineShape, PathShape, PolyShape, RectShape,
    ShapePrimitive,
};
pub use tokenize::{leading_number, pair_points, path_points, point_list, tokenize};
