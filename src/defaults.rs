//! Fixed audit and repair policy constants (SVG user units unless noted)

/// Slack allowed between content bounds and the declared viewBox
pub const TOLERANCE: f64 = 5.0;

/// viewBox area / content area above which a viewBox counts as oversized
pub const WASTE_RATIO: f64 = 10.0;

/// An oversized viewBox must also exceed the content by this factor on one axis
pub const AXIS_FACTOR: f64 = 2.0;

/// Minimum padding added around content when growing an existing viewBox
pub const MIN_REPAIR_PADDING: f64 = 10.0;

/// Fraction of the smaller viewBox side used as padding when that exceeds the minimum
pub const REPAIR_PADDING_FRACTION: f64 = 0.05;

/// Padding around content when a viewBox has to be invented
pub const MISSING_VIEWBOX_PADDING: f64 = 10.0;

/// Declared icon width/height after normalization
pub const ICON_SIZE: u32 = 15;

/// Documents shorter than this many characters get a short-content warning
pub const SHORT_CONTENT_CHARS: usize = 50;
