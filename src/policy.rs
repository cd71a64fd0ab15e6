//! Tunable audit policy.
//!
//! The engine is calibrated against the constants in [`crate::defaults`];
//! `Policy::default()` reproduces them exactly. Callers that want a looser or
//! stricter audit build their own `Policy` and use the `*_with_policy` entry
//! points.

use crate::defaults;
use crate::types::{NumericError, non_negative};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Policy {
    /// Slack before content outside the viewBox counts as overflow
    pub tolerance: f64,
    /// Area ratio above which a viewBox is considered wasteful
    pub waste_ratio: f64,
    /// Per-axis factor the viewBox must exceed for an oversized finding
    pub axis_factor: f64,
    /// Floor for the padding used when growing an existing viewBox
    pub min_repair_padding: f64,
    /// Fraction of the smaller viewBox side used as repair padding
    pub repair_padding_fraction: f64,
    /// Padding used when a missing viewBox is synthesized
    pub missing_padding: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Policy {
            tolerance: defaults::TOLERANCE,
            waste_ratio: defaults::WASTE_RATIO,
            axis_factor: defaults::AXIS_FACTOR,
            min_repair_padding: defaults::MIN_REPAIR_PADDING,
            repair_padding_fraction: defaults::REPAIR_PADDING_FRACTION,
            missing_padding: defaults::MISSING_VIEWBOX_PADDING,
        }
    }
}

impl Policy {
    /// Default policy with a caller-chosen tolerance (rejects NaN, infinite, negative)
    pub fn try_new(tolerance: f64) -> Result<Self, NumericError> {
        let policy = Policy {
            tolerance,
            ..Policy::default()
        };
        policy.validate()?;
        Ok(policy)
    }

    /// Check every field, for policies assembled with struct update syntax
    pub fn validate(&self) -> Result<(), NumericError> {
        for value in [
            self.tolerance,
            self.waste_ratio,
            self.axis_factor,
            self.min_repair_padding,
            self.repair_padding_fraction,
            self.missing_padding,
        ] {
            non_negative(value)?;
        }
        Ok(())
    }

    /// Padding used when growing an existing viewBox of the given size
    pub fn repair_padding(&self, view_box_width: f64, view_box_height: f64) -> f64 {
        self.min_repair_padding
            .max(view_box_width.min(view_box_height) * self.repair_padding_fraction)
    }
}
