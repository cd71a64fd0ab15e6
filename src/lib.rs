//! Audit and repair of SVG icon viewBoxes.
//!
//! The content of an icon is measured from its shape primitives and compared
//! with the declared `viewBox`. Content spilling outside the box is an
//! overflow; a box that dwarfs its content is oversized. Missing and
//! overflowing viewBoxes can be repaired by splicing a new attribute into the
//! original text.

mod log;

pub mod analyze;
pub mod batch;
pub mod compare;
pub mod defaults;
pub mod dimensions;
pub mod document;
pub mod errors;
pub mod geometry;
pub mod policy;
pub mod repair;
pub mod rewrite;
pub mod types;
pub mod viewport;

pub use analyze::{AnalysisReport, analyze, analyze_named, analyze_with_policy};
pub use batch::{BatchInput, BatchSummary, analyze_batch, repair_batch, to_csv};
pub use compare::{MismatchKind, MismatchReport, compare, compare_with_policy};
pub use errors::{AuditIssue, SourceContext};
pub use policy::Policy;
pub use repair::{RepairAction, RepairPlan};
pub use rewrite::{RepairOutcome, apply_view_box, repair};
pub use types::{BoundingBox, Bounds, Point};
pub use viewport::{ViewBox, Viewport};

/// Fail with the first issue found in an SVG document, if any.
pub fn check(source: &str) -> Result<AnalysisReport, miette::Report> {
    let mut report = analyze(source);
    if report.issues.is_empty() {
        return Ok(report);
    }
    Err(miette::Report::new(report.issues.remove(0)))
}

/// Repair an SVG document's viewBox.
///
/// Returns the rewritten text, or the original text when nothing needed
/// fixing, or an error with diagnostics when the document cannot be fixed.
pub fn fix(source: &str) -> Result<String, miette::Report> {
    let outcome = repair(source);
    if let Some(issue) = outcome.errors.into_iter().next() {
        return Err(miette::Report::new(issue));
    }
    Ok(outcome.output.unwrap_or_else(|| source.to_owned()))
}
