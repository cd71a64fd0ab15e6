//! viewBox comparison: does the declared viewBox fit the drawn content?
//!
//! Two independent findings:
//! - overflow: content pokes out of the viewBox by more than the tolerance
//! - oversized: the viewBox wastes most of its area around small content
//!
//! A document can have either, both, or neither.

use crate::errors::AuditIssue;
use crate::log::debug;
use crate::policy::Policy;
use crate::types::Bounds;
use crate::viewport::{ViewBox, Viewport};

/// Classification of a content/viewBox pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    None,
    Overflow,
    Oversized,
    /// Content overflows on one side while the box is far too big overall
    OverflowAndOversized,
}

impl MismatchKind {
    fn from_flags(overflow: bool, oversized: bool) -> Self {
        match (overflow, oversized) {
            (false, false) => MismatchKind::None,
            (true, false) => MismatchKind::Overflow,
            (false, true) => MismatchKind::Oversized,
            (true, true) => MismatchKind::OverflowAndOversized,
        }
    }

    pub fn is_overflow(self) -> bool {
        matches!(self, MismatchKind::Overflow | MismatchKind::OverflowAndOversized)
    }

    pub fn is_oversized(self) -> bool {
        matches!(self, MismatchKind::Oversized | MismatchKind::OverflowAndOversized)
    }
}

/// Result of comparing one document's content box with its viewport
#[derive(Debug, Clone, PartialEq)]
pub struct MismatchReport {
    pub has_mismatch: bool,
    pub kind: MismatchKind,
    pub content_bounds: Option<Bounds>,
    pub viewport: Viewport,
    /// Issue text for every finding, joined with "; "
    pub detail: String,
}

impl MismatchReport {
    /// The findings as audit issues, overflow first
    pub fn issues(&self) -> Vec<AuditIssue> {
        let (Some(content), Some(view_box)) = (self.content_bounds, self.viewport.view_box) else {
            return Vec::new();
        };
        let mut issues = Vec::new();
        if self.kind.is_overflow() {
            issues.push(AuditIssue::Overflow {
                content,
                view_box: view_box.bounds(),
            });
        }
        if self.kind.is_oversized() {
            issues.push(AuditIssue::Oversized {
                view_box_size: view_box.size,
                content_size: content.size(),
            });
        }
        issues
    }
}

/// Content extends past the viewBox by more than `tolerance` on any side.
///
/// Exactly `tolerance` outside is still inside.
pub fn overflows(content: &Bounds, view_box: &ViewBox, tolerance: f64) -> bool {
    let vb_min = view_box.origin;
    let vb_max = view_box.max();
    content.max.x > vb_max.x + tolerance
        || content.max.y > vb_max.y + tolerance
        || content.min.x < vb_min.x - tolerance
        || content.min.y < vb_min.y - tolerance
}

/// viewBox area dwarfs the content area and is much wider or taller.
///
/// A content box with zero width or height has no meaningful area ratio and
/// is never oversized.
pub fn is_oversized(content: &Bounds, view_box: &ViewBox, policy: &Policy) -> bool {
    let content_size = content.size();
    if content_size.x <= 0.0 || content_size.y <= 0.0 {
        return false;
    }
    let waste = (view_box.size.x * view_box.size.y) / (content_size.x * content_size.y);
    waste > policy.waste_ratio
        && (view_box.size.x > content_size.x * policy.axis_factor
            || view_box.size.y > content_size.y * policy.axis_factor)
}

/// Compare with the default policy
pub fn compare(content: Bounds, viewport: Viewport) -> Option<MismatchReport> {
    compare_with_policy(content, viewport, &Policy::default())
}

/// Classify `content` against `viewport`.
///
/// Returns `None` when the viewport declares no viewBox; there is nothing to
/// compare against and the repair planner handles that case.
pub fn compare_with_policy(
    content: Bounds,
    viewport: Viewport,
    policy: &Policy,
) -> Option<MismatchReport> {
    let view_box = viewport.view_box?;
    let kind = MismatchKind::from_flags(
        overflows(&content, &view_box, policy.tolerance),
        is_oversized(&content, &view_box, policy),
    );
    debug!(?kind, %content, %view_box, "compared viewBox");

    let mut report = MismatchReport {
        has_mismatch: kind != MismatchKind::None,
        kind,
        content_bounds: Some(content),
        viewport,
        detail: String::new(),
    };
    report.detail = report
        .issues()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Some(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn content(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::from_corners(dvec2(x0, y0), dvec2(x1, y1))
    }

    fn viewport(raw: &str) -> Viewport {
        Viewport::from_attributes(Some(raw), None, None).unwrap()
    }

    // ==================== overflow tests ====================

    #[test]
    fn exactly_at_tolerance_is_inside() {
        let vb = ViewBox::new(0.0, 0.0, 20.0, 20.0);
        assert!(!overflows(&content(0.0, 0.0, 25.0, 10.0), &vb, 5.0));
        assert!(overflows(&content(0.0, 0.0, 25.000001, 10.0), &vb, 5.0));
    }

    #[test]
    fn overflow_on_min_side() {
        let vb = ViewBox::new(0.0, 0.0, 20.0, 20.0);
        assert!(!overflows(&content(-5.0, -5.0, 10.0, 10.0), &vb, 5.0));
        assert!(overflows(&content(-5.5, 0.0, 10.0, 10.0), &vb, 5.0));
        assert!(overflows(&content(0.0, -6.0, 10.0, 10.0), &vb, 5.0));
    }

    #[test]
    fn rect_bigger_than_icon_overflows() {
        let report = compare(content(0.0, 0.0, 50.0, 50.0), viewport("0 0 24 24")).unwrap();
        assert!(report.has_mismatch);
        assert_eq!(report.kind, MismatchKind::Overflow);
        assert!(!report.kind.is_oversized());
        assert_eq!(
            report.detail,
            "Path coordinates (0.0, 0.0) to (50.0, 50.0) extend outside viewBox (0, 0) to (24, 24)"
        );
    }

    // ==================== oversized tests ====================

    #[test]
    fn tiny_content_in_huge_box_is_oversized() {
        let report = compare(content(10.0, 10.0, 20.0, 20.0), viewport("0 0 100 100")).unwrap();
        assert_eq!(report.kind, MismatchKind::Oversized);
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].kind(), "VIEWBOX_TOO_LARGE");
    }

    #[test]
    fn modest_margin_is_not_oversized() {
        // area ratio 4
        let vb = ViewBox::new(0.0, 0.0, 20.0, 20.0);
        assert!(!is_oversized(&content(0.0, 0.0, 10.0, 10.0), &vb, &Policy::default()));
    }

    #[test]
    fn degenerate_content_is_never_oversized() {
        let vb = ViewBox::new(0.0, 0.0, 1000.0, 1000.0);
        assert!(!is_oversized(&content(5.0, 5.0, 5.0, 9.0), &vb, &Policy::default()));
        assert!(!is_oversized(&content(5.0, 5.0, 9.0, 5.0), &vb, &Policy::default()));
    }

    #[test]
    fn both_findings_can_fire() {
        let report = compare(content(-20.0, 0.0, -10.0, 5.0), viewport("0 0 200 200")).unwrap();
        assert_eq!(report.kind, MismatchKind::OverflowAndOversized);
        let kinds: Vec<_> = report.issues().iter().map(|i| i.kind()).collect();
        assert_eq!(kinds, ["VIEWBOX_MISMATCH", "VIEWBOX_TOO_LARGE"]);
    }

    #[test]
    fn fitting_content_is_clean() {
        let report = compare(content(2.0, 2.0, 22.0, 22.0), viewport("0 0 24 24")).unwrap();
        assert!(!report.has_mismatch);
        assert_eq!(report.kind, MismatchKind::None);
        assert!(report.detail.is_empty());
    }

    #[test]
    fn missing_view_box_is_not_compared() {
        let viewport = Viewport::default();
        assert_eq!(compare(content(0.0, 0.0, 1.0, 1.0), viewport), None);
    }

    #[test]
    fn custom_tolerance() {
        let policy = Policy::try_new(0.0).unwrap();
        let report =
            compare_with_policy(content(0.0, 0.0, 24.5, 24.0), viewport("0 0 24 24"), &policy)
                .unwrap();
        assert!(report.kind.is_overflow());
    }
}
