//! viewBox repair planning
//!
//! Repairs only ever grow a viewport. A missing viewBox is synthesized around
//! the content; an overflowing one is widened to cover both its old area and
//! the padded content. Results are snapped to whole units in the direction
//! that keeps the content inside.

use glam::DVec2;

use crate::compare::MismatchReport;
use crate::log::debug;
use crate::policy::Policy;
use crate::types::Bounds;
use crate::viewport::ViewBox;

/// What the rewriter has to do with the root element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RepairAction {
    /// No viewBox attribute exists; add one
    Insert(ViewBox),
    /// Replace the existing viewBox value
    Replace { old: ViewBox, new: ViewBox },
}

impl RepairAction {
    pub fn view_box(&self) -> ViewBox {
        match self {
            RepairAction::Insert(vb) | RepairAction::Replace { new: vb, .. } => *vb,
        }
    }
}

/// A computed replacement viewBox and why it was chosen
#[derive(Debug, Clone, PartialEq)]
pub struct RepairPlan {
    pub action: RepairAction,
    pub rationale: String,
}

impl RepairPlan {
    pub fn new_view_box(&self) -> ViewBox {
        self.action.view_box()
    }
}

fn snap_outward(min: DVec2, max: DVec2) -> ViewBox {
    let min = min.floor();
    let max = max.ceil();
    ViewBox {
        origin: min,
        size: max - min,
    }
}

/// viewBox for a document that declares none: content plus fixed padding.
///
/// The origin is floored and the padded extent ceiled on its own, so the box
/// still reaches past the content's far edge by at least `padding - 1`.
pub fn plan_missing(content: Bounds, policy: &Policy) -> RepairPlan {
    let padding = policy.missing_padding;
    let view_box = ViewBox {
        origin: (content.min - padding).floor(),
        size: (content.size() + 2.0 * padding).ceil(),
    };
    debug!(%content, %view_box, "synthesized missing viewBox");
    RepairPlan {
        action: RepairAction::Insert(view_box),
        rationale: format!("Added missing viewBox: \"{view_box}\""),
    }
}

/// Grow `old` so it covers itself and the padded content
pub fn plan_grow(old: ViewBox, content: Bounds, policy: &Policy) -> RepairPlan {
    let padding = policy.repair_padding(old.size.x, old.size.y);
    let padded = content.expand(padding);
    let view_box = snap_outward(old.origin.min(padded.min), old.max().max(padded.max));
    debug!(%old, %view_box, padding, "grew viewBox");
    RepairPlan {
        action: RepairAction::Replace { old, new: view_box },
        rationale: format!("Fixed viewBox mismatch: \"{old}\" → \"{view_box}\""),
    }
}

/// Plan a repair for a compared document.
///
/// Only overflow is repaired. An oversized viewBox is reported but left
/// alone, since shrinking could clip content the positional path sampling
/// missed.
pub fn plan_repair(report: &MismatchReport, policy: &Policy) -> Option<RepairPlan> {
    if !report.kind.is_overflow() {
        return None;
    }
    let content = report.content_bounds?;
    let old = report.viewport.view_box?;
    Some(plan_grow(old, content, policy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare;
    use crate::viewport::Viewport;
    use glam::dvec2;

    fn content(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds::from_corners(dvec2(x0, y0), dvec2(x1, y1))
    }

    fn viewport(raw: &str) -> Viewport {
        Viewport::from_attributes(Some(raw), None, None).unwrap()
    }

    // ==================== missing viewBox tests ====================

    #[test]
    fn missing_pads_by_ten() {
        let plan = plan_missing(content(2.0, 3.0, 10.0, 20.0), &Policy::default());
        assert_eq!(plan.new_view_box().to_string(), "-8 -7 28 37");
        assert!(matches!(plan.action, RepairAction::Insert(_)));
        assert_eq!(plan.rationale, "Added missing viewBox: \"-8 -7 28 37\"");
    }

    #[test]
    fn missing_ceils_the_extent_not_the_far_corner() {
        let content = content(0.4, 0.6, 11.2, 11.5);
        let vb = plan_missing(content, &Policy::default()).new_view_box();
        // origin floor(-9.6, -9.4), extent ceil(30.8, 30.9)
        assert_eq!(vb.to_string(), "-10 -10 31 31");
        assert!(vb.bounds().contains(&content));
        assert!(vb.max().cmpge(content.max + 9.0).all());
    }

    #[test]
    fn missing_whole_numbers_are_exact() {
        let vb = plan_missing(content(-4.0, 0.0, 4.0, 2.0), &Policy::default()).new_view_box();
        assert_eq!(vb, ViewBox::new(-14.0, -10.0, 28.0, 22.0));
    }

    // ==================== grow tests ====================

    #[test]
    fn grow_rect_example() {
        let report = compare(content(0.0, 0.0, 50.0, 50.0), viewport("0 0 24 24")).unwrap();
        let plan = plan_repair(&report, &Policy::default()).unwrap();
        assert_eq!(plan.new_view_box().to_string(), "-10 -10 70 70");
        insta::assert_snapshot!(plan.rationale, @r#"Fixed viewBox mismatch: "0 0 24 24" → "-10 -10 70 70""#);
    }

    #[test]
    fn grow_uses_proportional_padding_for_big_boxes() {
        let old = ViewBox::new(0.0, 0.0, 400.0, 400.0);
        let plan = plan_grow(old, content(-50.0, 10.0, 390.0, 390.0), &Policy::default());
        // padding = max(10, 400 * 0.05) = 20
        assert_eq!(plan.new_view_box(), ViewBox::new(-70.0, -10.0, 480.0, 420.0));
    }

    #[test]
    fn grow_never_shrinks() {
        let old = ViewBox::new(-3.5, -3.5, 30.0, 30.0);
        let content = content(-12.0, 0.0, 10.0, 10.0);
        let new = plan_grow(old, content, &Policy::default()).new_view_box();
        let (old_b, new_b) = (old.bounds(), new.bounds());
        assert!(new_b.min.cmple(old_b.min).all());
        assert!(new_b.max.cmpge(old_b.max).all());
        assert!(new_b.contains(&content));
    }

    #[test]
    fn repaired_box_passes_comparison() {
        let report = compare(content(-7.0, 3.0, 61.3, 40.0), viewport("0 0 24 24")).unwrap();
        let plan = plan_repair(&report, &Policy::default()).unwrap();
        let fixed = Viewport {
            view_box: Some(plan.new_view_box()),
            ..Viewport::default()
        };
        let again = compare(content(-7.0, 3.0, 61.3, 40.0), fixed).unwrap();
        assert!(!again.kind.is_overflow());
    }

    #[test]
    fn oversized_alone_is_not_repaired() {
        let report = compare(content(10.0, 10.0, 20.0, 20.0), viewport("0 0 100 100")).unwrap();
        assert!(report.has_mismatch);
        assert_eq!(plan_repair(&report, &Policy::default()), None);
    }

    #[test]
    fn clean_report_has_no_plan() {
        let report = compare(content(1.0, 1.0, 23.0, 23.0), viewport("0 0 24 24")).unwrap();
        assert_eq!(plan_repair(&report, &Policy::default()), None);
    }
}
