//! Text splicing of repaired viewBoxes.
//!
//! Documents are never re-serialized. The new attribute is spliced into the
//! original text so formatting, comments and attribute order survive a fix.

use std::ops::Range;

use crate::analyze::load;
use crate::compare::compare_with_policy;
use crate::document::RootSpan;
use crate::errors::{AuditIssue, SourceContext};
use crate::geometry::aggregate;
use crate::log::debug;
use crate::policy::Policy;
use crate::repair::{RepairAction, plan_missing, plan_repair};
use crate::viewport::{ViewBox, Viewport};

/// Replace each range of `source` with its text. Ranges must not overlap.
pub(crate) fn splice(source: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(source.len());
    let mut at = 0;
    for (range, text) in edits {
        out.push_str(&source[at..range.start]);
        out.push_str(&text);
        at = range.end;
    }
    out.push_str(&source[at..]);
    out
}

/// Offset in the root start tag where a new attribute goes: before `/>` or `>`
fn insertion_point(source: &str, span: &RootSpan) -> usize {
    let tag = &source[span.start_tag.clone()];
    let closer = if tag.ends_with("/>") { 2 } else { 1 };
    span.start_tag.end - closer
}

/// Splice `action`'s viewBox into the root start tag described by `span`.
///
/// `Replace` rewrites the root's viewBox attribute in place, falling back to
/// insertion when there is none. `Insert` adds the attribute at the end of
/// the root start tag.
pub fn apply_view_box(source: &str, span: &RootSpan, action: &RepairAction) -> String {
    let attr = format!("viewBox=\"{}\"", action.view_box());

    if let RepairAction::Replace { .. } = action {
        if let Some(existing) = span.attribute("viewBox") {
            return splice(source, vec![(existing.range.clone(), attr)]);
        }
    }

    let at = insertion_point(source, span);
    splice(source, vec![(at..at, format!(" {attr}"))])
}

/// What the fixer did, or would do, with one document
#[derive(Debug, Default)]
pub struct RepairOutcome {
    pub action: Option<RepairAction>,
    /// One line per change, for the report
    pub changes: Vec<String>,
    /// Why the document could not be fixed
    pub errors: Vec<AuditIssue>,
    /// Rewritten text; `None` when nothing changed
    pub output: Option<String>,
}

impl RepairOutcome {
    fn failed(issue: AuditIssue) -> Self {
        RepairOutcome {
            errors: vec![issue],
            ..RepairOutcome::default()
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.output.is_some()
    }

    pub fn is_unchanged(&self) -> bool {
        self.output.is_none() && self.errors.is_empty()
    }
}

pub fn repair(source: &str) -> RepairOutcome {
    repair_with_policy(&SourceContext::new("<input>", source), &Policy::default())
}

/// Fix a missing or overflowing viewBox.
///
/// An oversized viewBox is left alone; the fixer only grows viewports.
pub fn repair_with_policy(ctx: &SourceContext, policy: &Policy) -> RepairOutcome {
    let doc = match load(ctx) {
        Ok(doc) => doc,
        Err(issue) => return RepairOutcome::failed(issue),
    };
    let Some(content) = aggregate(&doc.primitives).bounds() else {
        return RepairOutcome::failed(AuditIssue::NoDrawableContent);
    };

    let plan = match doc.root.view_box.as_deref() {
        None => plan_missing(content, policy),
        Some(raw) => {
            let view_box = match ViewBox::parse(raw) {
                Ok(view_box) => view_box,
                Err(err) => return RepairOutcome::failed(err.into()),
            };
            let viewport = Viewport {
                view_box: Some(view_box),
                ..Viewport::default()
            };
            let plan = compare_with_policy(content, viewport, policy)
                .and_then(|report| plan_repair(&report, policy));
            match plan {
                Some(plan) => plan,
                None => return RepairOutcome::default(),
            }
        }
    };
    debug!(name = %ctx.name, rationale = %plan.rationale, "planned repair");

    let mut changes = vec![plan.rationale];
    if let RepairAction::Replace { .. } = plan.action {
        changes.push(format!("Content bounds: {content}"));
    }
    RepairOutcome {
        action: Some(plan.action),
        changes,
        errors: Vec::new(),
        output: Some(apply_view_box(&ctx.source, &doc.span, &plan.action)),
    }
}
