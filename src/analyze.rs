//! Per-document audit pipeline.
//!
//! Stages run in a fixed order and the first structural failure ends the
//! analysis: empty text, no `<svg` tag, unparsable XML, no svg element,
//! missing viewBox, malformed viewBox, no drawable content. Only a document
//! that clears all of them reaches the comparator.
//!
//! A missing viewBox also reports `NO_DIMENSIONS` when width or height is
//! missing too. Suspiciously short text is a warning and never stops the
//! pipeline.

use crate::compare::{MismatchKind, compare_with_policy};
use crate::defaults::SHORT_CONTENT_CHARS;
use crate::document::SvgDocument;
use crate::errors::{AuditIssue, SourceContext};
use crate::geometry::aggregate;
use crate::log::debug;
use crate::policy::Policy;
use crate::types::Bounds;
use crate::viewport::Viewport;

/// Result of auditing one document
#[derive(Debug, Default)]
pub struct AnalysisReport {
    /// Set only by comparator findings, never by structural issues
    pub has_mismatch: bool,
    pub kind: Option<MismatchKind>,
    pub issues: Vec<AuditIssue>,
    /// Findings that do not make a document invalid
    pub warnings: Vec<AuditIssue>,
    pub content_bounds: Option<Bounds>,
    /// Declared viewBox rectangle
    pub viewport: Option<Bounds>,
    pub declared: Viewport,
}

impl AnalysisReport {
    fn failed(issue: AuditIssue) -> Self {
        AnalysisReport {
            issues: vec![issue],
            ..AnalysisReport::default()
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable issue texts, in detection order
    pub fn issue_strings(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Pre-parse checks followed by the XML parse
pub fn load(ctx: &SourceContext) -> Result<SvgDocument, AuditIssue> {
    if ctx.source.trim().is_empty() {
        return Err(AuditIssue::EmptyDocument);
    }
    if !ctx.source.contains("<svg") {
        return Err(AuditIssue::MissingSvgTag);
    }
    SvgDocument::parse(ctx)
}

pub fn analyze(source: &str) -> AnalysisReport {
    analyze_named("<input>", source)
}

pub fn analyze_named(name: &str, source: &str) -> AnalysisReport {
    analyze_with_policy(&SourceContext::new(name, source), &Policy::default())
}

pub fn analyze_with_policy(ctx: &SourceContext, policy: &Policy) -> AnalysisReport {
    AnalysisReport {
        warnings: warnings(&ctx.source),
        ..audit(ctx, policy)
    }
}

fn warnings(source: &str) -> Vec<AuditIssue> {
    let blank = source.trim().is_empty();
    if !blank && source.chars().count() < SHORT_CONTENT_CHARS {
        vec![AuditIssue::ShortContent]
    } else {
        Vec::new()
    }
}

/// Declared but empty counts as missing
fn is_set(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn audit(ctx: &SourceContext, policy: &Policy) -> AnalysisReport {
    let doc = match load(ctx) {
        Ok(doc) => doc,
        Err(issue) => return AnalysisReport::failed(issue),
    };
    let content = aggregate(&doc.primitives);
    debug!(
        name = %ctx.name,
        primitives = doc.primitives.len(),
        contributors = content.contributors,
        "aggregated content"
    );

    let (width, height) = (doc.root.width.as_deref(), doc.root.height.as_deref());
    let Some(raw) = doc.root.view_box.as_deref() else {
        let mut issues = vec![AuditIssue::MissingViewBox];
        if !is_set(width) || !is_set(height) {
            issues.push(AuditIssue::NoDimensions);
        }
        // the planner still needs the content box to synthesize one
        return AnalysisReport {
            issues,
            content_bounds: content.bounds(),
            declared: Viewport::from_attributes(None, width, height).unwrap_or_default(),
            ..AnalysisReport::default()
        };
    };

    let declared = match Viewport::from_attributes(Some(raw), width, height) {
        Ok(declared) => declared,
        Err(err) => {
            return AnalysisReport {
                content_bounds: content.bounds(),
                ..AnalysisReport::failed(err.into())
            };
        }
    };

    let Some(bounds) = content.bounds() else {
        return AnalysisReport {
            viewport: declared.bounds(),
            declared,
            ..AnalysisReport::failed(AuditIssue::NoDrawableContent)
        };
    };

    match compare_with_policy(bounds, declared, policy) {
        Some(report) => AnalysisReport {
            has_mismatch: report.has_mismatch,
            kind: Some(report.kind),
            issues: report.issues(),
            warnings: Vec::new(),
            content_bounds: Some(bounds),
            viewport: declared.bounds(),
            declared,
        },
        // unreachable in practice: `declared` was built from a present viewBox
        None => AnalysisReport {
            content_bounds: Some(bounds),
            declared,
            ..AnalysisReport::failed(AuditIssue::MissingViewBox)
        },
    }
}
