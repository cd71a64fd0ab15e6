//! Many documents at once.
//!
//! Each document is a pure function of its own text, so batches are a plain
//! parallel map. Results always come back in input order.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use rayon::prelude::*;

use crate::analyze::{AnalysisReport, analyze_with_policy};
use crate::errors::SourceContext;
use crate::log::debug;
use crate::policy::Policy;
use crate::rewrite::{RepairOutcome, repair_with_policy};

/// One document to process: display name and full text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchInput {
    pub name: String,
    pub source: String,
}

impl BatchInput {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    fn context(&self) -> SourceContext {
        SourceContext::new(&self.name, &self.source)
    }
}

#[derive(Debug)]
pub struct NamedReport {
    pub name: String,
    pub report: AnalysisReport,
}

#[derive(Debug)]
pub struct NamedOutcome {
    pub name: String,
    pub outcome: RepairOutcome,
}

pub fn analyze_batch(inputs: &[BatchInput]) -> Vec<NamedReport> {
    analyze_batch_with_policy(inputs, &Policy::default())
}

pub fn analyze_batch_with_policy(inputs: &[BatchInput], policy: &Policy) -> Vec<NamedReport> {
    debug!(documents = inputs.len(), "analyzing batch");
    inputs
        .par_iter()
        .map(|input| NamedReport {
            name: input.name.clone(),
            report: analyze_with_policy(&input.context(), policy),
        })
        .collect()
}

pub fn repair_batch(inputs: &[BatchInput]) -> Vec<NamedOutcome> {
    repair_batch_with_policy(inputs, &Policy::default())
}

pub fn repair_batch_with_policy(inputs: &[BatchInput], policy: &Policy) -> Vec<NamedOutcome> {
    debug!(documents = inputs.len(), "repairing batch");
    inputs
        .par_iter()
        .map(|input| NamedOutcome {
            name: input.name.clone(),
            outcome: repair_with_policy(&input.context(), policy),
        })
        .collect()
}

/// Totals over a batch of analysis reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub valid: usize,
    pub with_issues: usize,
    /// Documents whose content and viewBox disagree
    pub mismatched: usize,
    /// Occurrences per [`AuditIssue::kind`](crate::errors::AuditIssue::kind),
    /// warnings included
    pub issue_kinds: BTreeMap<&'static str, usize>,
}

impl BatchSummary {
    pub fn from_reports(reports: &[NamedReport]) -> Self {
        reports.iter().fold(BatchSummary::default(), |mut summary, named| {
            let report = &named.report;
            summary.total += 1;
            if report.is_clean() {
                summary.valid += 1;
            } else {
                summary.with_issues += 1;
            }
            if report.has_mismatch {
                summary.mismatched += 1;
            }
            for issue in report.issues.iter().chain(&report.warnings) {
                *summary.issue_kinds.entry(issue.kind()).or_default() += 1;
            }
            summary
        })
    }

    /// Issue kinds, most frequent first
    pub fn ranked_kinds(&self) -> Vec<(&'static str, usize)> {
        let mut ranked: Vec<_> = self.issue_kinds.iter().map(|(&k, &n)| (k, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }
}

/// Counts over a batch of repair outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub fixed: usize,
    pub errors: usize,
    pub unchanged: usize,
}

impl RepairSummary {
    pub fn from_outcomes(outcomes: &[NamedOutcome]) -> Self {
        outcomes.iter().fold(RepairSummary::default(), |mut summary, named| {
            if named.outcome.is_fixed() {
                summary.fixed += 1;
            } else if !named.outcome.errors.is_empty() {
                summary.errors += 1;
            } else {
                summary.unchanged += 1;
            }
            summary
        })
    }
}

fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// `Filename,Error Type,Detail` rows, one per issue or warning.
///
/// A document with neither gets a single `VALID` row.
pub fn to_csv(reports: &[NamedReport]) -> String {
    let mut out = String::from("Filename,Error Type,Detail");
    for named in reports {
        let name = csv_field(&named.name);
        let report = &named.report;
        if report.is_clean() && report.warnings.is_empty() {
            let _ = write!(out, "\n{name},\"VALID\",\"No issues found\"");
            continue;
        }
        for issue in report.issues.iter().chain(&report.warnings) {
            let _ = write!(
                out,
                "\n{name},{},{}",
                csv_field(issue.kind()),
                csv_field(&issue.to_string())
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs() -> Vec<BatchInput> {
        vec![
            BatchInput::new("ok.svg", r#"<svg viewBox="0 0 24 24"><circle cx="12" cy="12" r="10"/></svg>"#),
            BatchInput::new("empty.svg", ""),
            BatchInput::new("big.svg", r#"<svg viewBox="0 0 24 24"><rect width="50" height="50"/></svg>"#),
            BatchInput::new("bare.svg", r#"<svg><rect x="2" y="3" width="8" height="17"/></svg>"#),
        ]
    }

    #[test]
    fn results_keep_input_order() {
        let inputs: Vec<_> = (0..64)
            .map(|i| BatchInput::new(format!("{i}.svg"), format!(r#"<svg viewBox="0 0 {i} {i}"/>"#)))
            .collect();
        let names: Vec<_> = analyze_batch(&inputs).into_iter().map(|r| r.name).collect();
        let expected: Vec<_> = (0..64).map(|i| format!("{i}.svg")).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn summary_counts() {
        let summary = BatchSummary::from_reports(&analyze_batch(&inputs()));
        assert_eq!(summary.total, 4);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.with_issues, 3);
        assert_eq!(summary.mismatched, 1);
        assert_eq!(
            summary.ranked_kinds(),
            [
                ("EMPTY_FILE", 1),
                ("NO_DIMENSIONS", 1),
                ("NO_VIEWBOX", 1),
                ("VIEWBOX_MISMATCH", 1)
            ]
        );
    }

    #[test]
    fn repair_summary_counts() {
        let outcomes = repair_batch(&inputs());
        assert_eq!(
            RepairSummary::from_outcomes(&outcomes),
            RepairSummary {
                fixed: 2,
                errors: 1,
                unchanged: 1,
            }
        );
        assert_eq!(outcomes[3].name, "bare.svg");
        assert!(outcomes[3].outcome.is_fixed());
    }

    #[test]
    fn csv_export() {
        let mut inputs = inputs();
        inputs.push(BatchInput::new(
            "say \"hi\".svg",
            r#"<svg viewBox="0 0 24"><path d="M0 0L1 1"/></svg>"#,
        ));
        let csv = to_csv(&analyze_batch(&inputs));
        insta::assert_snapshot!(csv, @r#"
        Filename,Error Type,Detail
        "ok.svg","VALID","No issues found"
        "empty.svg","EMPTY_FILE","File is empty"
        "big.svg","VIEWBOX_MISMATCH","Path coordinates (0.0, 0.0) to (50.0, 50.0) extend outside viewBox (0, 0) to (24, 24)"
        "bare.svg","NO_VIEWBOX","No viewBox attribute found"
        "bare.svg","NO_DIMENSIONS","SVG has no viewBox or dimensions specified"
        "say ""hi"".svg","INVALID_VIEWBOX_FORMAT","Invalid viewBox format"
        "say ""hi"".svg","SHORT_CONTENT","File content is suspiciously short"
        "#);
    }
}
