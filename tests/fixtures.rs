//! Fixture-driven audit and repair checks.
//!
//! Every `tests/fixtures/*.svg` starts with an expectation comment:
//!
//! ```text
//! <!-- expect: issues=VIEWBOX_MISMATCH; mismatch=true; content=0 0 50 50; repair=-10 -10 70 70 -->
//! ```
//!
//! Keys are optional. `issues` is a comma list of issue kinds or `none`,
//! `content` is `minX minY maxX maxY` or `none`, `repair` is the expected new
//! viewBox, `none` (left unchanged) or `error` (cannot be fixed). A sibling
//! `<name>.svg.fixed` file, when present, must equal the repaired text.

use std::collections::HashMap;
use std::sync::{LazyLock, Once};

use camino::{Utf8Path, Utf8PathBuf};
use iconbox::{AnalysisReport, RepairOutcome, SourceContext, analyze_with_policy, policy::Policy};
use regex_lite::Regex;

static EXPECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<!--\s*expect:([^>]*?)-->").expect("expect pattern"));

/// Set `RUST_LOG=iconbox=trace` (with `--features tracing`) to see per-primitive bounds
fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

fn expectations(source: &str) -> Result<HashMap<String, String>, String> {
    let caps = EXPECT
        .captures(source)
        .ok_or("fixture has no <!-- expect: ... --> comment")?;
    Ok(caps[1]
        .split(';')
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.trim().to_owned(), value.trim().to_owned()))
        .collect())
}

fn check_issues(report: &AnalysisReport, expected: &str) -> Result<(), String> {
    let actual: Vec<&str> = report.issues.iter().map(|issue| issue.kind()).collect();
    let expected: Vec<&str> = match expected {
        "none" => Vec::new(),
        list => list.split(',').map(str::trim).collect(),
    };
    if actual != expected {
        return Err(format!(
            "issues: expected {expected:?}, got {actual:?} ({:?})",
            report.issue_strings()
        ));
    }
    Ok(())
}

fn check_content(report: &AnalysisReport, expected: &str) -> Result<(), String> {
    let actual = report
        .content_bounds
        .map(|b| [b.min.x, b.min.y, b.max.x, b.max.y]);
    let expected = match expected {
        "none" => None,
        raw => {
            let values: Vec<f64> = raw
                .split_whitespace()
                .map(|v| v.parse::<f64>().map_err(|e| format!("bad content value {v:?}: {e}")))
                .collect::<Result<_, _>>()?;
            let [a, b, c, d] = values[..] else {
                return Err(format!("content needs four numbers, got {raw:?}"));
            };
            Some([a, b, c, d])
        }
    };
    let close = match (actual, expected) {
        (Some(a), Some(e)) => a.iter().zip(e).all(|(a, e)| (a - e).abs() < 1e-9),
        (a, e) => a.is_none() && e.is_none(),
    };
    if !close {
        return Err(format!("content: expected {expected:?}, got {actual:?}"));
    }
    Ok(())
}

fn check_repair(outcome: &RepairOutcome, expected: &str) -> Result<(), String> {
    let actual = match (&outcome.action, outcome.errors.is_empty()) {
        (Some(action), _) => action.view_box().to_string(),
        (None, true) => "none".to_owned(),
        (None, false) => "error".to_owned(),
    };
    if actual != expected {
        return Err(format!(
            "repair: expected {expected:?}, got {actual:?} (changes {:?}, errors {:?})",
            outcome.changes,
            outcome.errors.iter().map(ToString::to_string).collect::<Vec<_>>()
        ));
    }
    Ok(())
}

/// Format a colored inline diff using dissimilar
fn format_inline_diff(expected: &str, actual: &str) -> String {
    use dissimilar::Chunk;

    let mut output = String::from("\n=== Inline Diff (expected vs repaired) ===\n");
    for chunk in dissimilar::diff(expected, actual) {
        match chunk {
            Chunk::Equal(s) => output.push_str(s),
            Chunk::Delete(s) => {
                output.push_str("\x1b[31m[-");
                output.push_str(s);
                output.push_str("-]\x1b[0m");
            }
            Chunk::Insert(s) => {
                output.push_str("\x1b[32m[+");
                output.push_str(s);
                output.push_str("+]\x1b[0m");
            }
        }
    }
    output
}

fn check_golden(path: &Utf8Path, source: &str, outcome: &RepairOutcome) -> Result<(), String> {
    let golden = Utf8PathBuf::from(format!("{path}.fixed"));
    if !golden.exists() {
        return Ok(());
    }
    let expected = std::fs::read_to_string(&golden).map_err(|e| format!("{golden}: {e}"))?;
    let actual = outcome.output.as_deref().unwrap_or(source);
    if actual != expected {
        return Err(format!(
            "repaired text differs from {golden}:{}",
            format_inline_diff(&expected, actual)
        ));
    }
    Ok(())
}

fn test_fixture(path: &Utf8Path) -> datatest_stable::Result<()> {
    init_tracing();
    let source = std::fs::read_to_string(path)?;
    let expect = expectations(&source)?;

    let ctx = SourceContext::new(path.file_name().unwrap_or(path.as_str()), source.as_str());
    let policy = Policy::default();
    let report = analyze_with_policy(&ctx, &policy);
    let outcome = iconbox::rewrite::repair_with_policy(&ctx, &policy);

    let mut failures = Vec::new();
    for (key, value) in &expect {
        let result = match key.as_str() {
            "issues" => check_issues(&report, value),
            "content" => check_content(&report, value),
            "mismatch" => match value.parse::<bool>() {
                Ok(expected) if expected == report.has_mismatch => Ok(()),
                Ok(expected) => Err(format!("mismatch: expected {expected}, got {}", report.has_mismatch)),
                Err(e) => Err(format!("mismatch: {e}")),
            },
            "repair" => check_repair(&outcome, value),
            other => Err(format!("unknown expectation key {other:?}")),
        };
        if let Err(failure) = result {
            failures.push(failure);
        }
    }
    if let Err(failure) = check_golden(path, &source, &outcome) {
        failures.push(failure);
    }

    if !failures.is_empty() {
        failures.sort();
        return Err(format!("{path}:\n  {}", failures.join("\n  ")).into());
    }
    Ok(())
}

datatest_stable::harness! {
    { test = test_fixture, root = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"), pattern = r"\.svg$" },
}
