use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use iconbox::batch::{
    BatchInput, BatchSummary, RepairSummary, analyze_batch_with_policy, repair_batch_with_policy,
    to_csv,
};
use iconbox::defaults::ICON_SIZE;
use iconbox::dimensions::{
    DimensionFix, DimensionHistogram, dimension_histogram, normalize_dimensions,
    normalize_to_icon_size, offset_or_size_mismatch, reset_view_box,
};
use iconbox::document::SvgDocument;
use iconbox::{Policy, SourceContext, Viewport};
use miette::{IntoDiagnostic, Result, WrapErr, miette};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

const USAGE: &str = "\
Usage: cargo xtask <command>
Commands:
  audit <dir> [--csv <file>] [--tolerance <t>]
                                             Report viewBox problems for every SVG under <dir>
  fix <dir|file> [--dry-run] [--tolerance <t>]
                                             Add missing viewBoxes and grow overflowing ones
  normalize <dir> [--size <n>] [--view-box]  Set root width/height to <n> (default 15);
                                             with --view-box also force viewBox to \"0 0 <n> <n>\"
  mismatched <dir> [--move-to <dir>] [--report <file>]
                                             List SVGs whose viewBox is offset or disagrees with width/height";

fn main() -> Result<()> {
    // reports and logs both go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        std::process::exit(1);
    };
    let args = Args::parse(rest);

    match command.as_str() {
        "audit" => audit(&args),
        "fix" => fix(&args),
        "normalize" => normalize(&args),
        "mismatched" => mismatched(&args),
        _ => {
            eprintln!("Unknown command: {command}\n\n{USAGE}");
            std::process::exit(1);
        }
    }
}

// ============================================================================
// Arguments
// ============================================================================

/// Options that take a value
const VALUE_OPTIONS: [&str; 5] = ["--csv", "--size", "--move-to", "--report", "--tolerance"];

#[derive(Debug, Default)]
struct Args {
    positional: Vec<String>,
    flags: Vec<String>,
    options: Vec<(String, String)>,
}

impl Args {
    fn parse(raw: &[String]) -> Self {
        let mut args = Args::default();
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            if VALUE_OPTIONS.contains(&arg.as_str()) {
                match iter.next() {
                    Some(value) => args.options.push((arg.clone(), value.clone())),
                    None => args.flags.push(arg.clone()),
                }
            } else if arg.starts_with('-') {
                args.flags.push(arg.clone());
            } else {
                args.positional.push(arg.clone());
            }
        }
        args
    }

    fn target(&self) -> Result<Utf8PathBuf> {
        self.positional
            .first()
            .map(|arg| Utf8PathBuf::from(arg.as_str()))
            .ok_or_else(|| miette!("missing <dir> argument\n\n{}", USAGE))
    }

    fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn flag(&self, names: &[&str]) -> bool {
        self.flags.iter().any(|flag| names.contains(&flag.as_str()))
    }

    /// Default policy, or one with the `--tolerance` given
    fn policy(&self) -> Result<Policy> {
        let Some(raw) = self.option("--tolerance") else {
            return Ok(Policy::default());
        };
        let tolerance = raw
            .parse::<f64>()
            .into_diagnostic()
            .wrap_err_with(|| format!("invalid --tolerance {raw:?}"))?;
        Policy::try_new(tolerance).map_err(|err| miette!("invalid --tolerance {raw:?}: {err}"))
    }
}

// ============================================================================
// Files
// ============================================================================

/// Every `*.svg` under `root`, sorted
fn find_svg_files(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_owned()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .into_diagnostic()
            .wrap_err_with(|| format!("reading directory {dir}"))?;
        for entry in entries {
            let entry = entry.into_diagnostic()?;
            let Ok(path) = Utf8PathBuf::try_from(entry.path()) else {
                warn!(path = ?entry.path(), "skipping non UTF-8 path");
                continue;
            };
            let file_type = entry.file_type().into_diagnostic()?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() && path.extension() == Some("svg") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// A single file, or every SVG under a directory
fn collect_targets(target: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if target.is_file() {
        return Ok(vec![target.to_owned()]);
    }
    if !target.is_dir() {
        return Err(miette!("not found: {}", target));
    }
    find_svg_files(target)
}

/// Name shown in reports: path relative to the target directory
fn display_name(root: &Utf8Path, path: &Utf8Path) -> String {
    path.strip_prefix(root)
        .ok()
        .filter(|rel| !rel.as_str().is_empty())
        .unwrap_or(path)
        .to_string()
}

fn read_inputs(root: &Utf8Path, paths: &[Utf8PathBuf]) -> Result<Vec<BatchInput>> {
    paths
        .par_iter()
        .map(|path| {
            let source = fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading {path}"))?;
            Ok::<_, miette::Report>(BatchInput::new(display_name(root, path), source))
        })
        .collect()
}

// ============================================================================
// Commands
// ============================================================================

fn audit(args: &Args) -> Result<()> {
    let dir = args.target()?;
    let policy = args.policy()?;
    let paths = collect_targets(&dir)?;
    eprintln!("Found {} SVG files", paths.len());

    let inputs = read_inputs(&dir, &paths)?;
    let reports = analyze_batch_with_policy(&inputs, &policy);
    let summary = BatchSummary::from_reports(&reports);

    for named in &reports {
        let report = &named.report;
        if report.is_clean() && report.warnings.is_empty() {
            continue;
        }
        eprintln!("{}", named.name);
        for issue in &report.issues {
            eprintln!("   {}: {issue}", issue.kind());
        }
        for warning in &report.warnings {
            eprintln!("   warning {}: {warning}", warning.kind());
        }
    }

    eprintln!();
    eprintln!("Results:");
    eprintln!("  valid: {}", summary.valid);
    eprintln!("  with issues: {}", summary.with_issues);
    eprintln!("  viewBox mismatches: {}", summary.mismatched);
    if !summary.issue_kinds.is_empty() {
        eprintln!("Issue kinds:");
        for (kind, count) in summary.ranked_kinds() {
            eprintln!("  {kind}: {count}");
        }
    }

    if let Some(csv_path) = args.option("--csv") {
        fs::write(csv_path, to_csv(&reports))
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {csv_path}"))?;
        eprintln!("CSV report written to {csv_path}");
    }
    Ok(())
}

fn fix(args: &Args) -> Result<()> {
    let target = args.target()?;
    let policy = args.policy()?;
    let dry_run = args.flag(&["--dry-run", "-n"]);
    eprintln!(
        "Mode: {}",
        if dry_run { "dry run (no files are written)" } else { "live (files are modified)" }
    );

    let paths = collect_targets(&target)?;
    let root = if target.is_dir() { target.as_path() } else { target.parent().unwrap_or(target.as_path()) };
    let inputs = read_inputs(root, &paths)?;
    let outcomes = repair_batch_with_policy(&inputs, &policy);

    for (named, path) in outcomes.iter().zip(&paths) {
        let outcome = &named.outcome;
        if let Some(output) = &outcome.output {
            eprintln!("{}", named.name);
            for change in &outcome.changes {
                eprintln!("   {change}");
            }
            if !dry_run {
                fs::write(path, output)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("writing {path}"))?;
                debug!(%path, "rewrote viewBox");
            }
        }
        for error in &outcome.errors {
            eprintln!("{}\n   Error: {error} - cannot fix", named.name);
        }
    }

    let summary = RepairSummary::from_outcomes(&outcomes);
    eprintln!();
    eprintln!("Results:");
    eprintln!("  {}: {}", if dry_run { "would fix" } else { "fixed" }, summary.fixed);
    eprintln!("  errors: {}", summary.errors);
    eprintln!("  no changes needed: {}", summary.unchanged);
    Ok(())
}

fn print_histogram(label: &str, counts: &std::collections::BTreeMap<u64, usize>, target: u32) {
    eprintln!("{label} distribution:");
    for (value, count) in DimensionHistogram::ranked(counts) {
        let marker = if value == u64::from(target) { "ok" } else { "--" };
        eprintln!("  {marker} {label}=\"{value}\": {count} files");
    }
}

fn normalize(args: &Args) -> Result<()> {
    let dir = args.target()?;
    let size = match args.option("--size") {
        Some(raw) => Some(
            raw.parse::<u32>()
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid --size {raw:?}"))?,
        ),
        None => None,
    };
    let reset = args.flag(&["--view-box"]);
    let rewrite = |source: &str| -> DimensionFix {
        match (reset, size) {
            (true, size) => reset_view_box(source, size.unwrap_or(ICON_SIZE)),
            (false, Some(size)) => normalize_dimensions(source, size),
            (false, None) => normalize_to_icon_size(source),
        }
    };
    let size = size.unwrap_or(ICON_SIZE);

    let paths = collect_targets(&dir)?;
    let inputs = read_inputs(&dir, &paths)?;
    let histogram = dimension_histogram(inputs.iter().map(|input| input.source.as_str()));
    eprintln!("Found {} SVG files", histogram.total);
    print_histogram("width", &histogram.widths, size);
    print_histogram("height", &histogram.heights, size);

    let fixes: Vec<_> = inputs
        .par_iter()
        .map(|input| rewrite(&input.source))
        .collect();
    let mut fixed = 0;
    for ((dims, input), path) in fixes.iter().zip(&inputs).zip(&paths) {
        if !dims.changed() {
            continue;
        }
        fs::write(path, &dims.output)
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {path}"))?;
        info!(name = %input.name, rewritten = dims.rewritten, "normalized dimensions");
        fixed += 1;
    }

    eprintln!();
    if fixed > 0 && reset {
        eprintln!("Reset {fixed} SVG files to {size}x{size} with viewBox=\"0 0 {size} {size}\"");
    } else if fixed > 0 {
        eprintln!("Aligned {fixed} SVG files to {size}x{size}");
    } else {
        eprintln!("All SVG files already declare {size}x{size}");
    }
    Ok(())
}

/// One entry of the mismatch report
#[derive(Debug, Serialize)]
struct MismatchEntry {
    file: String,
    width: Option<f64>,
    height: Option<f64>,
    view_box: Option<String>,
}

fn mismatched(args: &Args) -> Result<()> {
    let dir = args.target()?;
    let paths = collect_targets(&dir)?;
    let inputs = read_inputs(&dir, &paths)?;
    eprintln!("Found {} SVG files to check", inputs.len());

    let mut entries = Vec::new();
    let mut flagged = Vec::new();
    for (input, path) in inputs.iter().zip(&paths) {
        let ctx = SourceContext::new(&input.name, &input.source);
        let doc = match SvgDocument::parse(&ctx) {
            Ok(doc) => doc,
            Err(issue) => {
                eprintln!("Error processing {}: {issue}", input.name);
                continue;
            }
        };
        let root = &doc.root;
        let viewport = match Viewport::from_attributes(
            root.view_box.as_deref(),
            root.width.as_deref(),
            root.height.as_deref(),
        ) {
            Ok(viewport) => viewport,
            Err(err) => {
                eprintln!("Error processing {}: {err}", input.name);
                continue;
            }
        };
        if !offset_or_size_mismatch(&viewport) {
            continue;
        }
        eprintln!("{}", input.name);
        eprintln!(
            "   Dimensions: {}x{}",
            root.width.as_deref().unwrap_or("?"),
            root.height.as_deref().unwrap_or("?")
        );
        eprintln!("   ViewBox: {}", root.view_box.as_deref().unwrap_or(""));
        entries.push(MismatchEntry {
            file: input.name.clone(),
            width: viewport.width,
            height: viewport.height,
            view_box: root.view_box.clone(),
        });
        flagged.push(path);
    }

    if let Some(dest) = args.option("--move-to") {
        let dest = Utf8Path::new(dest);
        fs::create_dir_all(dest)
            .into_diagnostic()
            .wrap_err_with(|| format!("creating {dest}"))?;
        for path in &flagged {
            let Some(file_name) = path.file_name() else {
                continue;
            };
            let to = dest.join(file_name);
            fs::rename(path, &to)
                .into_diagnostic()
                .wrap_err_with(|| format!("moving {path} to {to}"))?;
        }
        eprintln!("Moved {} files to {dest}", flagged.len());
    }

    if let Some(report) = args.option("--report") {
        let json = serde_json::to_string_pretty(&entries).into_diagnostic()?;
        fs::write(report, json)
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {report}"))?;
        eprintln!("Report saved to {report}");
    }

    eprintln!();
    eprintln!("Summary:");
    eprintln!("  normal files: {}", inputs.len() - entries.len());
    eprintln!("  mismatched files: {}", entries.len());
    Ok(())
}
