//! Declared icon size: normalization and survey helpers

use std::collections::BTreeMap;

use crate::defaults::ICON_SIZE;
use crate::document::RootSpan;
use crate::rewrite::splice;
use crate::viewport::Viewport;

/// Result of [`normalize_dimensions`] and [`reset_view_box`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionFix {
    pub output: String,
    /// Number of attributes rewritten
    pub rewritten: usize,
}

impl DimensionFix {
    pub fn changed(&self) -> bool {
        self.rewritten > 0
    }

    fn unchanged(source: &str) -> Self {
        DimensionFix {
            output: source.to_owned(),
            rewritten: 0,
        }
    }
}

/// Plain digits only: `"24"` but not `"24px"`, `"+24"` or `"24.5"`
fn integer(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Set each named root attribute that `wanted` accepts to a new value.
///
/// `wanted` gets the current value and returns the replacement, or `None` to
/// keep it. Attributes the root does not declare are not added.
fn rewrite_root<F>(source: &str, names: &[&str], wanted: F) -> DimensionFix
where
    F: Fn(&str, &str) -> Option<String>,
{
    let Some(span) = RootSpan::locate(source) else {
        return DimensionFix::unchanged(source);
    };
    let edits: Vec<_> = span
        .attributes
        .iter()
        .filter(|attr| names.contains(&attr.name.as_str()))
        .filter_map(|attr| {
            let current = &source[attr.value.clone()];
            wanted(attr.name.as_str(), current)
                .filter(|new| new != current)
                .map(|new| (attr.value.clone(), new))
        })
        .collect();

    DimensionFix {
        rewritten: edits.len(),
        output: splice(source, edits),
    }
}

/// Rewrite integer `width`/`height` on the root `<svg>` tag to `target`.
///
/// Only the root start tag is touched; shape sizes inside the drawing are
/// left alone. Values with units or fractions are not integer-valued and are
/// kept. Text that does not parse is returned unchanged.
pub fn normalize_dimensions(source: &str, target: u32) -> DimensionFix {
    rewrite_root(source, &["width", "height"], |_, value| {
        integer(value).map(|_| target.to_string())
    })
}

/// [`normalize_dimensions`] to the default icon size
pub fn normalize_to_icon_size(source: &str) -> DimensionFix {
    normalize_dimensions(source, ICON_SIZE)
}

/// Force the root `viewBox` to `0 0 target target` and `width`/`height` to
/// `target`, whatever they held before.
///
/// This drops the drawing's own coordinate system, so it is meant for icon
/// sets already known to be drawn on a `target`-sized grid.
pub fn reset_view_box(source: &str, target: u32) -> DimensionFix {
    rewrite_root(source, &["viewBox", "width", "height"], |name, _| {
        Some(match name {
            "viewBox" => format!("0 0 {target} {target}"),
            _ => target.to_string(),
        })
    })
}

/// Integer `(width, height)` declared on the root tag
pub fn declared_dimensions(source: &str) -> (Option<u64>, Option<u64>) {
    let Some(span) = RootSpan::locate(source) else {
        return (None, None);
    };
    let find = |name: &str| {
        span.attribute(name)
            .and_then(|attr| integer(&source[attr.value.clone()]))
    };
    (find("width"), find("height"))
}

/// How often each declared size occurs across a set of documents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DimensionHistogram {
    pub total: usize,
    pub widths: BTreeMap<u64, usize>,
    pub heights: BTreeMap<u64, usize>,
}

impl DimensionHistogram {
    /// `(value, count)` pairs, most frequent first
    pub fn ranked(counts: &BTreeMap<u64, usize>) -> Vec<(u64, usize)> {
        let mut ranked: Vec<_> = counts.iter().map(|(&v, &n)| (v, n)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked
    }
}

pub fn dimension_histogram<'a, I>(sources: I) -> DimensionHistogram
where
    I: IntoIterator<Item = &'a str>,
{
    sources
        .into_iter()
        .fold(DimensionHistogram::default(), |mut hist, source| {
            let (width, height) = declared_dimensions(source);
            hist.total += 1;
            if let Some(w) = width {
                *hist.widths.entry(w).or_default() += 1;
            }
            if let Some(h) = height {
                *hist.heights.entry(h).or_default() += 1;
            }
            hist
        })
}

/// viewBox that is offset from the origin or whose size disagrees with the
/// declared width/height by more than 0.1.
///
/// Without a viewBox there is nothing to disagree with. A missing width or
/// height is not a size mismatch.
pub fn offset_or_size_mismatch(viewport: &Viewport) -> bool {
    let Some(view_box) = viewport.view_box else {
        return false;
    };
    let offset = view_box.origin.x != 0.0 || view_box.origin.y != 0.0;
    let differs = |declared: Option<f64>, actual: f64| {
        declared.is_some_and(|declared| (actual - declared).abs() > 0.1)
    };
    offset || differs(viewport.width, view_box.size.x) || differs(viewport.height, view_box.size.y)
}
