//! Error types with rich diagnostics using miette
//!
//! Every problem found in a document is an [`AuditIssue`]. Issues are
//! collected into reports instead of being returned early, so one broken icon
//! never stops a batch. Parse failures carry the source text and a span so a
//! caller can render a pointed `miette` report.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::types::{Bounds, Point};

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Byte offset of a 1-based row/column position, clamped to the text
    pub fn offset_at(&self, row: u32, col: u32) -> usize {
        let mut offset = 0;
        for (index, line) in self.source.split_inclusive('\n').enumerate() {
            if index + 1 == row as usize {
                let col_bytes = line
                    .char_indices()
                    .nth(col.saturating_sub(1) as usize)
                    .map_or(line.len(), |(i, _)| i);
                return offset + col_bytes;
            }
            offset += line.len();
        }
        self.source.len()
    }
}

// ============================================================================
// Viewport Errors
// ============================================================================

/// Errors from reading the root viewport attributes
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ViewportError {
    #[error("invalid viewBox format: {raw:?}")]
    #[diagnostic(
        code(iconbox::viewport::invalid_format),
        help("a viewBox is four numbers: min-x min-y width height, with a non-negative size")
    )]
    InvalidFormat { raw: String },
}

// ============================================================================
// Audit Issues
// ============================================================================

/// One finding about a document.
///
/// The `Display` text is the issue string shown in reports.
#[derive(Error, Diagnostic, Debug)]
pub enum AuditIssue {
    #[error("File is empty")]
    #[diagnostic(code(iconbox::document::empty))]
    EmptyDocument,

    #[error("File content is suspiciously short")]
    #[diagnostic(code(iconbox::document::short), severity(Warning))]
    ShortContent,

    #[error("Missing <svg> tag")]
    #[diagnostic(code(iconbox::document::missing_svg_tag))]
    MissingSvgTag,

    #[error("Error parsing SVG: {message}")]
    #[diagnostic(code(iconbox::document::parse))]
    Parse {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("parser stopped here")]
        span: SourceSpan,
    },

    #[error("No SVG element found")]
    #[diagnostic(code(iconbox::document::missing_svg_element))]
    MissingSvgElement,

    #[error("No viewBox attribute found")]
    #[diagnostic(
        code(iconbox::viewport::missing),
        help("run the fixer to synthesize one from the content bounds")
    )]
    MissingViewBox,

    #[error("SVG has no viewBox or dimensions specified")]
    #[diagnostic(
        code(iconbox::viewport::no_dimensions),
        help("declare a viewBox, or both width and height")
    )]
    NoDimensions,

    #[error("Invalid viewBox format")]
    #[diagnostic(code(iconbox::viewport::invalid_format))]
    InvalidViewBoxFormat { raw: String },

    #[error("No drawable content with coordinates found")]
    #[diagnostic(code(iconbox::content::none))]
    NoDrawableContent,

    #[error(
        "Path coordinates ({:.1}, {:.1}) to ({:.1}, {:.1}) extend outside viewBox ({}, {}) to ({}, {})",
        .content.min.x, .content.min.y, .content.max.x, .content.max.y,
        .view_box.min.x, .view_box.min.y, .view_box.max.x, .view_box.max.y
    )]
    #[diagnostic(code(iconbox::compare::overflow))]
    Overflow { content: Bounds, view_box: Bounds },

    #[error(
        "ViewBox is much larger than needed - viewBox: {}x{}, content: {:.1}x{:.1}",
        .view_box_size.x, .view_box_size.y, .content_size.x, .content_size.y
    )]
    #[diagnostic(code(iconbox::compare::oversized))]
    Oversized {
        view_box_size: Point,
        content_size: Point,
    },
}

impl AuditIssue {
    /// Short machine-readable code, used for CSV export and summaries
    pub fn kind(&self) -> &'static str {
        match self {
            AuditIssue::EmptyDocument => "EMPTY_FILE",
            AuditIssue::ShortContent => "SHORT_CONTENT",
            AuditIssue::MissingSvgTag => "MISSING_SVG_TAG",
            AuditIssue::Parse { .. } => "XML_PARSE_FAILED",
            AuditIssue::MissingSvgElement => "NO_SVG_ELEMENT",
            AuditIssue::MissingViewBox => "NO_VIEWBOX",
            AuditIssue::NoDimensions => "NO_DIMENSIONS",
            AuditIssue::InvalidViewBoxFormat { .. } => "INVALID_VIEWBOX_FORMAT",
            AuditIssue::NoDrawableContent => "NO_DRAWABLE_CONTENT",
            AuditIssue::Overflow { .. } => "VIEWBOX_MISMATCH",
            AuditIssue::Oversized { .. } => "VIEWBOX_TOO_LARGE",
        }
    }

    /// Build a parse issue pointing at a 1-based row/column in `ctx`
    pub fn parse_error(ctx: &SourceContext, message: impl Into<String>, row: u32, col: u32) -> Self {
        let offset = ctx.offset_at(row, col);
        AuditIssue::Parse {
            message: message.into(),
            src: ctx.named_source(),
            span: SourceSpan::from(offset..offset),
        }
    }
}

impl From<ViewportError> for AuditIssue {
    fn from(err: ViewportError) -> Self {
        match err {
            ViewportError::InvalidFormat { raw } => AuditIssue::InvalidViewBoxFormat { raw },
        }
    }
}
