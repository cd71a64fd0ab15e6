//! SVG document adapter: XML text in, root attributes and shape primitives out.
//!
//! The audit only needs three root attributes and the drawing primitives, so
//! the `roxmltree` tree is dropped as soon as they are extracted.

use std::ops::Range;

use glam::dvec2;
use roxmltree::{Document, Node, ParsingOptions};

use crate::errors::{AuditIssue, SourceContext};
use crate::geometry::shapes::{
    CircleShape, EllipseShape, LineShape, PathShape, PolyShape, RectShape, ShapePrimitive,
};
use crate::geometry::tokenize::{leading_number, point_list};
use crate::log::warn;

/// Element names scanned for geometry, in scan order (paths first)
pub const SHAPE_TAGS: [&str; 7] = [
    "path", "circle", "rect", "ellipse", "line", "polygon", "polyline",
];

/// Raw root attributes, exactly as written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootAttributes {
    pub view_box: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

/// Byte offsets of one attribute in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpan {
    pub name: String,
    /// `name="value"`, quotes included
    pub range: Range<usize>,
    /// The value alone, without quotes
    pub value: Range<usize>,
}

/// Where the root element's start tag sits in the source text.
///
/// Rewrites splice inside these ranges, so text that merely looks like an
/// `<svg` tag (in a comment, a CDATA block or a nested element) is never
/// touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSpan {
    /// `<svg ...>` or `<svg .../>`, brackets included
    pub start_tag: Range<usize>,
    /// Attributes without a namespace prefix, in source order
    pub attributes: Vec<AttributeSpan>,
}

impl RootSpan {
    fn of(svg: Node<'_, '_>, source: &str) -> Self {
        let start = svg.range().start;
        RootSpan {
            start_tag: start..start_tag_end(source, start).unwrap_or(svg.range().end),
            attributes: svg
                .attributes()
                .filter(|attr| attr.namespace().is_none())
                .map(|attr| AttributeSpan {
                    name: attr.name().to_owned(),
                    range: attr.range(),
                    value: attr.range_value(),
                })
                .collect(),
        }
    }

    /// Parse `source` only far enough to locate the root element
    pub fn locate(source: &str) -> Option<Self> {
        let doc = Document::parse_with_options(source, parsing_options()).ok()?;
        find_svg_root(&doc).map(|svg| RootSpan::of(svg, source))
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpan> {
        self.attributes.iter().find(|attr| attr.name == name)
    }
}

/// Offset just past the `>` closing the tag that opens at `start`.
///
/// Attribute values may legally contain `>`, so quotes are tracked.
fn start_tag_end(source: &str, start: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &byte) in source.as_bytes().get(start..)?.iter().enumerate() {
        match quote {
            Some(open) if byte == open => quote = None,
            Some(_) => {}
            None if byte == b'"' || byte == b'\'' => quote = Some(byte),
            None if byte == b'>' => return Some(start + i + 1),
            None => {}
        }
    }
    None
}

/// DTDs are allowed since exported icons frequently carry a DOCTYPE.
fn parsing_options() -> ParsingOptions {
    ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    }
}

fn find_svg_root<'a, 'input>(doc: &'a Document<'input>) -> Option<Node<'a, 'input>> {
    doc.descendants()
        .find(|n| n.is_element() && n.tag_name().name().eq_ignore_ascii_case("svg"))
}

/// Everything the bounds engine needs from one document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgDocument {
    pub root: RootAttributes,
    pub span: RootSpan,
    pub primitives: Vec<ShapePrimitive>,
}

impl SvgDocument {
    /// Parse `ctx.source`
    pub fn parse(ctx: &SourceContext) -> Result<Self, AuditIssue> {
        let doc = Document::parse_with_options(&ctx.source, parsing_options()).map_err(|err| {
            warn!(name = %ctx.name, %err, "could not parse document");
            let pos = err.pos();
            AuditIssue::parse_error(ctx, err.to_string(), pos.row, pos.col)
        })?;

        let svg = find_svg_root(&doc).ok_or(AuditIssue::MissingSvgElement)?;

        Ok(SvgDocument {
            root: RootAttributes {
                view_box: svg.attribute("viewBox").map(str::to_owned),
                width: svg.attribute("width").map(str::to_owned),
                height: svg.attribute("height").map(str::to_owned),
            },
            span: RootSpan::of(svg, &ctx.source),
            primitives: collect_primitives(svg),
        })
    }
}

/// All primitives under `root`, grouped by tag in [`SHAPE_TAGS`] order
pub fn collect_primitives(root: Node<'_, '_>) -> Vec<ShapePrimitive> {
    SHAPE_TAGS
        .iter()
        .flat_map(|tag| {
            root.descendants()
                .filter(move |n| n.is_element() && n.tag_name().name() == *tag)
                .filter_map(primitive_from_node)
        })
        .collect()
}

/// Numeric attribute, `0` when absent or unparsable
fn num(node: Node<'_, '_>, name: &str) -> f64 {
    node.attribute(name).and_then(leading_number).unwrap_or(0.0)
}

fn primitive_from_node(node: Node<'_, '_>) -> Option<ShapePrimitive> {
    let shape = match node.tag_name().name() {
        // no `d` at all contributes nothing
        "path" => PathShape::new(node.attribute("d")?).into(),
        "circle" => CircleShape {
            center: dvec2(num(node, "cx"), num(node, "cy")),
            r: num(node, "r"),
        }
        .into(),
        "rect" => RectShape {
            origin: dvec2(num(node, "x"), num(node, "y")),
            size: dvec2(num(node, "width"), num(node, "height")),
        }
        .into(),
        "ellipse" => EllipseShape {
            center: dvec2(num(node, "cx"), num(node, "cy")),
            radii: dvec2(num(node, "rx"), num(node, "ry")),
        }
        .into(),
        "line" => LineShape {
            from: dvec2(num(node, "x1"), num(node, "y1")),
            to: dvec2(num(node, "x2"), num(node, "y2")),
        }
        .into(),
        tag @ ("polygon" | "polyline") => PolyShape {
            points: node.attribute("points").map(point_list).unwrap_or_default(),
            closed: tag == "polygon",
        }
        .into(),
        _ => return None,
    };
    Some(shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Bounded;

    fn parse(source: &str) -> Result<SvgDocument, AuditIssue> {
        SvgDocument::parse(&SourceContext::new("<test>", source))
    }

    #[test]
    fn reads_root_attributes() {
        let doc = parse(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" width="24px"/>"#)
            .unwrap();
        assert_eq!(doc.root.view_box.as_deref(), Some("0 0 24 24"));
        assert_eq!(doc.root.width.as_deref(), Some("24px"));
        assert_eq!(doc.root.height, None);
        assert!(doc.primitives.is_empty());
    }

    #[test]
    fn paths_come_first_then_tag_order() {
        let doc = parse(
            r#"<svg>
                <rect width="2" height="2"/>
                <g><circle r="1"/><path d="M0 0L1 1"/></g>
                <polyline points="0,0 1,1"/>
                <line x2="3"/>
                <path d="M2 2L3 3"/>
            </svg>"#,
        )
        .unwrap();
        let tags: Vec<_> = doc.primitives.iter().map(|p| p.tag()).collect();
        assert_eq!(tags, ["path", "path", "circle", "rect", "line", "polyline"]);
    }

    #[test]
    fn missing_attributes_default_to_zero() {
        let doc = parse(r#"<svg><rect width="50" height="50"/></svg>"#).unwrap();
        assert_eq!(
            doc.primitives,
            vec![ShapePrimitive::from(RectShape {
                origin: dvec2(0.0, 0.0),
                size: dvec2(50.0, 50.0),
            })]
        );
    }

    #[test]
    fn path_without_d_is_skipped() {
        let doc = parse(r#"<svg><path/><path d=""/></svg>"#).unwrap();
        assert_eq!(doc.primitives.len(), 1);
    }

    #[test]
    fn namespaced_and_doctype_documents() {
        let doc = parse(
            r#"<?xml version="1.0"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 15 15"><circle cx="7.5" cy="7.5" r="5"/></svg>"#,
        )
        .unwrap();
        assert_eq!(doc.root.view_box.as_deref(), Some("0 0 15 15"));
        assert_eq!(doc.primitives.len(), 1);
    }

    #[test]
    fn no_svg_root() {
        assert!(matches!(
            parse("<html><body/></html>"),
            Err(AuditIssue::MissingSvgElement)
        ));
    }

    // ==================== span tests ====================

    #[test]
    fn span_covers_the_root_start_tag() {
        let src = r#"<!-- <svg> --><svg a="x>y" viewBox='0 0 1 1'><svg/></svg>"#;
        let doc = parse(src).unwrap();
        assert_eq!(&src[doc.span.start_tag.clone()], r#"<svg a="x>y" viewBox='0 0 1 1'>"#);
        let view_box = doc.span.attribute("viewBox").unwrap();
        assert_eq!(&src[view_box.range.clone()], "viewBox='0 0 1 1'");
        assert_eq!(&src[view_box.value.clone()], "0 0 1 1");
    }

    #[test]
    fn span_of_self_closing_root() {
        let src = "<?xml version=\"1.0\"?>\n<svg width=\"2\" />";
        let span = RootSpan::locate(src).unwrap();
        assert_eq!(&src[span.start_tag], r#"<svg width="2" />"#);
        assert_eq!(RootSpan::locate("<svg"), None);
    }

    #[test]
    fn namespaced_attributes_are_not_spanned() {
        let span = RootSpan::locate(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:x="urn:x" x:width="3" width="4"/>"#,
        )
        .unwrap();
        let names: Vec<_> = span.attributes.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["width"]);
    }

    #[test]
    fn malformed_markup_is_a_parse_issue() {
        let err = parse("<svg><path d='M0 0'></svg>").unwrap_err();
        assert_eq!(err.kind(), "XML_PARSE_FAILED");
        assert!(err.to_string().starts_with("Error parsing SVG: "));
    }
}
