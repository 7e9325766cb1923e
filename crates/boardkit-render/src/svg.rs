//! SVG serialization of a visual tree.

use crate::scene::{NodeId, ShapeNode, TextNode, Visual, VisualTree};
use boardkit_core::shapes::SerializableColor;
use kurbo::{Affine, Rect, Shape};
use peniko::Color;
use std::fmt::{self, Write};

/// Document-level settings of the written SVG.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Visible region in the root's coordinate space.
    pub view_box: Rect,
    pub background: Option<Color>,
    /// Indent nested elements, one per line.
    pub pretty: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            view_box: Rect::new(0.0, 0.0, 800.0, 600.0),
            background: None,
            pretty: false,
        }
    }
}

impl SvgOptions {
    /// View box around everything below `root`, grown by `margin`.
    pub fn fit(tree: &VisualTree, root: NodeId, margin: f64) -> Self {
        let view_box = content_bounds(tree, root)
            .map(|bounds| bounds.inflate(margin, margin))
            .unwrap_or(Self::default().view_box);
        Self {
            view_box,
            ..Self::default()
        }
    }
}

fn css(color: Color) -> String {
    SerializableColor::from(color).to_css()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Approximate box of a text run; glyph metrics are not available here.
fn text_bounds(text: &TextNode) -> Rect {
    let half_width = text.text.chars().count() as f64 * text.font_size * 0.3;
    let half_height = text.font_size / 2.0;
    Rect::new(
        text.center.x - half_width,
        text.center.y - half_height,
        text.center.x + half_width,
        text.center.y + half_height,
    )
}

/// Bounds of all painted content below `root`, in `root`'s parent space.
pub fn content_bounds(tree: &VisualTree, root: NodeId) -> Option<Rect> {
    let mut bounds: Option<Rect> = None;
    tree.walk(root, |_, visual, transform, _| {
        let local = match visual {
            Visual::Group { .. } => return,
            Visual::Shape(shape) => {
                let rect = shape.path.bounding_box();
                let half = shape.stroke.map_or(0.0, |_| shape.stroke_width / 2.0);
                rect.inflate(half, half)
            }
            Visual::Text(text) => text_bounds(text),
            Visual::Image { rect, .. } => *rect,
        };
        let rect = transform.transform_rect_bbox(local);
        bounds = Some(bounds.map_or(rect, |b| b.union(rect)));
    });
    bounds
}

fn transform_attr(transform: Affine) -> String {
    if transform == Affine::IDENTITY {
        return String::new();
    }
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!(r#" transform="matrix({a} {b} {c} {d} {e} {f})""#)
}

fn shape_attrs(shape: &ShapeNode) -> String {
    let mut attrs = format!(r#" d="{}""#, shape.path.to_svg());
    match shape.fill {
        Some(fill) => attrs.push_str(&format!(r#" fill="{}""#, css(fill))),
        None => attrs.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = shape.stroke {
        attrs.push_str(&format!(r#" stroke="{}" stroke-width="{}""#, css(stroke), shape.stroke_width));
        if !shape.dashes.is_empty() {
            let dashes: Vec<String> = shape.dashes.iter().map(f64::to_string).collect();
            attrs.push_str(&format!(r#" stroke-dasharray="{}""#, dashes.join(" ")));
        }
    }
    attrs
}

fn write_node(out: &mut impl Write, tree: &VisualTree, node: NodeId, depth: usize, pretty: bool) -> fmt::Result {
    let Some(visual) = tree.visual(node) else {
        return Ok(());
    };
    let indent = if pretty { "  ".repeat(depth) } else { String::new() };
    let newline = if pretty { "\n" } else { "" };
    let transform = transform_attr(tree.transform(node).unwrap_or(Affine::IDENTITY));
    match visual {
        Visual::Group { class } => {
            let class = class.as_deref().map(|class| format!(r#" class="{}""#, escape(class))).unwrap_or_default();
            let children = tree.children(node);
            if children.is_empty() {
                return write!(out, "{indent}<g{class}{transform}/>{newline}");
            }
            write!(out, "{indent}<g{class}{transform}>{newline}")?;
            for &child in children {
                write_node(out, tree, child, depth + 1, pretty)?;
            }
            write!(out, "{indent}</g>{newline}")
        }
        Visual::Shape(shape) => write!(out, "{indent}<path{}{transform}/>{newline}", shape_attrs(shape)),
        Visual::Text(text) => write!(
            out,
            r#"{indent}<text x="{}" y="{}" font-size="{}" fill="{}" text-anchor="middle" dominant-baseline="central"{transform}>{}</text>{newline}"#,
            text.center.x,
            text.center.y,
            text.font_size,
            css(text.color),
            escape(&text.text),
        ),
        Visual::Image { url, rect } => write!(
            out,
            r#"{indent}<image href="{}" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="none"{transform}/>{newline}"#,
            escape(url),
            rect.x0,
            rect.y0,
            rect.width(),
            rect.height(),
        ),
    }
}

/// Write the subtree at `root` as a standalone SVG document into `out`.
pub fn write_svg_to(out: &mut impl Write, tree: &VisualTree, root: NodeId, options: &SvgOptions) -> fmt::Result {
    let vb = options.view_box;
    let newline = if options.pretty { "\n" } else { "" };
    write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">{newline}"#,
        vb.width(),
        vb.height(),
        vb.x0,
        vb.y0,
        vb.width(),
        vb.height(),
    )?;
    if let Some(background) = options.background {
        write!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>{newline}"#,
            vb.x0,
            vb.y0,
            vb.width(),
            vb.height(),
            css(background)
        )?;
    }
    write_node(out, tree, root, usize::from(options.pretty), options.pretty)?;
    write!(out, "</svg>{newline}")
}

/// The subtree at `root` as a standalone SVG document.
pub fn write_svg(tree: &VisualTree, root: NodeId, options: &SvgOptions) -> String {
    let mut out = String::new();
    if let Err(err) = write_svg_to(&mut out, tree, root, options) {
        log::error!("svg output truncated: {err}");
    }
    out
}
