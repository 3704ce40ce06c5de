//! Static SVG rendering of a built net.
//!
//! Places are circles showing their initial token count, transitions are
//! squares, arcs are straight lines clipped to the node outlines. Output is
//! deterministic for a given model.

use crate::metamodel::{MetaModel, NodeRef, Position};
use std::fmt::Write;

const PLACE_RADIUS: i64 = 16;
const TRANSITION_HALF: i64 = 15;
const PADDING: i64 = 40;

/// Render the net as a standalone SVG document.
pub fn render_svg(net: &MetaModel) -> String {
    let (min, max) = bounds(net);
    let width = max.x - min.x + 2 * PADDING;
    let height = max.y - min.y + 2 * PADDING;

    let mut out = String::with_capacity(1024);
    // `write!` into a String cannot fail.
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{} {} {width} {height}">"#,
        min.x - PADDING,
        min.y - PADDING,
    );
    out.push_str(concat!(
        "<defs>",
        r##"<marker id="arrow" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto"><path d="M 0 0 L 10 5 L 0 10 z" fill="#000"/></marker>"##,
        r##"<marker id="inhibit" viewBox="0 0 10 10" refX="10" refY="5" markerWidth="6" markerHeight="6" orient="auto"><circle cx="5" cy="5" r="4" fill="#fff" stroke="#000"/></marker>"##,
        "</defs>",
    ));

    for arc in net.arcs() {
        let (Some(from), Some(to)) = (net.position(arc.source), net.position(arc.target)) else {
            continue;
        };
        let start = clip(from, to, arc.source);
        let end = clip(to, from, arc.target);
        let marker = if arc.inhibitor { "inhibit" } else { "arrow" };
        let dash = if arc.read { r#" stroke-dasharray="4 2""# } else { "" };
        let _ = write!(
            out,
            r##"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#000"{dash} marker-end="url(#{marker})"/>"##,
            start.0, start.1, end.0, end.1,
        );
        if arc.weight > 1 {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="11" text-anchor="middle">{}</text>"#,
                (start.0 + end.0) / 2.0,
                (start.1 + end.1) / 2.0 - 4.0,
                arc.weight,
            );
        }
    }

    for place in net.places() {
        let Position { x, y } = place.position;
        let _ = write!(
            out,
            r##"<circle cx="{x}" cy="{y}" r="{PLACE_RADIUS}" fill="#fff" stroke="#000"/>"##
        );
        if place.initial != 0 {
            let _ = write!(
                out,
                r#"<text x="{x}" y="{}" font-size="12" text-anchor="middle">{}</text>"#,
                y + 4,
                place.initial,
            );
        }
        label(&mut out, x, y + PLACE_RADIUS + 14, &place.label);
    }

    for transition in net.transitions() {
        let Position { x, y } = transition.position;
        let side = 2 * TRANSITION_HALF;
        let _ = write!(
            out,
            r##"<rect x="{}" y="{}" width="{side}" height="{side}" fill="#fff" stroke="#000"/>"##,
            x - TRANSITION_HALF,
            y - TRANSITION_HALF,
        );
        label(&mut out, x, y + TRANSITION_HALF + 14, &transition.label);
    }

    out.push_str("</svg>");
    out
}

fn label(out: &mut String, x: i64, y: i64, text: &str) {
    let _ = write!(
        out,
        r#"<text x="{x}" y="{y}" font-size="11" text-anchor="middle">{}</text>"#,
        escape(text)
    );
}

fn bounds(net: &MetaModel) -> (Position, Position) {
    let mut points = net
        .places()
        .iter()
        .map(|p| p.position)
        .chain(net.transitions().iter().map(|t| t.position));
    let Some(first) = points.next() else {
        return (Position::default(), Position::default());
    };
    points.fold((first, first), |(min, max), p| {
        (
            Position {
                x: min.x.min(p.x),
                y: min.y.min(p.y),
            },
            Position {
                x: max.x.max(p.x),
                y: max.y.max(p.y),
            },
        )
    })
}

/// Point where the segment from `at` towards `toward` leaves the node's outline.
fn clip(at: Position, toward: Position, node: NodeRef) -> (f64, f64) {
    let (ax, ay) = (at.x as f64, at.y as f64);
    let dx = toward.x as f64 - ax;
    let dy = toward.y as f64 - ay;
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return (ax, ay);
    }
    let reach = match node {
        NodeRef::Place(_) => PLACE_RADIUS as f64,
        NodeRef::Transition(_) => {
            let half = TRANSITION_HALF as f64;
            // Distance from the centre to the square's edge along (dx, dy).
            half / (dx.abs().max(dy.abs()) / len)
        }
    };
    (ax + dx / len * reach, ay + dy / len * reach)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::DeclarationPetriNet;

    fn net() -> MetaModel {
        let decl = DeclarationPetriNet::new()
            .place("ready", 0, 0, 2)
            .place("<done>", 2, 0, 0)
            .transition("go", 1, 0, 0)
            .arc("ready", "go", 1)
            .arc("go", "<done>", 3);
        MetaModel::from_declaration(&decl).expect("build")
    }

    #[test]
    fn renders_every_node_and_arc() {
        let svg = render_svg(&net());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches(r#"r="16""#).count(), 2);
        assert_eq!(svg.matches("<rect ").count(), 1);
        assert_eq!(svg.matches("<line ").count(), 2);
    }

    #[test]
    fn labels_are_escaped() {
        let svg = render_svg(&net());
        assert!(svg.contains("&lt;done&gt;"));
        assert!(!svg.contains("<done>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render_svg(&net()), render_svg(&net()));
    }

    #[test]
    fn viewbox_covers_all_nodes() {
        let svg = render_svg(&net());
        // Nodes span x 0..160 at y 22.
        assert!(svg.contains(r#"viewBox="-40 -18 240 80""#), "{svg}");
    }

    #[test]
    fn empty_model_renders_empty_canvas() {
        let model = MetaModel::from_declaration(&DeclarationPetriNet::new()).expect("build");
        let svg = render_svg(&model);
        assert!(svg.contains(r#"viewBox="-40 -40 80 80""#));
    }
}
