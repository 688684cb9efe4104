//! Paint list: a page tree flattened into ordered drawing commands.
//!
//! Coordinates stay in CSS pixels at 1×. Chrome is painted by [`frame`] and
//! never mixed into [`paint`], so the printable content is identical in both
//! render modes.

use super::{FontFace, Node, NodeKind, PageTree};
use crate::palette::Color;
use serde::Serialize;

/// Fraction of the font size above the baseline.
pub const ASCENT: f32 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    SolidRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
        line_width: f32,
    },
    Ellipse {
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        color: Color,
    },
    Text {
        x: f32,
        /// Top of the line box.
        top: f32,
        /// Height of the line box.
        height: f32,
        baseline: f32,
        text: String,
        face: FontFace,
        /// Font size in points.
        size: f32,
        color: Color,
    },
}

impl PaintCommand {
    /// Vertical extent `(top, bottom)` of the command.
    pub fn extent(&self) -> (f32, f32) {
        match self {
            PaintCommand::SolidRect { y, height, .. }
            | PaintCommand::StrokeRect { y, height, .. } => (*y, y + height),
            PaintCommand::Ellipse { cy, ry, .. } => (cy - ry, cy + ry),
            PaintCommand::Text { top, height, .. } => (*top, top + height),
        }
    }

    pub fn is_finite(&self) -> bool {
        let values: Vec<f32> = match self {
            PaintCommand::SolidRect {
                x, y, width, height, ..
            } => vec![*x, *y, *width, *height],
            PaintCommand::StrokeRect {
                x,
                y,
                width,
                height,
                line_width,
                ..
            } => vec![*x, *y, *width, *height, *line_width],
            PaintCommand::Ellipse { cx, cy, rx, ry, .. } => vec![*cx, *cy, *rx, *ry],
            PaintCommand::Text {
                x,
                top,
                height,
                baseline,
                size,
                ..
            } => vec![*x, *top, *height, *baseline, *size],
        };
        values.iter().all(|v| v.is_finite())
    }
}

/// Flattens the tree in pre-order. Full-height bands are resolved against
/// `canvas_height`.
pub fn paint(tree: &PageTree, canvas_height: f32) -> Vec<PaintCommand> {
    let mut out = vec![PaintCommand::SolidRect {
        x: 0.0,
        y: 0.0,
        width: tree.page.width_px(),
        height: canvas_height,
        color: tree.background,
    }];
    for node in &tree.children {
        paint_node(node, canvas_height, &mut out);
    }
    out
}

fn paint_node(node: &Node, canvas_height: f32, out: &mut Vec<PaintCommand>) {
    let r = node.rect;
    match &node.kind {
        NodeKind::Rect {
            fill,
            stroke,
            extend_to_bottom,
            ..
        } => {
            let height = if *extend_to_bottom {
                (canvas_height - r.y).max(0.0)
            } else {
                r.height
            };
            if let Some(color) = fill {
                out.push(PaintCommand::SolidRect {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height,
                    color: *color,
                });
            }
            if let Some(color) = stroke {
                out.push(PaintCommand::StrokeRect {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height,
                    color: *color,
                    line_width: 1.0,
                });
            }
        }
        NodeKind::Rule { color } => out.push(PaintCommand::SolidRect {
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            color: *color,
        }),
        NodeKind::Ellipse { fill } => out.push(PaintCommand::Ellipse {
            cx: r.x + r.width / 2.0,
            cy: r.y + r.height / 2.0,
            rx: r.width / 2.0,
            ry: r.height / 2.0,
            color: *fill,
        }),
        NodeKind::Text(block) => {
            let size_px = block.style.size_px();
            let line_h = block.style.line_height_px();
            for line in block.lines.iter().filter(|l| !l.text.is_empty()) {
                out.push(PaintCommand::Text {
                    x: line.x,
                    top: line.y,
                    height: line_h,
                    baseline: line.y + (line_h - size_px) / 2.0 + size_px * ASCENT,
                    text: line.text.clone(),
                    face: block.style.face(),
                    size: block.style.size,
                    color: block.style.color,
                });
            }
        }
        NodeKind::Container | NodeKind::Section { .. } | NodeKind::Item => {}
    }
    for child in &node.children {
        paint_node(child, canvas_height, out);
    }
}

/// Screen-only commands drawn around the page: empty in export mode.
pub fn frame(tree: &PageTree) -> Vec<PaintCommand> {
    match tree.chrome.shadow {
        Some(blur) => vec![PaintCommand::SolidRect {
            x: blur / 2.0,
            y: blur / 2.0,
            width: tree.page.width_px(),
            height: tree.frame_height(),
            color: Color::hex(0xd4d4d8),
        }],
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::layout::{full_height_band, Column};
    use crate::rendering::{FontFamily, RenderMode, Role, TextStyle};

    fn tree(mode: RenderMode) -> PageTree {
        let mut col = Column::new(40.0, 40.0, 600.0);
        col.push(full_height_band(0.0, 0.0, 20.0, Color::hex(0x2563eb)));
        col.text(
            "Jane Doe",
            TextStyle::new(FontFamily::Sans, 20.0, Color::BLACK),
            Role::Name,
        );
        let height = col.y() + 40.0;
        PageTree::new("t", mode, Color::WHITE, height, col.into_nodes())
    }

    #[test]
    fn background_first_then_tree_order() {
        let cmds = paint(&tree(RenderMode::Export), 1200.0);
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], PaintCommand::SolidRect { color, .. } if color == Color::WHITE));
        assert!(matches!(cmds[2], PaintCommand::Text { .. }));
    }

    #[test]
    fn bands_reach_the_canvas_bottom() {
        let cmds = paint(&tree(RenderMode::Export), 1500.0);
        match &cmds[1] {
            PaintCommand::SolidRect { height, .. } => assert_eq!(*height, 1500.0),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn baseline_sits_inside_line_box() {
        let cmds = paint(&tree(RenderMode::Export), 1200.0);
        if let PaintCommand::Text {
            top,
            height,
            baseline,
            ..
        } = &cmds[2]
        {
            assert!(*baseline > *top && *baseline < top + height);
        } else {
            panic!("expected text");
        }
    }

    #[test]
    fn chrome_is_separate_from_content() {
        let interactive = tree(RenderMode::Interactive);
        let export = tree(RenderMode::Export);
        assert_eq!(paint(&interactive, 1200.0), paint(&export, 1200.0));
        assert_eq!(frame(&interactive).len(), 1);
        assert!(frame(&export).is_empty());
    }
}
