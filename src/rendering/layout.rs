//! Layout kernel: deterministic text measurement, greedy wrapping and a
//! column cursor that stacks blocks top to bottom.
//!
//! Measurement uses average glyph advances per font family rather than real
//! font metrics. That keeps every render a pure function of its inputs: the
//! same text always breaks at the same place, whatever the zoom level or host.

use super::{
    Align, FontFamily, Node, NodeKind, Rect, Role, SectionKind, TextBlock, TextLine, TextStyle,
};
use crate::palette::Color;

/// Horizontal space between the left and right halves of a split row.
const SPLIT_GUTTER: f32 = 12.0;

fn advance(style: &TextStyle) -> f32 {
    let em = match style.family {
        FontFamily::Sans => 0.52,
        FontFamily::Serif => 0.50,
        FontFamily::Mono => 0.60,
    };
    let weight = if style.bold { 1.06 } else { 1.0 };
    style.size_px() * em * weight + style.letter_spacing
}

/// Width of a single line of text in px.
pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    text.chars().count() as f32 * advance(style)
}

fn display_text(text: &str, style: &TextStyle) -> String {
    if style.uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    }
}

/// Greedy word wrap. Words wider than the line are broken; embedded newlines
/// force a break. Leading and trailing blank lines are dropped.
pub fn wrap(text: &str, style: &TextStyle, max_width: f32) -> Vec<String> {
    let glyph = advance(style).max(f32::EPSILON);
    let per_line = ((max_width / glyph).floor() as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;
        let mut any = false;
        for word in paragraph.split_whitespace() {
            any = true;
            let word_len = word.chars().count();
            if current_len > 0 && current_len + 1 + word_len <= per_line {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if word_len <= per_line {
                current.push_str(word);
                current_len = word_len;
                continue;
            }
            let chars: Vec<char> = word.chars().collect();
            let mut chunks = chars.chunks(per_line).peekable();
            while let Some(chunk) = chunks.next() {
                let piece: String = chunk.iter().collect();
                if chunks.peek().is_some() {
                    lines.push(piece);
                } else {
                    current_len = chunk.len();
                    current = piece;
                }
            }
        }
        if any {
            lines.push(current);
        } else {
            lines.push(String::new());
        }
    }

    while lines.last().map_or(false, |l| l.is_empty()) {
        lines.pop();
    }
    let leading = lines.iter().take_while(|l| l.is_empty()).count();
    lines.drain(..leading);
    lines
}

/// Lays out a text block at (`x`, `y`) within `width`.
///
/// Returns `None` for blank text so absent fields never leave an empty node.
pub fn layout_text(
    text: &str,
    style: TextStyle,
    role: Role,
    x: f32,
    y: f32,
    width: f32,
) -> Option<Node> {
    if text.trim().is_empty() {
        return None;
    }
    let shown = display_text(text.trim(), &style);
    let line_h = style.line_height_px();
    let mut widest = 0.0f32;
    let lines: Vec<TextLine> = wrap(&shown, &style, width)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let w = text_width(&text, &style);
            widest = widest.max(w);
            let lx = match style.align {
                Align::Left => x,
                Align::Center => x + (width - w) / 2.0,
                Align::Right => x + width - w,
            };
            TextLine {
                text,
                x: lx,
                y: y + i as f32 * line_h,
                width: w,
            }
        })
        .collect();
    let height = lines.len() as f32 * line_h;
    let rect = match style.align {
        Align::Left => Rect::new(x, y, widest.min(width), height),
        _ => Rect::new(x, y, width, height),
    };
    Some(Node::leaf(
        NodeKind::Text(TextBlock {
            source: text.to_string(),
            lines,
            style,
            role,
        }),
        rect,
    ))
}

/// Space reserved around a nested column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Insets {
    pub const ZERO: Insets = Insets::all(0.0);

    pub const fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub const fn xy(x: f32, y: f32) -> Self {
        Self {
            top: y,
            right: x,
            bottom: y,
            left: x,
        }
    }

    pub const fn left(v: f32) -> Self {
        Self {
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            left: v,
        }
    }
}

/// Painted behind a nested block once its final height is known.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decoration {
    Card {
        fill: Option<Color>,
        stroke: Option<Color>,
        radius: f32,
    },
    /// A vertical bar down the left edge.
    LeftBar { color: Color, width: f32 },
}

impl Decoration {
    fn node(self, rect: Rect) -> Node {
        match self {
            Decoration::Card {
                fill,
                stroke,
                radius,
            } => Node::leaf(
                NodeKind::Rect {
                    fill,
                    stroke,
                    radius,
                    extend_to_bottom: false,
                },
                rect,
            ),
            Decoration::LeftBar { color, width } => Node::leaf(
                NodeKind::Rect {
                    fill: Some(color),
                    stroke: None,
                    radius: 0.0,
                    extend_to_bottom: false,
                },
                Rect::new(rect.x, rect.y, width, rect.height),
            ),
        }
    }
}

/// Styling of a run of pills (skills, tags).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChipStyle {
    pub text: TextStyle,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub radius: f32,
    pub pad_x: f32,
    pub pad_y: f32,
    pub gap: f32,
}

/// A filled rectangle.
pub fn fill(rect: Rect, color: Color) -> Node {
    Node::leaf(
        NodeKind::Rect {
            fill: Some(color),
            stroke: None,
            radius: 0.0,
            extend_to_bottom: false,
        },
        rect,
    )
}

/// A band that stretches from `y` to the bottom of the canvas, however tall
/// the content grows.
pub fn full_height_band(x: f32, y: f32, width: f32, color: Color) -> Node {
    Node::leaf(
        NodeKind::Rect {
            fill: Some(color),
            stroke: None,
            radius: 0.0,
            extend_to_bottom: true,
        },
        Rect::new(x, y, width, 0.0),
    )
}

pub fn ellipse(rect: Rect, color: Color) -> Node {
    Node::leaf(NodeKind::Ellipse { fill: color }, rect)
}

/// Vertical stacking cursor.
#[derive(Debug, Clone)]
pub struct Column {
    x: f32,
    y: f32,
    width: f32,
    nodes: Vec<Node>,
}

impl Column {
    pub fn new(x: f32, y: f32, width: f32) -> Self {
        Self {
            x,
            y,
            width: width.max(1.0),
            nodes: Vec::new(),
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    /// Current cursor position (top of the next block).
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn gap(&mut self, px: f32) -> &mut Self {
        self.y += px;
        self
    }

    /// Moves the cursor down to `y` if it is above it.
    pub fn advance_to(&mut self, y: f32) {
        self.y = self.y.max(y);
    }

    /// Adds a node without moving the cursor.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Stacks a wrapped text block. Blank text is skipped; returns whether
    /// anything was printed.
    pub fn text(&mut self, text: &str, style: TextStyle, role: Role) -> bool {
        match layout_text(text, style, role, self.x, self.y, self.width) {
            Some(node) => {
                self.y = node.rect.bottom();
                self.nodes.push(node);
                true
            }
            None => false,
        }
    }

    /// A horizontal rule across the column.
    pub fn rule(&mut self, color: Color, thickness: f32) -> &mut Self {
        self.nodes.push(Node::leaf(
            NodeKind::Rule { color },
            Rect::new(self.x, self.y, self.width, thickness),
        ));
        self.y += thickness;
        self
    }

    /// Left text and right-aligned text on the same baseline; the left side
    /// wraps in whatever width the right side leaves.
    pub fn split_row(
        &mut self,
        left: (&str, TextStyle, Role),
        right: (&str, TextStyle, Role),
    ) {
        let right_text = right.0.trim();
        let right_w = if right_text.is_empty() {
            0.0
        } else {
            text_width(&display_text(right_text, &right.1), &right.1).min(self.width * 0.45)
        };
        let left_w = if right_w > 0.0 {
            self.width - right_w - SPLIT_GUTTER
        } else {
            self.width
        };
        let mut bottom = self.y;
        if let Some(node) = layout_text(left.0, left.1, left.2, self.x, self.y, left_w) {
            bottom = bottom.max(node.rect.bottom());
            self.nodes.push(node);
        }
        let right_style = right.1.align(Align::Right);
        let rx = self.x + self.width - right_w;
        if let Some(node) = layout_text(right.0, right_style, right.2, rx, self.y, right_w) {
            bottom = bottom.max(node.rect.bottom());
            self.nodes.push(node);
        }
        self.y = bottom;
    }

    /// Flow-wrapped pills, one per non-blank label.
    pub fn chips(&mut self, labels: &[&str], style: &ChipStyle, role: Role) {
        let line_h = style.text.line_height_px();
        let chip_h = line_h + 2.0 * style.pad_y;
        let mut cx = self.x;
        let mut row_y = self.y;
        let mut placed = false;
        for label in labels.iter().map(|l| l.trim()).filter(|l| !l.is_empty()) {
            let inner = text_width(&display_text(label, &style.text), &style.text)
                .min(self.width - 2.0 * style.pad_x);
            let chip_w = inner + 2.0 * style.pad_x;
            if placed && cx + chip_w > self.x + self.width {
                cx = self.x;
                row_y += chip_h + style.gap;
            }
            let rect = Rect::new(cx, row_y, chip_w, chip_h);
            let mut children = vec![Node::leaf(
                NodeKind::Rect {
                    fill: style.fill,
                    stroke: style.stroke,
                    radius: style.radius,
                    extend_to_bottom: false,
                },
                rect,
            )];
            children.extend(layout_text(
                label,
                style.text,
                role,
                cx + style.pad_x,
                row_y + style.pad_y,
                inner.max(1.0),
            ));
            self.nodes.push(Node {
                kind: NodeKind::Item,
                rect,
                children,
            });
            cx += chip_w + style.gap;
            placed = true;
        }
        if placed {
            self.y = row_y + chip_h;
        }
    }

    /// Lays out a nested block in an inset sub-column and records it as a
    /// node of the given kind. Returns the block's rect.
    pub fn nest(
        &mut self,
        kind: NodeKind,
        insets: Insets,
        decoration: Option<Decoration>,
        build: impl FnOnce(&mut Column),
    ) -> Rect {
        let mut inner = Column::new(
            self.x + insets.left,
            self.y + insets.top,
            self.width - insets.left - insets.right,
        );
        build(&mut inner);
        let rect = Rect::new(
            self.x,
            self.y,
            self.width,
            inner.y + insets.bottom - self.y,
        );
        let mut children = Vec::with_capacity(inner.nodes.len() + 1);
        if let Some(decoration) = decoration {
            children.push(decoration.node(rect));
        }
        children.extend(inner.nodes);
        self.nodes.push(Node {
            kind,
            rect,
            children,
        });
        self.y = rect.bottom();
        rect
    }

    /// A titled section. The builder prints its own heading.
    pub fn section(
        &mut self,
        section: SectionKind,
        heading: &str,
        build: impl FnOnce(&mut Column),
    ) {
        self.nest(
            NodeKind::Section {
                section,
                heading: heading.to_string(),
            },
            Insets::ZERO,
            None,
            build,
        );
    }

    /// One entry inside a section.
    pub fn item(&mut self, build: impl FnOnce(&mut Column)) {
        self.nest(NodeKind::Item, Insets::ZERO, None, build);
    }

    /// Side-by-side sub-columns sized by `weights`; the cursor resumes below
    /// the tallest.
    pub fn columns(&mut self, weights: &[f32], gutter: f32, build: impl FnOnce(&mut [Column])) {
        let total: f32 = weights.iter().sum::<f32>().max(f32::EPSILON);
        let usable = self.width - gutter * weights.len().saturating_sub(1) as f32;
        let mut x = self.x;
        let mut cols: Vec<Column> = weights
            .iter()
            .map(|w| {
                let width = usable * w / total;
                let col = Column::new(x, self.y, width);
                x += width + gutter;
                col
            })
            .collect();
        build(&mut cols);
        let top = self.y;
        for col in cols {
            let bottom = col.y;
            if !col.nodes.is_empty() {
                self.nodes.push(Node {
                    kind: NodeKind::Container,
                    rect: Rect::new(col.x, top, col.width, bottom - top),
                    children: col.nodes,
                });
            }
            self.y = self.y.max(bottom);
        }
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::FontFamily;

    fn body() -> TextStyle {
        TextStyle::new(FontFamily::Sans, 10.0, Color::BLACK)
    }

    #[test]
    fn wrap_respects_width() {
        let style = body();
        let lines = wrap("the quick brown fox jumps over the lazy dog", &style, 60.0);
        assert!(lines.len() > 1);
        for l in &lines {
            assert!(text_width(l, &style) <= 60.0 + 0.01, "{:?} too wide", l);
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_breaks_long_words_and_newlines() {
        let style = TextStyle::new(FontFamily::Mono, 10.0, Color::BLACK);
        // 10pt mono is 8px per glyph: 5 glyphs per 42px line.
        let lines = wrap("abcdefghijkl\nxy", &style, 42.0);
        assert_eq!(lines, vec!["abcde", "fghij", "kl", "xy"]);
    }

    #[test]
    fn wrap_drops_outer_blank_lines() {
        let lines = wrap("\n\nhello\n\nworld\n", &body(), 500.0);
        assert_eq!(lines, vec!["hello", "", "world"]);
    }

    #[test]
    fn blank_text_is_not_laid_out() {
        let mut col = Column::new(0.0, 0.0, 200.0);
        assert!(!col.text("   ", body(), Role::Body));
        assert!(col.is_empty());
        assert_eq!(col.y(), 0.0);
    }

    #[test]
    fn column_stacks_blocks() {
        let mut col = Column::new(10.0, 20.0, 300.0);
        col.text("one", body(), Role::Body);
        let after_one = col.y();
        col.gap(5.0);
        col.text("two", body(), Role::Body);
        let nodes = col.into_nodes();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].rect.y, 20.0);
        assert_eq!(nodes[1].rect.y, after_one + 5.0);
    }

    #[test]
    fn centered_line_is_centered() {
        let node = layout_text("Jane", body().align(Align::Center), Role::Name, 0.0, 0.0, 200.0)
            .unwrap();
        if let NodeKind::Text(block) = &node.kind {
            let line = &block.lines[0];
            assert!((line.x + line.width / 2.0 - 100.0).abs() < 0.01);
        } else {
            panic!("expected text");
        }
    }

    #[test]
    fn split_row_without_right_uses_full_width() {
        let mut col = Column::new(0.0, 0.0, 400.0);
        col.split_row(("Acme", body(), Role::Body), ("", body(), Role::Meta));
        let nodes = col.into_nodes();
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn split_row_right_aligns_meta() {
        let mut col = Column::new(0.0, 0.0, 400.0);
        col.split_row(("Acme", body(), Role::Body), ("2020", body(), Role::Meta));
        let nodes = col.into_nodes();
        assert!((nodes[1].rect.right() - 400.0).abs() < 0.01);
    }

    #[test]
    fn chips_wrap_onto_new_rows() {
        let style = ChipStyle {
            text: body(),
            fill: Some(Color::WHITE),
            stroke: None,
            radius: 4.0,
            pad_x: 6.0,
            pad_y: 2.0,
            gap: 4.0,
        };
        let mut col = Column::new(0.0, 0.0, 100.0);
        col.chips(&["Rust", "TypeScript", "", "Go"], &style, Role::Label);
        let nodes = col.into_nodes();
        assert_eq!(nodes.len(), 3);
        assert!(nodes[1].rect.y > nodes[0].rect.y);
    }

    #[test]
    fn nest_paints_decoration_first() {
        let mut col = Column::new(0.0, 0.0, 200.0);
        let rect = col.nest(
            NodeKind::Item,
            Insets::all(8.0),
            Some(Decoration::Card {
                fill: Some(Color::WHITE),
                stroke: None,
                radius: 4.0,
            }),
            |c| {
                c.text("inside", body(), Role::Body);
            },
        );
        let nodes = col.into_nodes();
        assert!(matches!(nodes[0].children[0].kind, NodeKind::Rect { .. }));
        assert_eq!(nodes[0].children[0].rect, rect);
        assert_eq!(nodes[0].children[1].rect.x, 8.0);
    }

    #[test]
    fn columns_resume_below_tallest() {
        let mut col = Column::new(0.0, 0.0, 300.0);
        col.columns(&[2.0, 1.0], 10.0, |cols| {
            cols[0].text("a\nb\nc", body(), Role::Body);
            cols[1].text("d", body(), Role::Body);
        });
        let three_lines = 3.0 * body().line_height_px();
        assert!((col.y() - three_lines).abs() < 0.01);
        let nodes = col.into_nodes();
        assert_eq!(nodes.len(), 2);
        assert!((nodes[0].rect.width - 193.333).abs() < 0.01);
        assert!((nodes[1].rect.x - 203.333).abs() < 0.01);
    }
}
