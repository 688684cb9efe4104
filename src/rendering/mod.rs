//! Page tree, layout kernel, paint list and rasterizer.
//!
//! A template produces a [`PageTree`]: absolutely positioned nodes in CSS
//! pixels at 1× (96 dpi) on an A4-wide canvas. Everything downstream (the
//! preview transform, the paint list, pagination, PDF encoding) consumes this
//! one tree, so preview and export can never disagree about line breaks.

pub mod layout;
pub mod paint;
pub mod raster;

use crate::palette::Color;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Millimetres to CSS pixels at 96 dpi.
pub const MM_TO_PX: f32 = 96.0 / 25.4;
/// Points to CSS pixels at 96 dpi.
pub const PT_TO_PX: f32 = 96.0 / 72.0;

/// Whether a render is framed for the screen or clean for print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Interactive,
    Export,
}

impl RenderMode {
    pub fn is_export(self) -> bool {
        self == RenderMode::Export
    }
}

impl From<bool> for RenderMode {
    fn from(export_mode: bool) -> Self {
        if export_mode {
            RenderMode::Export
        } else {
            RenderMode::Interactive
        }
    }
}

/// Physical page dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageGeometry {
    pub const A4: PageGeometry = PageGeometry {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn width_px(&self) -> f32 {
        self.width_mm * MM_TO_PX
    }

    pub fn height_px(&self) -> f32 {
        self.height_mm * MM_TO_PX
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Screen-only framing around the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Chrome {
    /// Drop shadow under the page, blur radius in px.
    pub shadow: Option<f32>,
    /// Outer margin used to center the page on screen, in px.
    pub frame_margin: f32,
}

impl Chrome {
    pub fn for_mode(mode: RenderMode) -> Self {
        match mode {
            RenderMode::Interactive => Chrome {
                shadow: Some(6.0),
                frame_margin: 16.0,
            },
            RenderMode::Export => Chrome {
                shadow: None,
                frame_margin: 0.0,
            },
        }
    }

    pub fn is_bare(&self) -> bool {
        self.shadow.is_none() && self.frame_margin == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    Sans,
    Serif,
    Mono,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// A concrete font face; maps onto the PDF base-14 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FontFace {
    pub family: FontFamily,
    pub bold: bool,
    pub italic: bool,
}

impl FontFace {
    pub fn base14_name(&self) -> &'static str {
        match (self.family, self.bold, self.italic) {
            (FontFamily::Sans, false, false) => "Helvetica",
            (FontFamily::Sans, true, false) => "Helvetica-Bold",
            (FontFamily::Sans, false, true) => "Helvetica-Oblique",
            (FontFamily::Sans, true, true) => "Helvetica-BoldOblique",
            (FontFamily::Serif, false, false) => "Times-Roman",
            (FontFamily::Serif, true, false) => "Times-Bold",
            (FontFamily::Serif, false, true) => "Times-Italic",
            (FontFamily::Serif, true, true) => "Times-BoldItalic",
            (FontFamily::Mono, false, false) => "Courier",
            (FontFamily::Mono, true, false) => "Courier-Bold",
            (FontFamily::Mono, false, true) => "Courier-Oblique",
            (FontFamily::Mono, true, true) => "Courier-BoldOblique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextStyle {
    pub family: FontFamily,
    /// Size in points.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: Color,
    pub align: Align,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
    /// Extra advance per glyph, in px.
    pub letter_spacing: f32,
    pub uppercase: bool,
}

impl TextStyle {
    pub fn new(family: FontFamily, size: f32, color: Color) -> Self {
        Self {
            family,
            size,
            bold: false,
            italic: false,
            color,
            align: Align::Left,
            line_height: 1.4,
            letter_spacing: 0.0,
            uppercase: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn spacing(mut self, letter_spacing: f32) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    pub fn face(&self) -> FontFace {
        FontFace {
            family: self.family,
            bold: self.bold,
            italic: self.italic,
        }
    }

    pub fn size_px(&self) -> f32 {
        self.size * PT_TO_PX
    }

    pub fn line_height_px(&self) -> f32 {
        self.size_px() * self.line_height
    }
}

/// What a piece of text is, independent of how a template styles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Name,
    Designation,
    Contact,
    Heading,
    Body,
    Meta,
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Summary,
    Contact,
    Experience,
    Education,
    Projects,
    Skills,
    Languages,
    Interests,
    Certifications,
}

/// One laid-out line of a text block, in absolute page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    /// The text as the template supplied it, before wrapping or case changes.
    pub source: String,
    pub lines: Vec<TextLine>,
    pub style: TextStyle,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Container,
    Section { section: SectionKind, heading: String },
    Item,
    Text(TextBlock),
    Rect {
        fill: Option<Color>,
        stroke: Option<Color>,
        radius: f32,
        /// Stretch to the bottom of the canvas (full-height bands).
        extend_to_bottom: bool,
    },
    Ellipse { fill: Color },
    Rule { color: Color },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub rect: Rect,
    pub children: Vec<Node>,
}

impl Node {
    pub fn leaf(kind: NodeKind, rect: Rect) -> Self {
        Self {
            kind,
            rect,
            children: Vec::new(),
        }
    }

    /// Pre-order walk over this node and its descendants.
    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }
}

/// The chrome-free part of a page tree, used for preview/export parity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageContent<'a> {
    pub template_id: &'a str,
    pub page: PageGeometry,
    pub background: Color,
    pub height: f32,
    pub children: &'a [Node],
}

/// One rendered page (plus any downward overflow) prior to rasterization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTree {
    pub template_id: String,
    pub mode: RenderMode,
    pub page: PageGeometry,
    pub chrome: Chrome,
    pub background: Color,
    /// Extent of the content in px; may exceed one page height.
    pub height: f32,
    pub children: Vec<Node>,
}

impl PageTree {
    pub fn new(
        template_id: impl Into<String>,
        mode: RenderMode,
        background: Color,
        height: f32,
        children: Vec<Node>,
    ) -> Self {
        Self {
            template_id: template_id.into(),
            mode,
            page: PageGeometry::A4,
            chrome: Chrome::for_mode(mode),
            background,
            height,
            children,
        }
    }

    /// A well-formed page with nothing on it.
    pub fn blank(template_id: impl Into<String>, mode: RenderMode) -> Self {
        Self::new(template_id, mode, Color::WHITE, 0.0, Vec::new())
    }

    /// Height of the page box: content extent, but never less than one page.
    pub fn frame_height(&self) -> f32 {
        self.height.max(self.page.height_px())
    }

    pub fn walk<'a>(&'a self, visit: &mut dyn FnMut(&'a Node)) {
        for child in &self.children {
            child.walk(visit);
        }
    }

    pub fn content(&self) -> PageContent<'_> {
        PageContent {
            template_id: &self.template_id,
            page: self.page,
            background: self.background,
            height: self.height,
            children: &self.children,
        }
    }

    /// Sections in document order.
    pub fn sections(&self) -> Vec<SectionKind> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let NodeKind::Section { section, .. } = &n.kind {
                out.push(*section);
            }
        });
        out
    }

    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections().contains(&kind)
    }

    /// Section headings as the section nodes record them.
    pub fn headings(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let NodeKind::Section { heading, .. } = &n.kind {
                out.push(heading.as_str());
            }
        });
        out
    }

    pub fn texts(&self) -> Vec<&TextBlock> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
            if let NodeKind::Text(block) = &n.kind {
                out.push(block);
            }
        });
        out
    }

    pub fn texts_with_role(&self, role: Role) -> Vec<&TextBlock> {
        self.texts().into_iter().filter(|t| t.role == role).collect()
    }

    /// Every printed line, in paint order.
    pub fn text_content(&self) -> Vec<&str> {
        self.texts()
            .into_iter()
            .flat_map(|t| t.lines.iter().map(|l| l.text.as_str()))
            .collect()
    }

    /// SHA-256 over the canonical JSON form of the tree.
    pub fn fingerprint(&self) -> String {
        // Serializing plain data with string keys cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        hex::encode(Sha256::digest(&json))
    }
}
