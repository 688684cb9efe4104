//! PDF encoder for rasterized snapshots.
//!
//! Every page slice becomes one fixed-size PDF page. Text is set in the
//! standard base-14 fonts with WinAnsiEncoding, so nothing is embedded and the
//! output depends only on the snapshot: no timestamps, no document IDs.

use crate::error::ExportError;
use crate::palette::Color;
use crate::rendering::paint::PaintCommand;
use crate::rendering::raster::{PageSlice, Snapshot};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::collections::BTreeMap;

/// CSS px (96 dpi) to PDF points (72 dpi).
pub const PX_TO_PT: f32 = 0.75;

/// Bézier control distance for a quarter circle.
const KAPPA: f32 = 0.552_284_8;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Physical page size in points; content is inset by `margin_pt` on every
/// side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfPage {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PdfPage {
    pub fn from_mm(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_pt: round2(width_mm * MM_TO_PT),
            height_pt: round2(height_mm * MM_TO_PT),
            margin_pt: 0.0,
        }
    }

    pub fn with_margin_mm(mut self, margin_mm: f32) -> Self {
        self.margin_pt = round2(margin_mm * MM_TO_PT);
        self
    }
}

fn round2(v: f32) -> f32 {
    (v * 100.0).round() / 100.0
}

fn real(v: f32) -> Object {
    Object::Real(round2(v))
}

fn rgb(op: &str, color: Color) -> Operation {
    let (r, g, b) = color.to_unit();
    Operation::new(op, vec![real(r), real(g), real(b)])
}

/// Maps a char onto WinAnsiEncoding, or `None` when the encoding has no slot.
fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        c if (c as u32) < 0x80 => c as u8,
        c if (0xa0..=0xff).contains(&(c as u32)) => c as u32 as u8,
        _ => return None,
    };
    Some(byte)
}

/// Maps a char onto WinAnsiEncoding; anything outside it prints as `?`.
pub fn win_ansi(c: char) -> u8 {
    win_ansi_byte(c).unwrap_or(b'?')
}

fn encode_text(text: &str) -> Vec<u8> {
    let mut lost = 0usize;
    let bytes = text
        .chars()
        .map(|c| {
            win_ansi_byte(c).unwrap_or_else(|| {
                lost += 1;
                b'?'
            })
        })
        .collect();
    if lost > 0 {
        log::warn!(
            "{} character(s) of {:?} have no WinAnsi code and print as `?`",
            lost,
            text
        );
    }
    bytes
}

/// Font resource names keyed by base-14 font, in a stable order.
fn font_names(snapshot: &Snapshot) -> BTreeMap<&'static str, String> {
    let mut fonts: BTreeMap<&'static str, String> = BTreeMap::new();
    for page in &snapshot.pages {
        for cmd in &page.commands {
            if let PaintCommand::Text { face, .. } = cmd {
                fonts.entry(face.base14_name()).or_default();
            }
        }
    }
    for (i, name) in fonts.values_mut().enumerate() {
        *name = format!("F{}", i + 1);
    }
    fonts
}

struct PageWriter<'a> {
    page: PdfPage,
    fonts: &'a BTreeMap<&'static str, String>,
    ops: Vec<Operation>,
}

impl<'a> PageWriter<'a> {
    fn x(&self, x_px: f32) -> f32 {
        self.page.margin_pt + x_px * PX_TO_PT
    }

    fn y(&self, y_px: f32) -> f32 {
        self.page.height_pt - self.page.margin_pt - y_px * PX_TO_PT
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let operands = vec![
            real(self.x(x)),
            real(self.y(y + height)),
            real(width * PX_TO_PT),
            real(height * PX_TO_PT),
        ];
        self.ops.push(Operation::new("re", operands));
    }

    fn ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32) {
        let (cx, cy) = (self.x(cx), self.y(cy));
        let (rx, ry) = (rx * PX_TO_PT, ry * PX_TO_PT);
        let (kx, ky) = (rx * KAPPA, ry * KAPPA);
        self.ops.push(Operation::new("m", vec![real(cx + rx), real(cy)]));
        let arcs = [
            [cx + rx, cy + ky, cx + kx, cy + ry, cx, cy + ry],
            [cx - kx, cy + ry, cx - rx, cy + ky, cx - rx, cy],
            [cx - rx, cy - ky, cx - kx, cy - ry, cx, cy - ry],
            [cx + kx, cy - ry, cx + rx, cy - ky, cx + rx, cy],
        ];
        for arc in arcs {
            self.ops
                .push(Operation::new("c", arc.iter().map(|v| real(*v)).collect()));
        }
        self.ops.push(Operation::new("h", vec![]));
    }

    fn command(&mut self, cmd: &PaintCommand) {
        match cmd {
            PaintCommand::SolidRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                self.ops.push(rgb("rg", *color));
                self.rect(*x, *y, *width, *height);
                self.ops.push(Operation::new("f", vec![]));
            }
            PaintCommand::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                self.ops.push(rgb("RG", *color));
                self.ops
                    .push(Operation::new("w", vec![real(line_width * PX_TO_PT)]));
                self.rect(*x, *y, *width, *height);
                self.ops.push(Operation::new("S", vec![]));
            }
            PaintCommand::Ellipse {
                cx,
                cy,
                rx,
                ry,
                color,
            } => {
                self.ops.push(rgb("rg", *color));
                self.ellipse(*cx, *cy, *rx, *ry);
                self.ops.push(Operation::new("f", vec![]));
            }
            PaintCommand::Text {
                x,
                baseline,
                text,
                face,
                size,
                color,
                ..
            } => {
                let Some(font) = self.fonts.get(face.base14_name()) else {
                    return;
                };
                self.ops.push(rgb("rg", *color));
                self.ops.push(Operation::new("BT", vec![]));
                self.ops.push(Operation::new(
                    "Tf",
                    vec![Object::Name(font.as_bytes().to_vec()), real(*size)],
                ));
                let origin = vec![real(self.x(*x)), real(self.y(*baseline))];
                self.ops.push(Operation::new("Td", origin));
                self.ops.push(Operation::new(
                    "Tj",
                    vec![Object::String(encode_text(text), StringFormat::Literal)],
                ));
                self.ops.push(Operation::new("ET", vec![]));
            }
        }
    }

    fn finish(self) -> Result<Vec<u8>, ExportError> {
        Ok(Content {
            operations: self.ops,
        }
        .encode()?)
    }
}

fn page_content(
    slice: &PageSlice,
    page: PdfPage,
    fonts: &BTreeMap<&'static str, String>,
) -> Result<Vec<u8>, ExportError> {
    let mut writer = PageWriter {
        page,
        fonts,
        ops: Vec::with_capacity(slice.commands.len() * 4),
    };
    for cmd in &slice.commands {
        writer.command(cmd);
    }
    writer.finish()
}

/// Encodes `snapshot` as a PDF with one `page`-sized page per slice.
pub fn write_pdf(snapshot: &Snapshot, page: PdfPage) -> Result<Vec<u8>, ExportError> {
    if snapshot.pages.is_empty() {
        return Err(ExportError::Pdf("snapshot has no pages".into()));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let fonts = font_names(snapshot);
    let mut font_dict = Dictionary::new();
    for (base, name) in &fonts {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => Object::Name(base.as_bytes().to_vec()),
            "Encoding" => "WinAnsiEncoding",
        });
        font_dict.set(name.as_bytes().to_vec(), font_id);
    }
    let resources_id = doc.add_object(dictionary! {
        "Font" => font_dict,
    });

    let media_box = vec![
        real(0.0),
        real(0.0),
        real(page.width_pt),
        real(page.height_pt),
    ];
    let mut kids: Vec<Object> = Vec::with_capacity(snapshot.pages.len());
    for slice in &snapshot.pages {
        let content = page_content(slice, page, &fonts)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;
    log::debug!(
        "encoded {} page(s), {} font(s), {} bytes",
        count,
        fonts.len(),
        bytes.len()
    );
    Ok(bytes)
}
