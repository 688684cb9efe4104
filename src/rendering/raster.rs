//! Rasterizer: snaps the paint list to the device pixel grid and cuts the
//! canvas into fixed-height page slices.

use super::paint::{paint, PaintCommand};
use super::PageTree;
use crate::error::ExportError;
use serde::Serialize;

/// Device surface the tree is rasterized onto, in CSS px at 1×.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterSurface {
    pub width: f32,
    /// Minimum canvas height (the offscreen container).
    pub min_height: f32,
    /// Height of one output page.
    pub page_height: f32,
    /// Device pixels per CSS pixel.
    pub pixel_ratio: f32,
}

/// One page-height band of the canvas, translated to its own origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSlice {
    pub index: usize,
    /// Canvas offset of the slice's top edge.
    pub offset: f32,
    pub height: f32,
    pub commands: Vec<PaintCommand>,
}

/// Rasterized output of one tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub width: f32,
    pub canvas_height: f32,
    pub page_height: f32,
    pub pixel_ratio: f32,
    pub pages: Vec<PageSlice>,
}

impl Snapshot {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Device pixel size of one page.
    pub fn device_size(&self) -> (u32, u32) {
        (
            (self.width * self.pixel_ratio).round() as u32,
            (self.page_height * self.pixel_ratio).round() as u32,
        )
    }
}

/// Rounds to the nearest device pixel.
pub fn snap(value: f32, pixel_ratio: f32) -> f32 {
    (value * pixel_ratio).round() / pixel_ratio
}

fn snap_command(cmd: PaintCommand, ratio: f32) -> PaintCommand {
    let s = |v: f32| snap(v, ratio);
    match cmd {
        PaintCommand::SolidRect {
            x,
            y,
            width,
            height,
            color,
        } => PaintCommand::SolidRect {
            x: s(x),
            y: s(y),
            width: s(width),
            height: s(height),
            color,
        },
        PaintCommand::StrokeRect {
            x,
            y,
            width,
            height,
            color,
            line_width,
        } => PaintCommand::StrokeRect {
            x: s(x),
            y: s(y),
            width: s(width),
            height: s(height),
            color,
            line_width: s(line_width).max(1.0 / ratio),
        },
        PaintCommand::Ellipse {
            cx,
            cy,
            rx,
            ry,
            color,
        } => PaintCommand::Ellipse {
            cx: s(cx),
            cy: s(cy),
            rx: s(rx),
            ry: s(ry),
            color,
        },
        PaintCommand::Text {
            x,
            top,
            height,
            baseline,
            text,
            face,
            size,
            color,
        } => PaintCommand::Text {
            x: s(x),
            top: s(top),
            height: s(height),
            baseline: s(baseline),
            text,
            face,
            size,
            color,
        },
    }
}

/// Slice boundaries over `[0, canvas_height)`. A boundary that would cut a
/// text line moves up to the top of that line.
pub fn page_breaks(commands: &[PaintCommand], canvas_height: f32, page_height: f32) -> Vec<f32> {
    const EPS: f32 = 0.01;
    let lines: Vec<(f32, f32)> = commands
        .iter()
        .filter(|c| matches!(c, PaintCommand::Text { .. }))
        .map(PaintCommand::extent)
        .collect();

    let mut breaks = vec![0.0];
    let mut start = 0.0f32;
    loop {
        let mut end = start + page_height;
        if end >= canvas_height - EPS {
            break;
        }
        let straddling = lines
            .iter()
            .filter(|(top, bottom)| *top > start + EPS && *top < end && *bottom > end + EPS)
            .map(|(top, _)| *top)
            .fold(f32::INFINITY, f32::min);
        if straddling.is_finite() {
            end = straddling;
        }
        breaks.push(end);
        start = end;
    }
    breaks
}

fn clip(cmd: &PaintCommand, start: f32, end: f32) -> Option<PaintCommand> {
    let (top, bottom) = cmd.extent();
    match cmd {
        PaintCommand::SolidRect {
            x, width, color, ..
        } => {
            let (t, b) = (top.max(start), bottom.min(end));
            (b > t).then(|| PaintCommand::SolidRect {
                x: *x,
                y: t - start,
                width: *width,
                height: b - t,
                color: *color,
            })
        }
        PaintCommand::StrokeRect {
            x,
            width,
            color,
            line_width,
            ..
        } => {
            let (t, b) = (top.max(start), bottom.min(end));
            (b > t).then(|| PaintCommand::StrokeRect {
                x: *x,
                y: t - start,
                width: *width,
                height: b - t,
                color: *color,
                line_width: *line_width,
            })
        }
        PaintCommand::Ellipse {
            cx,
            cy,
            rx,
            ry,
            color,
        } => (*cy >= start && *cy < end).then(|| PaintCommand::Ellipse {
            cx: *cx,
            cy: cy - start,
            rx: *rx,
            ry: *ry,
            color: *color,
        }),
        PaintCommand::Text {
            x,
            top,
            height,
            baseline,
            text,
            face,
            size,
            color,
        } => (*top >= start && *top < end).then(|| PaintCommand::Text {
            x: *x,
            top: top - start,
            height: *height,
            baseline: baseline - start,
            text: text.clone(),
            face: *face,
            size: *size,
            color: *color,
        }),
    }
}

/// Paints, paginates and snaps a tree.
pub fn rasterize(tree: &PageTree, surface: &RasterSurface) -> Result<Snapshot, ExportError> {
    if !(surface.pixel_ratio.is_finite() && surface.pixel_ratio > 0.0) {
        return Err(ExportError::Rasterize(format!(
            "invalid pixel ratio {}",
            surface.pixel_ratio
        )));
    }
    if !(surface.page_height.is_finite() && surface.page_height > 0.0) {
        return Err(ExportError::Rasterize(format!(
            "invalid page height {}",
            surface.page_height
        )));
    }
    if !tree.height.is_finite() {
        return Err(ExportError::Rasterize("content height is not finite".into()));
    }

    let canvas_height = tree.height.max(surface.min_height);
    let commands = paint(tree, canvas_height);
    if let Some(bad) = commands.iter().find(|c| !c.is_finite()) {
        return Err(ExportError::Rasterize(format!(
            "non-finite geometry in {:?}",
            bad
        )));
    }

    let mut breaks = page_breaks(&commands, canvas_height, surface.page_height);
    breaks.push(canvas_height);
    let pages = breaks
        .windows(2)
        .enumerate()
        .map(|(index, w)| {
            let (start, end) = (w[0], w[1]);
            let commands = commands
                .iter()
                .filter_map(|c| clip(c, start, end))
                .map(|c| snap_command(c, surface.pixel_ratio))
                .collect();
            PageSlice {
                index,
                offset: start,
                height: end - start,
                commands,
            }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "rasterized `{}`: canvas {:.1}px into {} page(s) at {}x",
        tree.template_id,
        canvas_height,
        pages.len(),
        surface.pixel_ratio
    );

    Ok(Snapshot {
        width: surface.width,
        canvas_height,
        page_height: surface.page_height,
        pixel_ratio: surface.pixel_ratio,
        pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::Color;
    use crate::rendering::layout::Column;
    use crate::rendering::{FontFamily, PageGeometry, RenderMode, Role, TextStyle};

    fn surface() -> RasterSurface {
        RasterSurface {
            width: PageGeometry::A4.width_px(),
            min_height: 296.8 * crate::rendering::MM_TO_PX,
            page_height: PageGeometry::A4.height_px(),
            pixel_ratio: 2.0,
        }
    }

    fn tree_with_lines(n: usize) -> PageTree {
        let mut col = Column::new(40.0, 40.0, 700.0);
        let style = TextStyle::new(FontFamily::Sans, 12.0, Color::BLACK);
        for i in 0..n {
            col.text(&format!("line {}", i), style, Role::Body);
        }
        let height = col.y() + 40.0;
        PageTree::new("t", RenderMode::Export, Color::WHITE, height, col.into_nodes())
    }

    #[test]
    fn short_content_is_one_page() {
        let snap = rasterize(&tree_with_lines(3), &surface()).unwrap();
        assert_eq!(snap.page_count(), 1);
        assert_eq!(snap.device_size(), (1587, 2245));
    }

    #[test]
    fn empty_tree_is_one_page() {
        let snap = rasterize(&PageTree::blank("t", RenderMode::Export), &surface()).unwrap();
        assert_eq!(snap.page_count(), 1);
    }

    #[test]
    fn overflow_flows_onto_more_pages_without_splitting_lines() {
        let tree = tree_with_lines(120);
        let snap = rasterize(&tree, &surface()).unwrap();
        assert!(snap.page_count() >= 2);
        let printed: usize = snap
            .pages
            .iter()
            .flat_map(|p| &p.commands)
            .filter(|c| matches!(c, PaintCommand::Text { .. }))
            .count();
        assert_eq!(printed, 120);
        for page in &snap.pages {
            for cmd in &page.commands {
                if let PaintCommand::Text { top, height, .. } = cmd {
                    assert!(top + height <= page.height + 0.5);
                }
            }
        }
    }

    #[test]
    fn coordinates_snap_to_half_pixels() {
        assert_eq!(snap(10.26, 2.0), 10.5);
        assert_eq!(snap(10.24, 2.0), 10.0);
        let snap_out = rasterize(&tree_with_lines(1), &surface()).unwrap();
        for cmd in &snap_out.pages[0].commands {
            if let PaintCommand::Text { x, top, .. } = cmd {
                assert_eq!((x * 2.0).fract(), 0.0);
                assert_eq!((top * 2.0).fract(), 0.0);
            }
        }
    }

    #[test]
    fn invalid_ratio_is_an_error() {
        let mut s = surface();
        s.pixel_ratio = 0.0;
        assert!(matches!(
            rasterize(&tree_with_lines(1), &s),
            Err(ExportError::Rasterize(_))
        ));
    }
}
