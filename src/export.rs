//! Export pipeline: render for print, mount on an offscreen target,
//! rasterize at a fixed pixel ratio and encode the pages as PDF.
//!
//! Each export owns its target from allocation to release and never touches a
//! preview surface. The CPU-bound part runs on tokio's blocking pool, so
//! concurrent exports proceed independently.

use crate::error::ExportError;
use crate::model::ResumeDocument;
use crate::palette::Palette;
use crate::registry::Registry;
use crate::rendering::raster::{rasterize, RasterSurface, Snapshot};
use crate::rendering::{PageTree, RenderMode, MM_TO_PX};
use base64::Engine as _;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

/// Page and capture settings for PDF export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Offscreen container size. Slightly shorter than the page so rounding
    /// never spills onto an empty second page.
    pub container_width_mm: f32,
    pub container_height_mm: f32,
    /// Device pixels per CSS pixel during rasterization.
    pub pixel_ratio: f32,
    pub margin_mm: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            container_width_mm: 210.0,
            container_height_mm: 296.8,
            pixel_ratio: 2.0,
            margin_mm: 0.0,
        }
    }
}

impl ExportOptions {
    pub fn validate(&self) -> Result<(), ExportError> {
        let sizes = [
            self.page_width_mm,
            self.page_height_mm,
            self.container_width_mm,
            self.container_height_mm,
        ];
        if sizes.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ExportError::Rasterize(
                "page and container sizes must be positive".into(),
            ));
        }
        if self.container_width_mm > self.page_width_mm
            || self.container_height_mm > self.page_height_mm
        {
            return Err(ExportError::Rasterize(
                "offscreen container is larger than the page".into(),
            ));
        }
        if !(1.0..=4.0).contains(&self.pixel_ratio) {
            return Err(ExportError::Rasterize(format!(
                "pixel ratio {} outside 1..=4",
                self.pixel_ratio
            )));
        }
        // Templates lay out on the full A4 width and own their margins.
        if self.margin_mm != 0.0 {
            return Err(ExportError::Rasterize(format!(
                "page margin must be 0mm, got {}mm",
                self.margin_mm
            )));
        }
        Ok(())
    }

    /// Printable height of one page, in CSS px.
    pub fn slice_height_px(&self) -> f32 {
        (self.page_height_mm - 2.0 * self.margin_mm) * MM_TO_PX
    }

    pub fn surface(&self) -> RasterSurface {
        RasterSurface {
            width: self.container_width_mm * MM_TO_PX,
            min_height: self.container_height_mm * MM_TO_PX,
            page_height: self.slice_height_px(),
            pixel_ratio: self.pixel_ratio,
        }
    }

    #[cfg(feature = "pdf")]
    pub fn pdf_page(&self) -> crate::pdf::PdfPage {
        crate::pdf::PdfPage::from_mm(self.page_width_mm, self.page_height_mm)
            .with_margin_mm(self.margin_mm)
    }
}

/// A scoped offscreen render target.
///
/// Lifecycle: [`allocate`](Self::allocate), [`mount`](Self::mount),
/// [`rasterize`](Self::rasterize), then drop to release.
#[derive(Debug)]
pub struct OffscreenTarget {
    surface: RasterSurface,
    mounted: Option<PageTree>,
}

impl OffscreenTarget {
    pub fn allocate(options: &ExportOptions) -> Self {
        let surface = options.surface();
        log::trace!(
            "allocated offscreen target {:.1}x{:.1}px",
            surface.width,
            surface.min_height
        );
        Self {
            surface,
            mounted: None,
        }
    }

    /// Mount a tree, replacing anything mounted before. Interactive trees are
    /// accepted but their chrome never reaches the output.
    pub fn mount(&mut self, tree: PageTree) {
        if !tree.mode.is_export() {
            log::warn!("mounting interactive render of `{}` for export", tree.template_id);
        }
        self.mounted = Some(tree);
    }

    pub fn mounted(&self) -> Option<&PageTree> {
        self.mounted.as_ref()
    }

    pub fn rasterize(&self) -> Result<Snapshot, ExportError> {
        let tree = self.mounted.as_ref().ok_or(ExportError::TargetNotMounted)?;
        rasterize(tree, &self.surface)
    }
}

impl Drop for OffscreenTarget {
    fn drop(&mut self) {
        log::trace!(
            "released offscreen target ({})",
            self.mounted
                .as_ref()
                .map(|t| t.template_id.as_str())
                .unwrap_or("empty")
        );
    }
}

/// The finished export binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub template_id: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ExportArtifact {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 of the PDF, as handed to email delivery.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

fn encode(snapshot: &Snapshot, options: &ExportOptions) -> Result<Vec<u8>, ExportError> {
    #[cfg(feature = "pdf")]
    {
        crate::pdf::write_pdf(snapshot, options.pdf_page())
    }
    #[cfg(not(feature = "pdf"))]
    {
        let _ = (snapshot, options);
        Err(ExportError::Unsupported)
    }
}

/// Synchronous export; the body of [`export_to_pdf`].
pub fn export_blocking(
    registry: &Registry,
    doc: &ResumeDocument,
    template_id: &str,
    palette: &Palette,
    options: &ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    options.validate()?;

    let tree = registry.render(doc, template_id, palette, RenderMode::Export);
    let template_id = tree.template_id.clone();

    let mut target = OffscreenTarget::allocate(options);
    target.mount(tree);
    let snapshot = target.rasterize()?;
    drop(target);

    let bytes = encode(&snapshot, options)?;
    log::debug!(
        "exported `{}`: {} page(s), {} bytes",
        template_id,
        snapshot.page_count(),
        bytes.len()
    );
    Ok(ExportArtifact {
        template_id,
        bytes,
        page_count: snapshot.page_count(),
    })
}

/// Render `doc` with `template_id` for print and encode it as PDF.
///
/// Unknown template ids fall back to the default template. Fails as a whole:
/// an error means no artifact was produced.
pub async fn export_to_pdf(
    registry: &'static Registry,
    doc: ResumeDocument,
    template_id: String,
    palette: Palette,
    options: ExportOptions,
) -> Result<ExportArtifact, ExportError> {
    tokio::task::spawn_blocking(move || {
        export_blocking(registry, &doc, &template_id, &palette, &options)
    })
    .await
    .map_err(|e| ExportError::Worker(e.to_string()))?
}

/// Export one document under several templates concurrently.
///
/// At most `num_cpus` exports run at once; results come back in the order of
/// `template_ids`.
pub async fn export_many(
    registry: &'static Registry,
    doc: &ResumeDocument,
    template_ids: &[String],
    palette: &Palette,
    options: &ExportOptions,
) -> Vec<Result<ExportArtifact, ExportError>> {
    let limit = num_cpus::get().max(1);
    stream::iter(template_ids.iter().cloned())
        .map(|id| export_to_pdf(registry, doc.clone(), id, *palette, options.clone()))
        .buffered(limit)
        .collect()
        .await
}
