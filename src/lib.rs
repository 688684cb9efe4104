//! RFox Résumé Engine
//!
//! Renders structured résumé data into a set of visually distinct templates,
//! for an interactive preview and for print-ready PDF export, from one shared
//! page tree.
//!
//! # Features
//!
//! - **Templates**: seven built-in layouts behind one [`Template`] contract,
//!   selected by identifier with a safe default fallback
//! - **Preview/export parity**: export strips screen chrome but never
//!   re-lays-out content; zoom is a pure transform
//! - **PDF** (default feature `pdf`): deterministic, fixed-size A4 pages
//!
//! # Example
//!
//! ```no_run
//! use rfresume::{Engine, EngineConfig, ResumeDocument};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::new(EngineConfig::default())?;
//! let doc = ResumeDocument::from_json(r#"{"personal": {"fullName": "Jane Doe"}}"#)?;
//!
//! let preview = engine.render(&doc, "premium-modern", "emerald", false);
//! println!("{:?}", preview.text_content());
//!
//! let pdf = engine.export_to_pdf(&doc, "premium-modern", "emerald").await?;
//! println!("{} page(s), {} bytes", pdf.page_count, pdf.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, ExportError, MappingError, RenderFault, Result};

pub mod mapper;
pub mod model;
pub mod palette;
pub mod registry;
pub mod rendering;
pub mod surface;
pub mod templates;

pub mod export;

#[cfg(feature = "pdf")]
pub mod pdf;

pub use export::{ExportArtifact, ExportOptions};
pub use mapper::{PersistedResume, TemplateSelection};
pub use model::ResumeDocument;
pub use palette::{Color, Palette, PaletteRef};
pub use registry::{Registry, DEFAULT_TEMPLATE};
pub use rendering::{PageTree, RenderMode};
pub use surface::{AutoFit, PreviewSurface, ScaledView, SurfaceConfig};
pub use templates::{Template, TemplateDescriptor};

use serde::{Deserialize, Serialize};

/// Configuration for the engine
///
/// The defaults match the stock preview and print settings: the Modern
/// template on the blue palette, zoom 0.3×–1.5× starting at 0.8×, and A4
/// export at a 2× pixel ratio with no margins.
///
/// # Examples
///
/// ```
/// let cfg = rfresume::EngineConfig::default();
/// assert_eq!(cfg.default_template, "premium-modern");
/// assert_eq!(cfg.export.pixel_ratio, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Template used when a caller passes a blank template id
    pub default_template: String,
    /// Palette used when a caller passes a blank palette name
    pub default_palette: String,
    /// Preview zoom and auto-fit settings
    pub surface: SurfaceConfig,
    /// PDF export settings
    pub export: ExportOptions,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_template: DEFAULT_TEMPLATE.to_string(),
            default_palette: palette::DEFAULT_PALETTE.to_string(),
            surface: SurfaceConfig::default(),
            export: ExportOptions::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config; missing keys keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::ConfigError(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        self.surface.validate()?;
        self.export
            .validate()
            .map_err(|e| Error::ConfigError(e.to_string()))?;
        if palette::lookup(&self.default_palette).is_none() {
            return Err(Error::ConfigError(format!(
                "unknown default palette `{}`",
                self.default_palette
            )));
        }
        Ok(())
    }
}

/// The configured entry point for hosts.
///
/// Holds no per-document state: every call is a pure function of its inputs
/// and the configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    registry: &'static Registry,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            registry: Registry::builtin(),
        }
    }
}

impl Engine {
    /// Create an engine over the built-in templates.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, Registry::builtin())
    }

    /// Create an engine over a host-supplied registry.
    pub fn with_registry(config: EngineConfig, registry: &'static Registry) -> Result<Self> {
        config.validate()?;
        if !registry.contains(&config.default_template) {
            return Err(Error::ConfigError(format!(
                "default template `{}` is not registered",
                config.default_template
            )));
        }
        Ok(Self { config, registry })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &'static Registry {
        self.registry
    }

    pub fn list_templates(&self) -> Vec<TemplateDescriptor> {
        self.registry.list_templates()
    }

    /// Resolve a palette; blank names use the configured default, unknown
    /// names the built-in default.
    pub fn resolve_palette(&self, palette: impl Into<PaletteRef>) -> Palette {
        match palette.into() {
            PaletteRef::Named(name) if model::is_blank(&name) => {
                palette::resolve(self.config.default_palette.as_str())
            }
            other => palette::resolve(other),
        }
    }

    fn template_id<'a>(&'a self, template_id: &'a str) -> &'a str {
        if model::is_blank(template_id) {
            &self.config.default_template
        } else {
            template_id
        }
    }

    /// Render a page tree. Never fails: unknown ids fall back to defaults and
    /// template faults are contained.
    pub fn render(
        &self,
        doc: &ResumeDocument,
        template_id: &str,
        palette: impl Into<PaletteRef>,
        mode: impl Into<RenderMode>,
    ) -> PageTree {
        let palette = self.resolve_palette(palette);
        self.registry
            .render(doc, self.template_id(template_id), &palette, mode.into())
    }

    /// Export `doc` to PDF on the blocking pool.
    pub async fn export_to_pdf(
        &self,
        doc: &ResumeDocument,
        template_id: &str,
        palette: impl Into<PaletteRef>,
    ) -> Result<ExportArtifact> {
        let palette = self.resolve_palette(palette);
        let artifact = export::export_to_pdf(
            self.registry,
            doc.clone(),
            self.template_id(template_id).to_string(),
            palette,
            self.config.export.clone(),
        )
        .await?;
        Ok(artifact)
    }

    /// Export `doc` under every listed template, in order.
    pub async fn export_many(
        &self,
        doc: &ResumeDocument,
        template_ids: &[String],
        palette: impl Into<PaletteRef>,
    ) -> Vec<Result<ExportArtifact>> {
        let palette = self.resolve_palette(palette);
        let ids: Vec<String> = template_ids
            .iter()
            .map(|id| self.template_id(id).to_string())
            .collect();
        export::export_many(self.registry, doc, &ids, &palette, &self.config.export)
            .await
            .into_iter()
            .map(|r| r.map_err(Error::from))
            .collect()
    }

    /// A preview surface at the configured default zoom.
    pub fn preview_surface(&self) -> PreviewSurface {
        PreviewSurface::new(self.config.surface.clone())
    }

    /// Attach an auto-fit listener to a container of `initial_width` px.
    pub fn auto_fit(&self, initial_width: f32) -> Result<AutoFit> {
        AutoFit::spawn(self.config.surface.clone(), initial_width)
    }
}

/// Descriptors of the built-in templates, in registry order.
pub fn list_templates() -> Vec<TemplateDescriptor> {
    Engine::default().list_templates()
}

/// Resolve a palette name (or pass a palette through); never fails.
pub fn resolve_palette(palette: impl Into<PaletteRef>) -> Palette {
    Engine::default().resolve_palette(palette)
}

/// Render with the built-in templates and default configuration.
///
/// `export_mode` accepts a `bool` (`true` for print) or a [`RenderMode`].
pub fn render(
    doc: &ResumeDocument,
    template_id: &str,
    palette: impl Into<PaletteRef>,
    export_mode: impl Into<RenderMode>,
) -> PageTree {
    Engine::default().render(doc, template_id, palette, export_mode)
}

/// Export with the built-in templates and default configuration.
pub async fn export_to_pdf(
    doc: &ResumeDocument,
    template_id: &str,
    palette: impl Into<PaletteRef>,
) -> Result<ExportArtifact> {
    Engine::default()
        .export_to_pdf(doc, template_id, palette)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.default_palette, "blue");
        assert_eq!(config.surface.default_scale, 0.8);
        config.validate().unwrap();
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"export": {"pixelRatio": 3.0}}"#);
        // Keys are snake_case; an unknown key is ignored rather than applied.
        assert_eq!(config.unwrap().export.pixel_ratio, 2.0);

        let config = EngineConfig::from_json(r#"{"export": {"pixel_ratio": 3.0}}"#).unwrap();
        assert_eq!(config.export.pixel_ratio, 3.0);
        assert_eq!(config.export.page_height_mm, 297.0);
    }

    #[test]
    fn engine_rejects_unknown_default_template() {
        let config = EngineConfig {
            default_template: "nope".into(),
            ..Default::default()
        };
        assert!(matches!(Engine::new(config), Err(Error::ConfigError(_))));
    }

    #[test]
    fn blank_ids_use_configured_defaults() {
        let engine = Engine::new(EngineConfig {
            default_template: "ats-classic".into(),
            default_palette: "red".into(),
            ..Default::default()
        })
        .unwrap();
        let tree = engine.render(&ResumeDocument::default(), "  ", "", true);
        assert_eq!(tree.template_id, "ats-classic");
        assert_eq!(engine.resolve_palette(" "), palette::resolve("red"));
        assert_eq!(engine.resolve_palette("mauve"), Palette::default());
    }
}
