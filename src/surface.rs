//! Interactive preview surface: zoom state, auto-fit and the debounced resize
//! listener.
//!
//! Scaling here is purely visual. A [`ScaledView`] pairs an unscaled
//! [`PageTree`] with a transform; nothing is ever re-laid-out for a new scale,
//! so the export pipeline can always take the tree as-is.

use crate::error::{Error, Result};
use crate::rendering::PageTree;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Zoom bounds and auto-fit tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    pub default_scale: f32,
    /// Increment used by the zoom buttons.
    pub zoom_step: f32,
    /// Upper bound for auto-fit, independent of `max_scale`.
    pub fit_max: f32,
    /// Horizontal room kept free around the page when fitting, in px.
    pub fit_padding: f32,
    /// Width the fit is computed against (A4 at 96 dpi, rounded).
    pub page_width_px: f32,
    /// Quiet period before a burst of resizes is acted on.
    pub debounce_ms: u64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.3,
            max_scale: 1.5,
            default_scale: 0.8,
            zoom_step: 0.1,
            fit_max: 1.2,
            fit_padding: 40.0,
            page_width_px: 794.0,
            debounce_ms: 100,
        }
    }
}

impl SurfaceConfig {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.min_scale,
            self.max_scale,
            self.default_scale,
            self.zoom_step,
            self.fit_max,
            self.fit_padding,
            self.page_width_px,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(Error::ConfigError("surface values must be finite".into()));
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(Error::ConfigError(format!(
                "scale bounds {}..{} are not a valid range",
                self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.default_scale) {
            return Err(Error::ConfigError(format!(
                "default scale {} lies outside {}..{}",
                self.default_scale, self.min_scale, self.max_scale
            )));
        }
        if !(self.min_scale..=self.max_scale).contains(&self.fit_max) {
            return Err(Error::ConfigError(format!(
                "fit_max {} lies outside {}..{}",
                self.fit_max, self.min_scale, self.max_scale
            )));
        }
        if self.zoom_step <= 0.0 {
            return Err(Error::ConfigError("zoom_step must be positive".into()));
        }
        if self.fit_padding < 0.0 || self.page_width_px <= 0.0 {
            return Err(Error::ConfigError(
                "fit_padding must be >= 0 and page_width_px > 0".into(),
            ));
        }
        Ok(())
    }

    pub fn clamp(&self, scale: f32) -> f32 {
        if scale.is_nan() {
            return self.default_scale;
        }
        // Unvalidated configs may have min > max, where `f32::clamp` panics.
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Scale that fits the page into `available_width`.
    pub fn fit(&self, available_width: f32) -> f32 {
        if !available_width.is_finite() {
            return self.default_scale;
        }
        let raw = (available_width - self.fit_padding) / self.page_width_px;
        raw.max(self.min_scale).min(self.fit_max)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Round away float drift from repeated stepping.
fn tidy(scale: f32) -> f32 {
    (scale * 1000.0).round() / 1000.0
}

/// Zoom state of one preview pane.
#[derive(Debug, Clone)]
pub struct PreviewSurface {
    config: SurfaceConfig,
    scale: f32,
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self::new(SurfaceConfig::default())
    }
}

impl PreviewSurface {
    pub fn new(config: SurfaceConfig) -> Self {
        let scale = config.clamp(config.default_scale);
        Self { config, scale }
    }

    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set an explicit scale, clamped to the bounds. Returns the applied value.
    pub fn set_scale(&mut self, scale: f32) -> f32 {
        self.scale = tidy(self.config.clamp(scale));
        self.scale
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.set_scale(self.scale + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.set_scale(self.scale - self.config.zoom_step)
    }

    pub fn reset(&mut self) -> f32 {
        self.set_scale(self.config.default_scale)
    }

    /// Apply the auto-fit scale for `available_width`.
    pub fn auto_fit(&mut self, available_width: f32) -> f32 {
        self.scale = self.config.fit(available_width);
        self.scale
    }

    /// Present `tree` at the current scale.
    pub fn view<'a>(&self, tree: &'a PageTree) -> ScaledView<'a> {
        ScaledView::new(tree, self.scale)
    }
}

/// Where the scale transform is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    TopCenter,
}

/// An unscaled tree plus the visual transform applied on screen.
#[derive(Debug, Clone, Copy)]
pub struct ScaledView<'a> {
    tree: &'a PageTree,
    pub scale: f32,
    pub origin: Origin,
}

impl<'a> ScaledView<'a> {
    pub fn new(tree: &'a PageTree, scale: f32) -> Self {
        Self {
            tree,
            scale,
            origin: Origin::TopCenter,
        }
    }

    /// The tree exactly as rendered; what export consumes.
    pub fn unscaled(&self) -> &'a PageTree {
        self.tree
    }

    /// On-screen size of the page box.
    pub fn page_size(&self) -> (f32, f32) {
        (
            self.tree.page.width_px() * self.scale,
            self.tree.frame_height() * self.scale,
        )
    }

    /// On-screen size including the frame margin.
    pub fn framed_size(&self) -> (f32, f32) {
        let margin = 2.0 * self.tree.chrome.frame_margin;
        let (w, h) = self.page_size();
        (w + margin * self.scale, h + margin * self.scale)
    }

    /// Maps a point in page coordinates to the scaled frame, anchored at the
    /// top center of the page.
    pub fn to_screen(&self, x: f32, y: f32) -> (f32, f32) {
        let center = self.tree.page.width_px() / 2.0;
        (center + (x - center) * self.scale, y * self.scale)
    }
}

/// Reset-on-every-event, fire-once-after-quiet coalescer.
///
/// Clock-driven and free of timers so it can be stepped in tests; the async
/// listener drives it with tokio time.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
        }
    }

    /// Record an event, replacing any pending value and restarting the timer.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    /// When the pending value becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, at)| *at)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, at)) if *at <= now => self.pending.take().map(|(v, _)| v),
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

/// Background resize listener publishing fitted scales.
///
/// Fits once on attach, again after the settle delay, then once per burst of
/// resizes. Dropping it aborts the listener task.
#[derive(Debug)]
pub struct AutoFit {
    widths: mpsc::UnboundedSender<f32>,
    scales: watch::Receiver<f32>,
    task: JoinHandle<()>,
}

impl AutoFit {
    /// Attach to a container of `initial_width`. Must be called from within a
    /// tokio runtime.
    pub fn spawn(config: SurfaceConfig, initial_width: f32) -> Result<Self> {
        let handle = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::Other(format!("auto-fit needs a tokio runtime: {}", e)))?;

        let (widths, mut width_rx) = mpsc::unbounded_channel::<f32>();
        let (scale_tx, scales) = watch::channel(config.fit(initial_width));

        let task = handle.spawn(async move {
            let mut debouncer = Debouncer::new(config.debounce());
            // Late layout can change the width right after attach.
            debouncer.push(initial_width, Instant::now());

            loop {
                let deadline = debouncer.deadline();
                tokio::select! {
                    msg = width_rx.recv() => match msg {
                        Some(width) => debouncer.push(width, Instant::now()),
                        None => break,
                    },
                    _ = sleep_until(deadline), if deadline.is_some() => {
                        if let Some(width) = debouncer.poll(Instant::now()) {
                            let scale = config.fit(width);
                            log::debug!("auto-fit: width {} -> scale {}", width, scale);
                            if scale_tx.send(scale).is_err() {
                                break;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            widths,
            scales,
            task,
        })
    }

    /// Report a new container width.
    pub fn resize(&self, width: f32) {
        // A closed channel means the task is gone; nothing left to notify.
        let _ = self.widths.send(width);
    }

    /// The most recently published scale.
    pub fn scale(&self) -> f32 {
        *self.scales.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.scales.clone()
    }
}

impl Drop for AutoFit {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::RenderMode;

    #[test]
    fn zoom_steps_and_clamps() {
        let mut surface = PreviewSurface::default();
        assert_eq!(surface.scale(), 0.8);
        assert_eq!(surface.zoom_in(), 0.9);
        for _ in 0..20 {
            surface.zoom_in();
        }
        assert_eq!(surface.scale(), 1.5);
        for _ in 0..20 {
            surface.zoom_out();
        }
        assert_eq!(surface.scale(), 0.3);
        assert_eq!(surface.set_scale(7.0), 1.5);
        assert_eq!(surface.reset(), 0.8);
    }

    #[test]
    fn fit_formula_and_bounds() {
        let cfg = SurfaceConfig::default();
        assert!((cfg.fit(834.0) - 1.0).abs() < 1e-6);
        assert!((cfg.fit(437.0) - 0.5).abs() < 1e-6);
        assert_eq!(cfg.fit(100.0), 0.3);
        assert_eq!(cfg.fit(5000.0), 1.2);
        assert_eq!(cfg.fit(f32::NAN), 0.8);
    }

    #[test]
    fn inverted_bounds_do_not_panic() {
        let cfg = SurfaceConfig {
            min_scale: 1.0,
            max_scale: 0.5,
            fit_max: 0.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let mut surface = PreviewSurface::new(cfg);
        assert_eq!(surface.auto_fit(800.0), 0.5);
        assert_eq!(surface.set_scale(2.0), 0.5);
        assert_eq!(surface.zoom_out(), 0.5);
    }

    #[test]
    fn validate_rejects_bad_bounds() {
        assert!(SurfaceConfig::default().validate().is_ok());
        let cfg = SurfaceConfig {
            fit_max: 2.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = SurfaceConfig {
            min_scale: 2.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn scaled_view_does_not_touch_tree() {
        let tree = PageTree::blank("t", RenderMode::Interactive);
        let before = tree.fingerprint();
        let view = ScaledView::new(&tree, 0.5);
        let (w, h) = view.page_size();
        assert!((w - tree.page.width_px() * 0.5).abs() < 1e-3);
        assert!((h - tree.page.height_px() * 0.5).abs() < 1e-3);
        let (fw, _) = view.framed_size();
        assert!((fw - w - 16.0).abs() < 1e-3);
        assert_eq!(view.unscaled().fingerprint(), before);
    }

    #[test]
    fn top_center_stays_fixed() {
        let tree = PageTree::blank("t", RenderMode::Export);
        let view = ScaledView::new(&tree, 0.5);
        let center = tree.page.width_px() / 2.0;
        let (x, y) = view.to_screen(center, 0.0);
        assert!((x - center).abs() < 1e-3);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn debouncer_fires_once_after_quiet() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.push(1, start);
        d.push(2, start + Duration::from_millis(60));
        assert_eq!(d.poll(start + Duration::from_millis(120)), None);
        assert_eq!(d.poll(start + Duration::from_millis(160)), Some(2));
        assert_eq!(d.poll(start + Duration::from_millis(500)), None);
        assert!(!d.is_pending());
    }

    #[test]
    fn auto_fit_outside_runtime_is_an_error() {
        assert!(AutoFit::spawn(SurfaceConfig::default(), 800.0).is_err());
    }
}
