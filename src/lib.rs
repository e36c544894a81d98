//! devframe
//!
//! Renders one composite "preview" image of a web page as it looks on a
//! laptop, a tablet and a phone. Each device's screen is captured at its own
//! viewport, clipped to the device's corner radius, placed on a shared
//! canvas and framed by bezel artwork.
//!
//! # Pipeline
//!
//! - **Capture**: one job per [`DeviceProfile`], run concurrently against a
//!   [`Renderer`]; see [`capture::capture_all`]
//! - **Mask**: rounded screens get their corners cleared; see [`mask`]
//! - **Compose**: captures and artwork are drawn in registry order; see
//!   [`compositor::compose`]
//!
//! # Example
//!
//! ```no_run
//! use devframe::{DirArtworkStore, PreviewConfig, Registry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PreviewConfig::default();
//! let renderer = devframe::new_renderer(&config)?;
//! let artwork = DirArtworkStore::new("assets");
//!
//! let canvas = devframe::composite(
//!     "http://localhost:8080/",
//!     &Registry::builtin(),
//!     &renderer,
//!     &artwork,
//!     &config,
//! )?;
//! devframe::output::save_png(&canvas, std::path::Path::new("preview.png"))?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod artwork;
pub mod capture;
pub mod compositor;
pub mod device;
pub mod mask;
pub mod output;
pub mod probe;
pub mod renderer;

// Headless Chromium renderer over the DevTools protocol
#[cfg(feature = "cdp")]
pub mod cdp;

// Async-friendly facade (worker-thread backed)
pub mod async_api;

pub use artwork::{ArtworkStore, DirArtworkStore, MemoryArtworkStore};
pub use capture::CaptureResult;
pub use device::{DevicePreset, DeviceProfile, EmulationMode, Point, Registry, Size};
pub use renderer::{CaptureSettings, Renderer, ViewportSpec};

#[cfg(feature = "cdp")]
pub use cdp::CdpRenderer;

use std::path::PathBuf;
use std::time::Duration;

/// The output raster
pub type Canvas = image::RgbaImage;

/// Configuration for a preview run
///
/// Defaults reproduce the stock preview: a 2560x1600 opaque white canvas,
/// a 3 second settle delay and a 30 second renderer timeout.
///
/// # Examples
///
/// ```
/// let cfg = devframe::PreviewConfig::default();
/// assert_eq!((cfg.canvas.width, cfg.canvas.height), (2560, 1600));
/// ```
#[derive(Debug, Clone)]
pub struct PreviewConfig {
    /// Output canvas size
    pub canvas: Size,
    /// Canvas fill before anything is drawn
    pub background: [u8; 4],
    /// Fixed wait after the ready selector appears, in milliseconds
    pub settle_delay_ms: u64,
    /// Renderer timeout in milliseconds
    pub timeout_ms: u64,
    /// Selector that marks the page content as visible
    pub ready_selector: String,
    /// Explicit browser binary; probed when `None`
    pub browser_path: Option<PathBuf>,
    /// Run the browser headless
    pub headless: bool,
    /// Keep the browser's sandbox enabled
    pub sandbox: bool,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            canvas: Size { width: 2560, height: 1600 },
            background: [255, 255, 255, 255],
            settle_delay_ms: 3000,
            timeout_ms: 30000,
            ready_selector: "body".to_string(),
            browser_path: None,
            headless: true,
            sandbox: true,
        }
    }
}

impl PreviewConfig {
    /// Renderer wait settings derived from this config
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            ready_selector: self.ready_selector.clone(),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    /// Check values that would make every run fail
    pub fn validate(&self) -> Result<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(Error::ConfigError(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if self.ready_selector.trim().is_empty() {
            return Err(Error::ConfigError("ready selector must not be empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(Error::ConfigError("timeout must be positive".into()));
        }
        Ok(())
    }
}

/// Capture `url` on every device in `registry` and composite the results.
///
/// The run either produces a complete canvas or an error; a single failing
/// device or unreadable frame aborts it.
pub fn composite(
    url: &str,
    registry: &Registry,
    renderer: &dyn Renderer,
    artwork: &dyn ArtworkStore,
    config: &PreviewConfig,
) -> Result<Canvas> {
    config.validate()?;
    registry.validate(config.canvas)?;
    capture::validate_url(url)?;

    let captures = capture::capture_all(renderer, registry, url)?;
    log::info!("Compositing {} devices", captures.len());
    compositor::compose(registry, &captures, artwork, config.canvas, config.background)
}

/// Create the default renderer for this build.
///
/// With the `cdp` feature this is a [`CdpRenderer`] using the configured or
/// probed browser binary.
#[cfg(feature = "cdp")]
pub fn new_renderer(config: &PreviewConfig) -> Result<impl Renderer> {
    let path = match &config.browser_path {
        Some(p) => p.clone(),
        None => probe::detect_browser_path()?,
    };
    log::info!("Using browser: {}", path.display());
    Ok(cdp::CdpRenderer::new(path, config))
}

#[cfg(not(feature = "cdp"))]
pub fn new_renderer(_config: &PreviewConfig) -> Result<impl Renderer> {
    Err::<NoRenderer, _>(Error::RendererUnavailable(
        "built without a rendering backend (enable the `cdp` feature)".into(),
    ))
}

#[cfg(not(feature = "cdp"))]
struct NoRenderer;

#[cfg(not(feature = "cdp"))]
impl Renderer for NoRenderer {
    fn capture(&self, _viewport: &ViewportSpec, _url: &str) -> Result<Vec<u8>> {
        Err(Error::RendererUnavailable("no rendering backend".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreviewConfig::default();
        assert_eq!(config.canvas.width, 2560);
        assert_eq!(config.canvas.height, 1600);
        assert_eq!(config.background, [255, 255, 255, 255]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_capture_settings_follow_config() {
        let config = PreviewConfig {
            settle_delay_ms: 250,
            ready_selector: "#app".into(),
            ..Default::default()
        };
        let s = config.capture_settings();
        assert_eq!(s.settle_delay, Duration::from_millis(250));
        assert_eq!(s.ready_selector, "#app");
    }

    #[test]
    fn test_empty_canvas_rejected() {
        let config = PreviewConfig {
            canvas: Size { width: 0, height: 10 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }
}
