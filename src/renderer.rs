//! The renderer seam: turns a URL plus a viewport into encoded image bytes.

use crate::device::DevicePreset;
use crate::Result;
use std::time::Duration;

/// Viewport the renderer is asked to capture at
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportSpec {
    /// Explicit CSS viewport size
    Explicit { width: u32, height: u32 },
    /// Named device emulation preset
    Preset(&'static DevicePreset),
}

impl ViewportSpec {
    /// CSS viewport size requested from the renderer
    pub fn size(&self) -> (u32, u32) {
        match self {
            ViewportSpec::Explicit { width, height } => (*width, *height),
            ViewportSpec::Preset(p) => (p.width, p.height),
        }
    }

    /// Device pixel ratio and mobile flag for emulated devices
    pub fn device_metrics(&self) -> Option<(f64, bool)> {
        match self {
            ViewportSpec::Explicit { .. } => None,
            ViewportSpec::Preset(p) => Some((p.scale_factor, p.mobile)),
        }
    }

    /// User agent override for emulated devices
    pub fn user_agent(&self) -> Option<&'static str> {
        match self {
            ViewportSpec::Explicit { .. } => None,
            ViewportSpec::Preset(p) => Some(p.user_agent),
        }
    }
}

/// How long a renderer waits around a capture
///
/// The settle delay is a fixed heuristic wait after the page's ready
/// selector appears. It does not guarantee asynchronous content has painted,
/// and it is wasted on pages that were already done.
#[derive(Debug, Clone)]
pub struct CaptureSettings {
    /// Selector whose presence marks the content root as visible
    pub ready_selector: String,
    /// Fixed wait before the snapshot
    pub settle_delay: Duration,
    /// Upper bound for navigation and the ready-selector wait
    pub timeout: Duration,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            ready_selector: "body".to_string(),
            settle_delay: Duration::from_millis(3000),
            timeout: Duration::from_millis(30000),
        }
    }
}

/// A source of page renderings.
///
/// Implementations must be shareable across the orchestrator's worker
/// threads, and every call must use its own rendering session: nothing
/// mutable is shared between two concurrent captures.
///
/// Failures should be reported as [`Error::Timeout`](crate::Error::Timeout),
/// [`Error::NavigationFailed`](crate::Error::NavigationFailed) or
/// [`Error::DecodeFailed`](crate::Error::DecodeFailed).
pub trait Renderer: Send + Sync {
    /// Render `url` at `viewport` and return the encoded image bytes.
    fn capture(&self, viewport: &ViewportSpec, url: &str) -> Result<Vec<u8>>;
}

impl<R: Renderer + ?Sized> Renderer for std::sync::Arc<R> {
    fn capture(&self, viewport: &ViewportSpec, url: &str) -> Result<Vec<u8>> {
        (**self).capture(viewport, url)
    }
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn capture(&self, viewport: &ViewportSpec, url: &str) -> Result<Vec<u8>> {
        (**self).capture(viewport, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_viewport_reports_size_metrics_and_agent() {
        let preset = DevicePreset::named("iphone-12-pro").unwrap();
        let viewport = ViewportSpec::Preset(preset);
        assert_eq!(viewport.size(), (390, 844));
        assert_eq!(viewport.device_metrics(), Some((3.0, true)));
        assert!(viewport.user_agent().unwrap().contains("iPhone"));
    }

    #[test]
    fn explicit_viewport_has_no_overrides() {
        let viewport = ViewportSpec::Explicit { width: 800, height: 600 };
        assert_eq!(viewport.size(), (800, 600));
        assert!(viewport.device_metrics().is_none());
        assert!(viewport.user_agent().is_none());
    }

    #[test]
    fn default_settings_wait_for_body() {
        let s = CaptureSettings::default();
        assert_eq!(s.ready_selector, "body");
        assert_eq!(s.settle_delay, Duration::from_secs(3));
    }
}
