//! Chrome DevTools Protocol renderer (uses the `headless_chrome` crate)

use crate::renderer::{CaptureSettings, Renderer, ViewportSpec};
use crate::{Error, PreviewConfig, Result};
use headless_chrome::protocol::cdp::{Emulation, Page};
use headless_chrome::util::Timeout;
use headless_chrome::browser::tab::Tab;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::path::PathBuf;

/// Headless Chromium renderer.
///
/// The renderer itself only holds the launch template. Every capture starts
/// its own browser process sized to the requested viewport, so concurrent
/// captures never share cookies, caches or tabs. The process is torn down
/// when the capture returns, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct CdpRenderer {
    browser_path: PathBuf,
    headless: bool,
    sandbox: bool,
    settings: CaptureSettings,
}

impl CdpRenderer {
    pub fn new(browser_path: PathBuf, config: &PreviewConfig) -> Self {
        Self {
            browser_path,
            headless: config.headless,
            sandbox: config.sandbox,
            settings: config.capture_settings(),
        }
    }

    fn launch(&self, width: u32, height: u32) -> Result<Browser> {
        let launch_options = LaunchOptions::default_builder()
            .headless(self.headless)
            .sandbox(self.sandbox)
            .path(Some(self.browser_path.clone()))
            .window_size(Some((width, height)))
            .idle_browser_timeout(self.settings.timeout * 2)
            .build()
            .map_err(|e| Error::RendererUnavailable(format!("Failed to build launch options: {}", e)))?;

        Browser::new(launch_options)
            .map_err(|e| Error::RendererUnavailable(format!("Failed to launch browser: {}", e)))
    }

    /// Apply a preset's pixel ratio, mobile layout and touch input to `tab`.
    fn emulate(&self, tab: &Tab, viewport: &ViewportSpec) -> Result<()> {
        let Some((scale_factor, mobile)) = viewport.device_metrics() else {
            return Ok(());
        };
        let (width, height) = viewport.size();
        tab.call_method(Emulation::SetDeviceMetricsOverride {
            width,
            height,
            device_scale_factor: scale_factor,
            mobile,
            scale: None,
            screen_width: None,
            screen_height: None,
            position_x: None,
            position_y: None,
            dont_set_visible_size: None,
            screen_orientation: None,
            viewport: None,
            display_feature: None,
            device_posture: None,
        })
        .map_err(|e| Error::NavigationFailed(format!("Failed to override device metrics: {}", e)))?;

        if mobile {
            tab.call_method(Emulation::SetTouchEmulationEnabled {
                enabled: true,
                max_touch_points: None,
            })
            .map_err(|e| Error::NavigationFailed(format!("Failed to enable touch emulation: {}", e)))?;
        }
        Ok(())
    }
}

/// Classify a failed wait for the ready selector.
///
/// Only an expired wait is a timeout; a dropped connection or a rejected
/// selector is a navigation failure.
fn wait_error(err: anyhow::Error, selector: &str, timeout_ms: u64) -> Error {
    if err.downcast_ref::<Timeout>().is_some() {
        Error::Timeout(timeout_ms)
    } else {
        Error::NavigationFailed(format!("Waiting for '{}' failed: {}", selector, err))
    }
}

impl Renderer for CdpRenderer {
    fn capture(&self, viewport: &ViewportSpec, url: &str) -> Result<Vec<u8>> {
        let (width, height) = viewport.size();
        let browser = self.launch(width, height)?;

        let tab = browser
            .new_tab()
            .map_err(|e| Error::NavigationFailed(format!("Failed to create tab: {}", e)))?;
        tab.set_default_timeout(self.settings.timeout);

        self.emulate(&tab, viewport)?;
        if let Some(agent) = viewport.user_agent() {
            tab.set_user_agent(agent, None, None)
                .map_err(|e| Error::NavigationFailed(format!("Failed to set user agent: {}", e)))?;
        }

        debug!("Navigating to {} at {}x{}", url, width, height);
        tab.navigate_to(url)
            .map_err(|e| Error::NavigationFailed(format!("Navigation failed: {}", e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::NavigationFailed(format!("Wait for navigation failed: {}", e)))?;

        tab.wait_for_element(&self.settings.ready_selector).map_err(|e| {
            warn!("'{}' never appeared on {}: {}", self.settings.ready_selector, url, e);
            wait_error(
                e,
                &self.settings.ready_selector,
                self.settings.timeout.as_millis() as u64,
            )
        })?;

        // Heuristic: give late scripts and web fonts a moment to paint.
        std::thread::sleep(self.settings.settle_delay);

        let png = tab
            .capture_screenshot(Page::CaptureScreenshotFormatOption::Png, None, None, true)
            .map_err(|e| Error::NavigationFailed(format!("Screenshot failed: {}", e)))?;

        drop(tab);
        drop(browser);
        Ok(png)
    }
}
