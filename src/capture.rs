//! Per-device capture jobs and the orchestrator that fans them out.

use crate::device::{DeviceProfile, Registry};
use crate::mask::apply_corner_mask;
use crate::renderer::Renderer;
use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use log::{error, info, warn};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;

/// One device's finished screen capture
#[derive(Debug, Clone)]
pub struct CaptureResult {
    pub device: String,
    /// Screen-sized RGBA buffer, opaque except for masked corners
    pub image: RgbaImage,
}

/// Check that `url` is something the renderer can navigate to.
pub fn validate_url(url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(Error::InvalidUrl(url.to_string()));
    }
    url::Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(())
}

/// Decode encoded bytes into a fully opaque RGBA buffer.
pub fn decode_opaque(bytes: &[u8]) -> Result<RgbaImage> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| Error::DecodeFailed(e.to_string()))?;
    let mut rgba = decoded.into_rgba8();
    for px in rgba.pixels_mut() {
        px[3] = 255;
    }
    Ok(rgba)
}

/// Resample `img` to exactly `width` x `height` with Lanczos3.
///
/// Buffers that already have the requested size are returned unchanged.
pub fn fit_to(img: RgbaImage, width: u32, height: u32) -> RgbaImage {
    if img.dimensions() == (width, height) {
        return img;
    }
    imageops::resize(&img, width, height, FilterType::Lanczos3)
}

/// Borrowing form of [`fit_to`]: only allocates when a resample is needed.
pub fn fitted(img: &RgbaImage, width: u32, height: u32) -> Cow<'_, RgbaImage> {
    if img.dimensions() == (width, height) {
        Cow::Borrowed(img)
    } else {
        Cow::Owned(imageops::resize(img, width, height, FilterType::Lanczos3))
    }
}

fn run_job(renderer: &dyn Renderer, profile: &DeviceProfile, url: &str) -> Result<RgbaImage> {
    if profile.screen.width == 0 || profile.screen.height == 0 {
        return Err(Error::InvalidRegistry(format!(
            "device '{}' has an empty screen",
            profile.id
        )));
    }
    let viewport = profile.viewport_spec()?;
    let bytes = renderer.capture(&viewport, url)?;
    let decoded = decode_opaque(&bytes)?;

    // Renderers may hand back device-pixel-ratio sized shots; normalise to
    // the screen first so the radius is in screen pixels.
    let mut image = fit_to(decoded, profile.screen.width, profile.screen.height);
    if profile.corner_radius > 0 {
        apply_corner_mask(&mut image, profile.corner_radius);
    }
    Ok(image)
}

/// Capture one device: render, decode, normalise and mask.
///
/// Any failure is reported as [`Error::CaptureFailed`] for this device.
pub fn capture_device(
    renderer: &dyn Renderer,
    profile: &DeviceProfile,
    url: &str,
) -> Result<CaptureResult> {
    validate_url(url).map_err(|e| Error::capture_failed(&profile.id, e))?;
    let image = run_job(renderer, profile, url).map_err(|e| Error::capture_failed(&profile.id, e))?;
    Ok(CaptureResult {
        device: profile.id.clone(),
        image,
    })
}

/// Capture every device in `registry` concurrently.
///
/// One thread runs per device. All of them are joined before this returns,
/// even when some fail; a failure never cancels its siblings. If any job
/// failed, the first failure in registry order is returned and no mapping
/// is produced.
pub fn capture_all(
    renderer: &dyn Renderer,
    registry: &Registry,
    url: &str,
) -> Result<HashMap<String, CaptureResult>> {
    validate_url(url)?;

    let results: Mutex<HashMap<String, CaptureResult>> =
        Mutex::new(HashMap::with_capacity(registry.len()));
    let failures: Mutex<Vec<Error>> = Mutex::new(Vec::new());

    thread::scope(|scope| {
        for profile in registry {
            let results = &results;
            let failures = &failures;
            scope.spawn(move || match capture_device(renderer, profile, url) {
                Ok(capture) => {
                    info!("Captured {} ({}x{})", profile.id, capture.image.width(), capture.image.height());
                    results
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .insert(profile.id.clone(), capture);
                }
                Err(err) => {
                    error!("{}", err);
                    failures
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .push(err);
                }
            });
        }
    });

    let mut failures = failures
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if !failures.is_empty() {
        if failures.len() > 1 {
            warn!("{} of {} device captures failed", failures.len(), registry.len());
        }
        let position = |e: &Error| {
            e.device()
                .and_then(|d| registry.iter().position(|p| p.id == d))
                .unwrap_or(usize::MAX)
        };
        failures.sort_by_key(position);
        return Err(failures.swap_remove(0));
    }

    Ok(results
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner()))
}
