//! Places captures and bezel artwork on the output canvas.

use crate::artwork::ArtworkStore;
use crate::capture::{fitted, CaptureResult};
use crate::device::{DeviceProfile, Registry, Size};
use crate::{Canvas, Error, Result};
use image::imageops;
use image::Rgba;
use log::debug;
use std::collections::HashMap;

/// Decode a profile's bezel artwork to RGBA.
fn load_artwork(store: &dyn ArtworkStore, profile: &DeviceProfile) -> Result<Canvas> {
    let unreadable = |reason: String| Error::ArtworkUnreadable {
        device: profile.id.clone(),
        reason,
    };
    let bytes = store.read(&profile.artwork).map_err(|e| unreadable(e.to_string()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| unreadable(format!("{}: {}", profile.artwork, e)))?;
    Ok(decoded.into_rgba8())
}

/// Build the finished canvas from a complete set of captures.
///
/// Devices are drawn in registry order. Each capture goes down first at
/// the profile's layout position, then its artwork at `layout -
/// bezel_offset`, so the frame covers anything outside the screen window.
/// Both layers use source-over blending. Missing captures or unreadable
/// artwork abort the whole composition.
pub fn compose(
    registry: &Registry,
    captures: &HashMap<String, CaptureResult>,
    artwork: &dyn ArtworkStore,
    canvas_size: Size,
    background: [u8; 4],
) -> Result<Canvas> {
    let mut canvas = Canvas::from_pixel(canvas_size.width, canvas_size.height, Rgba(background));

    for profile in registry {
        let capture = captures
            .get(&profile.id)
            .ok_or_else(|| Error::MissingCapture(profile.id.clone()))?;

        let screen = fitted(&capture.image, profile.screen.width, profile.screen.height);
        debug!(
            "Placing {} screen at ({}, {})",
            profile.id, profile.layout.x, profile.layout.y
        );
        imageops::overlay(
            &mut canvas,
            &*screen,
            profile.layout.x as i64,
            profile.layout.y as i64,
        );

        let frame = load_artwork(artwork, profile)?;
        let (fx, fy) = profile.artwork_origin();
        debug!(
            "Placing {} artwork ({}x{}) at ({}, {})",
            profile.id,
            frame.width(),
            frame.height(),
            fx,
            fy
        );
        imageops::overlay(&mut canvas, &frame, fx, fy);
    }

    Ok(canvas)
}
