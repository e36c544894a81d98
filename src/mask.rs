//! Rounded-corner masking for device screens.
//!
//! Each corner owns an R x R zone. Inside a zone a pixel is cut when its
//! squared distance to the corner's circle centre exceeds R². Left centres
//! sit at x = R and right centres at x = W-1-R (same for y), which keeps the
//! cut mirror-symmetric. The test is exact and integer-only, so edges alias.

use image::{Rgba, RgbaImage};
use log::warn;

const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Whether pixel (x, y) of a `width` x `height` buffer lies outside the
/// rounded rectangle of `radius`.
pub fn is_masked(x: u32, y: u32, width: u32, height: u32, radius: u32) -> bool {
    if radius == 0 || x >= width || y >= height {
        return false;
    }

    let r = radius as i64;
    let (x, y) = (x as i64, y as i64);
    let (w, h) = (width as i64, height as i64);

    let cx = if x < r {
        r
    } else if x >= w - r {
        w - 1 - r
    } else {
        return false;
    };
    let cy = if y < r {
        r
    } else if y >= h - r {
        h - 1 - r
    } else {
        return false;
    };

    let (dx, dy) = (x - cx, y - cy);
    dx * dx + dy * dy > r * r
}

/// Clear every pixel outside the rounded rectangle to transparent black.
///
/// Radii above half the short side are clamped. A radius of zero leaves the
/// buffer untouched.
pub fn apply_corner_mask(img: &mut RgbaImage, radius: u32) {
    let (width, height) = img.dimensions();
    let max = width.min(height) / 2;
    let radius = if radius > max {
        warn!(
            "Corner radius {} too large for {}x{} buffer; clamping to {}",
            radius, width, height, max
        );
        max
    } else {
        radius
    };
    if radius == 0 {
        return;
    }

    // Only the four corner zones can contain masked pixels.
    let xs = [0..radius, width - radius..width];
    let ys = [0..radius, height - radius..height];
    for yr in &ys {
        for y in yr.clone() {
            for xr in &xs {
                for x in xr.clone() {
                    if is_masked(x, y, width, height, radius) {
                        img.put_pixel(x, y, CLEAR);
                    }
                }
            }
        }
    }
}
