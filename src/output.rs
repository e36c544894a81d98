//! Encoding and persisting the finished canvas.

use crate::{Canvas, Error, Result};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// Default output file name
pub const DEFAULT_FILE_NAME: &str = "preview.png";

/// Encode the canvas as PNG bytes
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(canvas.as_raw(), canvas.width(), canvas.height(), ExtendedColorType::Rgba8)
        .map_err(|e| Error::EncodeFailed(e.to_string()))?;
    Ok(buf)
}

/// Encode and write the canvas to `path`.
///
/// Bytes go to a sibling temp file first and are renamed into place, so a
/// failed run never leaves a truncated preview behind.
pub fn save_png(canvas: &Canvas, path: &Path) -> Result<()> {
    let bytes = encode_png(canvas)?;
    let tmp = path.with_extension("png.part");
    std::fs::write(&tmp, &bytes)
        .map_err(|e| Error::EncodeFailed(format!("Failed to write {}: {}", tmp.display(), e)))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        Error::EncodeFailed(format!("Failed to move preview into {}: {}", path.display(), e))
    })
}

/// `preview.png` next to the running executable
pub fn default_output_path() -> Result<PathBuf> {
    let exe = std::env::current_exe()?;
    let dir = exe
        .parent()
        .ok_or_else(|| Error::Other(format!("executable {} has no parent directory", exe.display())))?;
    Ok(dir.join(DEFAULT_FILE_NAME))
}

/// Hex SHA-256 of the canvas dimensions and raw pixels.
pub fn digest(canvas: &Canvas) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canvas.width().to_be_bytes());
    hasher.update(canvas.height().to_be_bytes());
    hasher.update(canvas.as_raw());
    hex::encode(hasher.finalize())
}
