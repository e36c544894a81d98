//! Locating a Chromium-family browser on the host.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides probing
pub const BROWSER_ENV: &str = "CHROME";

/// Candidate browser binaries for the current platform, in preference order.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if cfg!(target_os = "windows") {
        for var in ["PROGRAMFILES(X86)", "PROGRAMFILES"] {
            if let Ok(base) = std::env::var(var) {
                paths.push(Path::new(&base).join("Microsoft").join("Edge").join("Application").join("msedge.exe"));
            }
        }
        for var in ["PROGRAMFILES(X86)", "PROGRAMFILES"] {
            if let Ok(base) = std::env::var(var) {
                paths.push(Path::new(&base).join("Google").join("Chrome").join("Application").join("chrome.exe"));
            }
        }
    } else if cfg!(target_os = "macos") {
        paths.push(PathBuf::from("/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge"));
        paths.push(PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome"));
    } else {
        for p in [
            "/usr/bin/microsoft-edge",
            "/usr/bin/google-chrome",
            "/usr/bin/chromium-browser",
            "/usr/bin/chromium",
        ] {
            paths.push(PathBuf::from(p));
        }
    }

    paths
}

/// First existing path among `candidates`.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Find a usable browser: `$CHROME` first, then the platform candidates.
pub fn detect_browser_path() -> Result<PathBuf> {
    if let Ok(explicit) = std::env::var(BROWSER_ENV) {
        let p = PathBuf::from(explicit);
        if p.is_file() {
            return Ok(p);
        }
        log::warn!("{} points at {} which does not exist; probing instead", BROWSER_ENV, p.display());
    }

    first_existing(&candidate_paths()).ok_or_else(|| {
        Error::RendererUnavailable(
            "no Chromium-based browser (Chrome / Edge) found; install one or pass --browser".into(),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidates_are_absolute() {
        for p in candidate_paths() {
            assert!(p.is_absolute(), "{:?}", p);
        }
    }

    #[test]
    fn first_existing_skips_missing() {
        let dir = tempfile::tempdir().unwrap();
        let real = dir.path().join("chrome");
        std::fs::write(&real, b"").unwrap();
        let found = first_existing(&[dir.path().join("nope"), real.clone()]);
        assert_eq!(found, Some(real));
        assert_eq!(first_existing(&[dir.path().join("nope")]), None);
    }
}
