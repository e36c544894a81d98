//! Device profiles and the ordered registry the pipeline iterates.
//!
//! A [`Registry`] is plain data: the built-in table mirrors the laptop,
//! tablet and phone frames the tool ships with, and a JSON file with the
//! same shape can replace it at startup. Registry order is also the drawing
//! order, so later devices sit on top of earlier ones when their frames
//! overlap on the canvas.

use crate::renderer::ViewportSpec;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

/// A pixel position; may be negative for artwork hanging off the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// How the renderer should emulate the device when capturing
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmulationMode {
    /// Render at exactly the profile's screen size
    #[default]
    Viewport,
    /// Render using a named device preset (see [`DevicePreset::named`])
    Preset(String),
}

/// A named device emulation preset: CSS viewport, device metrics and
/// mobile user agent
#[derive(Debug, Clone, PartialEq)]
pub struct DevicePreset {
    pub name: &'static str,
    pub width: u32,
    pub height: u32,
    /// Device pixel ratio; captures come back `width * scale_factor` wide
    pub scale_factor: f64,
    /// Mobile layout: honour `<meta name="viewport">` and emulate touch
    pub mobile: bool,
    pub user_agent: &'static str,
}

const PRESETS: &[DevicePreset] = &[
    DevicePreset {
        name: "ipad-pro",
        width: 1024,
        height: 1366,
        scale_factor: 2.0,
        mobile: true,
        user_agent: "Mozilla/5.0 (iPad; CPU OS 11_0 like Mac OS X) AppleWebKit/604.1.34 (KHTML, like Gecko) Version/11.0 Mobile/15A5341f Safari/604.1",
    },
    DevicePreset {
        name: "iphone-12-pro",
        width: 390,
        height: 844,
        scale_factor: 3.0,
        mobile: true,
        user_agent: "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1",
    },
];

impl DevicePreset {
    /// Look up a preset by name
    pub fn named(name: &str) -> Option<&'static DevicePreset> {
        PRESETS.iter().find(|p| p.name == name)
    }

    /// All known presets
    pub fn all() -> &'static [DevicePreset] {
        PRESETS
    }
}

/// Everything the pipeline needs to know about one supported device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Unique device name; key of the capture mapping
    pub id: String,
    /// Screen size; the viewport requested from the renderer
    pub screen: Size,
    /// Top-left of the screen inside the bezel artwork
    pub bezel_offset: Point,
    /// Where the screen's top-left lands on the canvas
    pub layout: Point,
    /// Artwork reference resolved by an [`ArtworkStore`](crate::artwork::ArtworkStore)
    pub artwork: String,
    /// Screen corner radius; 0 means square corners
    #[serde(default)]
    pub corner_radius: u32,
    #[serde(default)]
    pub emulation: EmulationMode,
}

impl DeviceProfile {
    /// The viewport the renderer should use for this device.
    pub fn viewport_spec(&self) -> Result<ViewportSpec> {
        match &self.emulation {
            EmulationMode::Viewport => Ok(ViewportSpec::Explicit {
                width: self.screen.width,
                height: self.screen.height,
            }),
            EmulationMode::Preset(name) => DevicePreset::named(name)
                .map(ViewportSpec::Preset)
                .ok_or_else(|| {
                    let known: Vec<&str> = DevicePreset::all().iter().map(|p| p.name).collect();
                    Error::InvalidRegistry(format!(
                        "device '{}' uses unknown emulation preset '{}' (known: {})",
                        self.id,
                        name,
                        known.join(", ")
                    ))
                }),
        }
    }

    /// Canvas position of the bezel artwork's top-left corner.
    pub fn artwork_origin(&self) -> (i64, i64) {
        (
            self.layout.x as i64 - self.bezel_offset.x as i64,
            self.layout.y as i64 - self.bezel_offset.y as i64,
        )
    }
}

/// Ordered set of device profiles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registry {
    pub devices: Vec<DeviceProfile>,
}

impl Registry {
    pub fn new(devices: Vec<DeviceProfile>) -> Self {
        Self { devices }
    }

    /// The laptop, tablet and phone frames shipped with the tool, laid out
    /// for a 2560x1600 canvas.
    pub fn builtin() -> Self {
        Self::new(vec![
            DeviceProfile {
                id: "MacBook 16 Pro".to_string(),
                screen: Size { width: 1478, height: 955 },
                bezel_offset: Point { x: 162, y: 22 },
                layout: Point { x: 640, y: 300 },
                artwork: "devices/macbook-pro-16.png".to_string(),
                corner_radius: 0,
                emulation: EmulationMode::Viewport,
            },
            DeviceProfile {
                id: "iPad Pro 13".to_string(),
                screen: Size { width: 624, height: 830 },
                bezel_offset: Point { x: 28, y: 28 },
                layout: Point { x: 280, y: 520 },
                artwork: "devices/ipad-pro-13.png".to_string(),
                corner_radius: 0,
                emulation: EmulationMode::Preset("ipad-pro".to_string()),
            },
            DeviceProfile {
                id: "iPhone 15 Pro".to_string(),
                screen: Size { width: 275, height: 594 },
                bezel_offset: Point { x: 13, y: 11 },
                layout: Point { x: 720, y: 780 },
                artwork: "devices/iphone-15-pro.png".to_string(),
                // Screen pixels: 120 at the preset's 3x density, scaled to 275 wide.
                corner_radius: 28,
                // The 15 Pro preset renders wrong; the 12 Pro viewport is close enough.
                emulation: EmulationMode::Preset("iphone-12-pro".to_string()),
            },
        ])
    }

    /// Parse a registry from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigError(format!("Failed to parse device registry: {}", e)))
    }

    /// Load a registry from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::ConfigError(format!(
                "Failed to read device registry '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn get(&self, id: &str) -> Option<&DeviceProfile> {
        self.devices.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeviceProfile> {
        self.devices.iter()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Check the registry against a canvas of `canvas` size.
    ///
    /// Every screen must sit fully inside the canvas: the compositor has no
    /// way to recover from an out-of-bounds placement mid-run. Ids must be
    /// unique, screens non-empty, radii at most half the short screen side
    /// and presets known.
    pub fn validate(&self, canvas: Size) -> Result<()> {
        if self.devices.is_empty() {
            return Err(Error::InvalidRegistry("registry has no devices".into()));
        }

        let mut seen = HashSet::new();
        for d in &self.devices {
            if d.id.trim().is_empty() {
                return Err(Error::InvalidRegistry("device with empty id".into()));
            }
            if !seen.insert(d.id.as_str()) {
                return Err(Error::InvalidRegistry(format!("duplicate device id '{}'", d.id)));
            }
            if d.screen.width == 0 || d.screen.height == 0 {
                return Err(Error::InvalidRegistry(format!(
                    "device '{}' has an empty screen ({}x{})",
                    d.id, d.screen.width, d.screen.height
                )));
            }
            if d.corner_radius > d.screen.width.min(d.screen.height) / 2 {
                return Err(Error::InvalidRegistry(format!(
                    "device '{}' corner radius {} exceeds half of its {}x{} screen",
                    d.id, d.corner_radius, d.screen.width, d.screen.height
                )));
            }

            let right = d.layout.x as i64 + d.screen.width as i64;
            let bottom = d.layout.y as i64 + d.screen.height as i64;
            if d.layout.x < 0
                || d.layout.y < 0
                || right > canvas.width as i64
                || bottom > canvas.height as i64
            {
                return Err(Error::InvalidRegistry(format!(
                    "device '{}' screen ({},{})..({},{}) falls outside the {}x{} canvas",
                    d.id, d.layout.x, d.layout.y, right, bottom, canvas.width, canvas.height
                )));
            }

            d.viewport_spec()?;
        }
        Ok(())
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a DeviceProfile;
    type IntoIter = std::slice::Iter<'a, DeviceProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.devices.iter()
    }
}
