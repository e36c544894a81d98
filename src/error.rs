//! Error types for the preview pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while capturing and compositing a preview
#[derive(Error, Debug)]
pub enum Error {
    /// No usable rendering engine was found on the host
    #[error("Renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// The target URL is empty or cannot be parsed
    #[error("Invalid URL '{0}'")]
    InvalidUrl(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The renderer could not navigate to or snapshot the page
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// Encoded image bytes could not be decoded
    #[error("Decode failed: {0}")]
    DecodeFailed(String),

    /// A single device's capture job failed
    #[error("Capture failed for device '{device}': {source}")]
    CaptureFailed {
        device: String,
        #[source]
        source: Box<Error>,
    },

    /// The compositor was handed a mapping without this device
    #[error("No capture available for device '{0}'")]
    MissingCapture(String),

    /// The artwork store has nothing at this path
    #[error("Artwork not found: {0}")]
    ArtworkNotFound(String),

    /// Bezel artwork is missing or corrupt
    #[error("Artwork unreadable for device '{device}': {reason}")]
    ArtworkUnreadable { device: String, reason: String },

    /// The device registry violates a precondition
    #[error("Invalid device registry: {0}")]
    InvalidRegistry(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The finished canvas could not be encoded or written
    #[error("Encoding failed: {0}")]
    EncodeFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an error as the failure of one device's capture job.
    pub fn capture_failed(device: impl Into<String>, source: Error) -> Self {
        Error::CaptureFailed {
            device: device.into(),
            source: Box::new(source),
        }
    }

    /// Device identity carried by per-device errors, if any.
    pub fn device(&self) -> Option<&str> {
        match self {
            Error::CaptureFailed { device, .. } | Error::ArtworkUnreadable { device, .. } => {
                Some(device.as_str())
            }
            Error::MissingCapture(device) => Some(device.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_failed_names_device() {
        let err = Error::capture_failed("iPhone 15 Pro", Error::Timeout(30000));
        assert_eq!(err.device(), Some("iPhone 15 Pro"));
        let msg = err.to_string();
        assert!(msg.contains("iPhone 15 Pro"));
        assert!(msg.contains("30000ms"));
    }

    #[test]
    fn non_device_errors_have_no_device() {
        assert_eq!(Error::InvalidUrl(String::new()).device(), None);
    }
}
