//! File metadata and size formatting

use serde::{Deserialize, Serialize};

/// Metadata for one file offered to an upload controller
///
/// The host platform produces these from its file picker or drop target;
/// the controller never touches file contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// MIME type as reported by the host, e.g. `image/png`
    pub mime: String,
}

impl FileMeta {
    pub fn new(name: impl Into<String>, size: u64, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            size,
            mime: mime.into(),
        }
    }

    /// Extension including the dot, as written in the name
    pub fn extension(&self) -> Option<&str> {
        self.name.rfind('.').map(|dot| &self.name[dot..])
    }
}

/// Human-readable size, 1024-based with one decimal
///
/// ```
/// use opal_upload::format_size;
///
/// assert_eq!(format_size(0), "0 B");
/// assert_eq!(format_size(1536), "1.5 KB");
/// assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
/// ```
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
