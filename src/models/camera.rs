//! EXIF camera details attached to a photo.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CameraInfo {
    pub make: Option<String>,
    pub model: Option<String>,
    pub name: Option<String>,
    pub exposure_time: Option<String>,
    pub aperture: Option<String>,
    pub focal_length: Option<String>,
    pub iso: Option<u32>,
}

impl CameraInfo {
    /// JSON keys of the EXIF block
    pub const KEYS: [&'static str; 7] = [
        "make",
        "model",
        "name",
        "exposure_time",
        "aperture",
        "focal_length",
        "iso",
    ];

    /// True when the API returned no EXIF data at all
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
