//! Photo model for `GET /photos/random`.

use serde::{Deserialize, Serialize};

use super::{CameraInfo, Dimension, ImageDateTime, Location, UserAccount};

/// A photo as returned by the random-photo endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub created_at: Option<ImageDateTime>,
    pub updated_at: Option<ImageDateTime>,
    pub promoted_at: Option<ImageDateTime>,

    pub width: u32,
    pub height: u32,

    /// Dominant colour as `#rrggbb`
    pub color: Option<String>,
    pub blur_hash: Option<String>,
    pub description: Option<String>,
    pub alt_description: Option<String>,

    #[serde(default)]
    pub urls: PhotoUrls,
    #[serde(default)]
    pub links: PhotoLinks,

    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub downloads: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub liked_by_user: bool,

    pub user: Option<UserAccount>,
    pub location: Option<Location>,
    pub exif: Option<CameraInfo>,
}

impl Photo {
    pub fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    pub fn download_link(&self) -> Option<&str> {
        self.links.download.as_deref()
    }

    /// Rendition URL for `size`
    pub fn url(&self, size: PhotoSize) -> Option<&str> {
        let url = match size {
            PhotoSize::Raw => &self.urls.raw,
            PhotoSize::Full => &self.urls.full,
            PhotoSize::Regular => &self.urls.regular,
            PhotoSize::Small => &self.urls.small,
            PhotoSize::Thumb => &self.urls.thumb,
        };
        url.as_deref()
    }
}

/// Renditions offered under `urls`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoSize {
    Raw,
    Full,
    Regular,
    Small,
    Thumb,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoUrls {
    pub raw: Option<String>,
    pub full: Option<String>,
    pub regular: Option<String>,
    pub small: Option<String>,
    pub thumb: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub html: Option<String>,
    pub download: Option<String>,
    pub download_location: Option<String>,
}
