//! The account that uploaded a photo.

use serde::{Deserialize, Serialize};

use super::ImageDateTime;

/// An Unsplash user as embedded in a photo response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,

    /// Free-text location from the profile
    pub location: Option<String>,
    pub updated_at: Option<ImageDateTime>,

    pub instagram_username: Option<String>,
    pub twitter_username: Option<String>,
    pub portfolio_url: Option<String>,

    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_photos: u64,
    #[serde(default)]
    pub total_collections: u64,

    #[serde(default)]
    pub for_hire: bool,
    #[serde(default)]
    pub accepted_tos: bool,

    pub profile_image: Option<ProfileImage>,
    #[serde(default)]
    pub links: UserLinks,
    pub social: Option<UserSocial>,
}

impl UserAccount {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            ..Self::default()
        }
    }

    /// Name to show for attribution, falling back to the username
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.username)
    }

    /// Profile page on unsplash.com
    pub fn profile_url(&self) -> String {
        self.links
            .html
            .clone()
            .unwrap_or_else(|| format!("https://unsplash.com/@{}", self.username))
    }
}

/// Profile picture URLs by size
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProfileImage {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

/// API and web links for a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub html: Option<String>,
    pub photos: Option<String>,
    pub likes: Option<String>,
    pub portfolio: Option<String>,
    pub following: Option<String>,
    pub followers: Option<String>,
}

/// Social handles
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserSocial {
    pub instagram_username: Option<String>,
    pub portfolio_url: Option<String>,
    pub twitter_username: Option<String>,
    pub paypal_email: Option<String>,
}
