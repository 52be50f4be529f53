//! Typed views over the JSON returned by the Unsplash API.
//!
//! The client keeps the raw response and works on the untyped document; these
//! models are for callers who want structured access via
//! [`RandomImageClient::photo`](crate::RandomImageClient::photo). Absent or
//! `null` fields map to `None` and serialize back as `null`.

mod camera;
mod datetime;
mod dimension;
mod location;
mod photo;
mod user;

pub use camera::CameraInfo;
pub use datetime::ImageDateTime;
pub use dimension::Dimension;
pub use location::{Coordinates, Location};
pub use photo::{Photo, PhotoLinks, PhotoSize, PhotoUrls};
pub use user::{ProfileImage, UserAccount, UserLinks, UserSocial};
