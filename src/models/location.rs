//! Where a photo was taken.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub title: Option<String>,
    pub name: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub position: Option<Coordinates>,
}

impl Location {
    /// The most specific human-readable label available
    pub fn label(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .or(self.city.as_deref())
            .or(self.country.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Coordinates {
    /// Both coordinates, if the API supplied them
    pub fn pair(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}
