use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Geodetic coordinates produced by a propagator
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display, Serialize, Deserialize)]
#[display(fmt = "{{lat: {}, lon: {}, height_km: {}}}", "lat", "lon", "height_km")]
#[serde(rename_all = "camelCase")]
pub struct Geodetic {
    /// Latitude [deg]
    pub lat: f64,
    /// Longitude [deg]
    pub lon: f64,
    /// Height above the ellipsoid [km]
    pub height_km: f64,
}

impl Geodetic {
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite() && self.height_km.is_finite()
    }
}

/// A satellite's position at one refresh tick
#[derive(Clone, PartialEq, PartialOrd, Debug, Display, Serialize, Deserialize)]
#[display(
    fmt = "{{name: {}, lat: {}, lon: {}, height_km: {}}}",
    "name",
    "lat",
    "lon",
    "height_km"
)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub name: String,
    /// Latitude [deg]
    pub lat: f64,
    /// Longitude [deg]
    pub lon: f64,
    /// Height above the ellipsoid [km]
    pub height_km: f64,
}

impl Position {
    pub fn new(name: impl Into<String>, geodetic: Geodetic) -> Self {
        Self {
            name: name.into(),
            lat: geodetic.lat,
            lon: geodetic.lon,
            height_km: geodetic.height_km,
        }
    }

    pub fn geodetic(&self) -> Geodetic {
        Geodetic {
            lat: self.lat,
            lon: self.lon,
            height_km: self.height_km,
        }
    }
}
