use std::{error, fmt};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ExampleData;

/// A validated WGS84 position.
///
/// Latitude lies in `[-90, 90]`, longitude in `[-180, 180]` and both are
/// finite. Instances can only be obtained through [`Coordinate::new`] (or by
/// deserializing, which runs the same validation), so every `Coordinate`
/// seen by the rest of the workspace is known to be in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        let lat_ok = lat.is_finite() && (-90.0..=90.0).contains(&lat);
        let lng_ok = lng.is_finite() && (-180.0..=180.0).contains(&lng);
        if lat_ok && lng_ok {
            Ok(Self { lat, lng })
        } else {
            Err(InvalidCoordinate { lat, lng })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &Coordinate) -> f64 {
        utility::geo::haversine_distance(self.lat, self.lng, other.lat, other.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

impl ExampleData for Coordinate {
    fn example_data() -> Self {
        Self {
            lat: 43.45,
            lng: -80.49,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvalidCoordinate {
    pub lat: f64,
    pub lng: f64,
}

impl error::Error for InvalidCoordinate {}

impl fmt::Display for InvalidCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid coordinate (lat: {}, lng: {}); expected lat in [-90, 90] and lng in [-180, 180].",
            self.lat, self.lng
        )
    }
}
