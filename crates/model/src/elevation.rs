use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, ExampleData};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ElevationSample {
    pub location: Coordinate,
    /// Elevation in meters relative to local mean sea level.
    pub elevation: f64,
    /// Maximum distance in meters between the data points the elevation was
    /// interpolated from, if the provider reports one.
    #[serde(default)]
    pub resolution: Option<f64>,
}

impl ElevationSample {
    pub fn new(location: Coordinate, elevation: f64) -> Self {
        Self {
            location,
            elevation,
            resolution: None,
        }
    }
}

impl ExampleData for ElevationSample {
    fn example_data() -> Self {
        Self {
            location: Coordinate::example_data(),
            elevation: 329.5,
            resolution: Some(9.54),
        }
    }
}

/// Elevation samples, index-aligned with the route points they were
/// requested for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ElevationSeries {
    samples: Vec<ElevationSample>,
}

impl ElevationSeries {
    pub fn new(samples: Vec<ElevationSample>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[ElevationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Projects the series onto `(index, elevation)` pairs for plotting.
    pub fn chart(&self) -> Vec<ChartPoint> {
        self.samples
            .iter()
            .enumerate()
            .map(|(index, sample)| ChartPoint {
                index,
                elevation: sample.elevation,
            })
            .collect()
    }

    pub fn min_elevation(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.elevation).reduce(f64::min)
    }

    pub fn max_elevation(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.elevation).reduce(f64::max)
    }
}

impl From<Vec<ElevationSample>> for ElevationSeries {
    fn from(samples: Vec<ElevationSample>) -> Self {
        Self::new(samples)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ChartPoint {
    pub index: usize,
    pub elevation: f64,
}
