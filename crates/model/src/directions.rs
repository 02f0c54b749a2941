use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::RoutePath;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
}

impl TravelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
        }
    }
}

/// Human readable distance and duration of a route leg, for display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegSummary {
    pub distance_text: String,
    pub duration_text: String,
}

/// Result of a route acquisition.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub path: RoutePath,
    pub summary: Option<LegSummary>,
}

impl Route {
    pub fn new(path: RoutePath, summary: Option<LegSummary>) -> Self {
        Self { path, summary }
    }
}

impl From<RoutePath> for Route {
    fn from(path: RoutePath) -> Self {
        Self::new(path, None)
    }
}
