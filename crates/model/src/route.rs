use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Coordinate;

/// Ordered sequence of coordinates describing a route, either decoded from a
/// directions result or drawn by hand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RoutePath {
    points: Vec<Coordinate>,
}

impl RoutePath {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Coordinate> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    /// Replaces the point at `index`, returning the previous one.
    /// Returns `None` if `index` is out of range.
    pub fn replace(&mut self, index: usize, coordinate: Coordinate) -> Option<Coordinate> {
        self.points
            .get_mut(index)
            .map(|point| std::mem::replace(point, coordinate))
    }

    pub fn distance_km(&self) -> f64 {
        utility::geo::path_length(self.points.iter().map(|p| (p.lat(), p.lng())))
    }
}

impl From<Vec<Coordinate>> for RoutePath {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for RoutePath {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
