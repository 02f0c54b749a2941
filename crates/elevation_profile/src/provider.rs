use async_trait::async_trait;
use model::{Coordinate, ElevationSeries, Route, TravelMode};

use crate::ProfileResult;

/// A routing service able to connect two coordinates.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Requests a route from `origin` to `destination`.
    ///
    /// Fails with `NoRouteFound` if the provider knows of no route and with
    /// `DirectionsUnavailable` if it could not be asked.
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> ProfileResult<Route>;
}

/// A service returning the elevation of a batch of coordinates.
#[async_trait]
pub trait ElevationProvider: Send + Sync {
    /// Looks up the elevation of every point with a single request.
    ///
    /// On success the series has exactly `points.len()` samples and
    /// `series[i].location == points[i]`.
    async fn fetch_elevations(&self, points: &[Coordinate]) -> ProfileResult<ElevationSeries>;
}
