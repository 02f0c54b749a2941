use model::{Coordinate, Route, RoutePath, TravelMode};
use serde::{Deserialize, Serialize};

use crate::{provider::DirectionsProvider, ProfileError, ProfileResult};

/// How far the ends of a directions route may lie from the requested
/// endpoints before it is reported. Providers snap endpoints to the road
/// network, so some offset is normal.
pub const ROUTING_TOLERANCE_KM: f64 = 1.0;

/// Asks `provider` for a driving route from `start` to `end`.
///
/// A route with fewer than two points is treated as no route at all.
pub async fn directions(
    provider: &dyn DirectionsProvider,
    start: Coordinate,
    end: Coordinate,
) -> ProfileResult<Route> {
    log::debug!("Requesting directions from {start} to {end}.");
    let route = provider.route(start, end, TravelMode::Driving).await?;

    if route.path.len() < 2 {
        log::info!(
            "Directions from {start} to {end} returned {} points, treating as no route.",
            route.path.len()
        );
        return Err(ProfileError::NoRouteFound);
    }

    for (label, requested, actual) in [
        ("start", start, route.path.first()),
        ("end", end, route.path.last()),
    ] {
        if let Some(actual) = actual {
            let offset_km = requested.distance_km(actual);
            if offset_km > ROUTING_TOLERANCE_KM {
                log::warn!(
                    "Route {label} {actual} is {offset_km:.2} km away from the requested {requested}."
                );
            }
        }
    }

    log::info!(
        "Acquired route of {} points ({:.2} km).",
        route.path.len(),
        route.path.distance_km()
    );
    Ok(route)
}

/// One step of freehand drawing input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinate", rename_all = "camelCase")]
pub enum DrawEvent {
    /// The user placed a vertex.
    Vertex(Coordinate),
    /// Throw away the vertices of the unfinished drawing.
    Restart,
    /// The drawing action finished; its vertices become the route.
    Complete,
}

/// Vertices of the drawing action in progress, in click order.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    vertices: Vec<Coordinate>,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one vertex has been placed since the last
    /// completion or restart.
    pub fn is_started(&self) -> bool {
        !self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn push(&mut self, vertex: Coordinate) {
        self.vertices.push(vertex);
    }

    pub fn restart(&mut self) {
        self.vertices.clear();
    }

    /// Turns the placed vertices into a route and starts over.
    pub fn finish(&mut self) -> ProfileResult<Route> {
        if self.vertices.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }
        let vertices = std::mem::take(&mut self.vertices);
        Ok(Route::from(RoutePath::new(vertices)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    struct FixedDirections(ProfileResult<Route>);

    #[async_trait]
    impl DirectionsProvider for FixedDirections {
        async fn route(
            &self,
            _origin: Coordinate,
            _destination: Coordinate,
            mode: TravelMode,
        ) -> ProfileResult<Route> {
            assert_eq!(mode, TravelMode::Driving);
            self.0.clone()
        }
    }

    #[tokio::test]
    async fn directions_pass_through_routes() {
        let path = RoutePath::new(vec![c(0.0, 0.0), c(0.0, 0.5), c(0.0, 1.0)]);
        let provider = FixedDirections(Ok(Route::from(path.clone())));
        let route = directions(&provider, c(0.0, 0.0), c(0.0, 1.0)).await.unwrap();
        assert_eq!(route.path, path);
    }

    #[tokio::test]
    async fn single_point_routes_are_no_routes() {
        let provider = FixedDirections(Ok(Route::from(RoutePath::new(vec![c(0.0, 0.0)]))));
        let err = directions(&provider, c(0.0, 0.0), c(0.0, 1.0)).await.unwrap_err();
        assert_eq!(err, ProfileError::NoRouteFound);
    }

    #[tokio::test]
    async fn provider_errors_are_forwarded() {
        let provider =
            FixedDirections(Err(ProfileError::DirectionsUnavailable("offline".to_owned())));
        let err = directions(&provider, c(0.0, 0.0), c(0.0, 1.0)).await.unwrap_err();
        assert!(matches!(err, ProfileError::DirectionsUnavailable(_)));
    }

    #[test]
    fn drawing_keeps_click_order() {
        let mut drawing = DrawingSession::new();
        assert!(!drawing.is_started());
        drawing.push(c(0.0, 0.0));
        drawing.push(c(0.0, 1.0));
        drawing.push(c(1.0, 1.0));
        assert!(drawing.is_started());

        let route = drawing.finish().unwrap();
        assert_eq!(
            route.path.points(),
            &[c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)]
        );
        assert_eq!(route.summary, None);
        assert!(!drawing.is_started());
    }

    #[test]
    fn finishing_an_empty_drawing_fails() {
        let mut drawing = DrawingSession::new();
        drawing.push(c(5.0, 5.0));
        drawing.restart();
        assert_eq!(drawing.finish().unwrap_err(), ProfileError::EmptyRoute);
    }

    #[test]
    fn draw_events_use_tagged_json() {
        let event: DrawEvent =
            serde_json::from_str(r#"{"type":"vertex","coordinate":{"lat":1.0,"lng":2.0}}"#)
                .unwrap();
        assert_eq!(event, DrawEvent::Vertex(c(1.0, 2.0)));
        let event: DrawEvent = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
        assert_eq!(event, DrawEvent::Complete);
    }
}
