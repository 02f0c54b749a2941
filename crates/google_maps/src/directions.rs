use async_trait::async_trait;
use elevation_profile::{DirectionsProvider, ProfileError, ProfileResult};
use model::{Coordinate, LegSummary, Route, RoutePath, TravelMode};
use serde::{Deserialize, Serialize};

use crate::{
    client::{MapsApiClient, ServiceStatus},
    polyline::{self, PolylineError},
    ApiError,
};

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    pub status: String,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub routes: Vec<DirectionsRoute>,
}

impl ServiceStatus for DirectionsResponse {
    fn status(&self) -> &str {
        &self.status
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsRoute {
    #[serde(default)]
    pub legs: Vec<DirectionsLeg>,
    pub overview_polyline: Option<EncodedPolyline>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsLeg {
    pub distance: Option<TextValue>,
    pub duration: Option<TextValue>,
    #[serde(default)]
    pub steps: Vec<DirectionsStep>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextValue {
    pub text: String,
    pub value: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsStep {
    pub polyline: EncodedPolyline,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EncodedPolyline {
    pub points: String,
}

#[derive(Serialize)]
struct DirectionsQuery {
    origin: String,
    destination: String,
    mode: &'static str,
}

impl DirectionsLeg {
    pub fn summary(&self) -> Option<LegSummary> {
        match (&self.distance, &self.duration) {
            (Some(distance), Some(duration)) => Some(LegSummary {
                distance_text: distance.text.clone(),
                duration_text: duration.text.clone(),
            }),
            _ => None,
        }
    }

    /// Decodes the polylines of all steps into one path. Consecutive steps
    /// share their joint vertex, which is only kept once.
    pub fn path(&self) -> Result<RoutePath, PolylineError> {
        let mut points: Vec<Coordinate> = Vec::new();
        for step in &self.steps {
            let step_points = polyline::decode(&step.polyline.points, polyline::PRECISION)?;
            let skip = match (points.last(), step_points.first()) {
                (Some(last), Some(first)) if last == first => 1,
                _ => 0,
            };
            points.extend(step_points.into_iter().skip(skip));
        }
        Ok(RoutePath::new(points))
    }
}

/// Turns a directions response into the geometry of the first leg of the
/// first route. Falls back to the route overview if the leg has no steps.
pub fn first_leg_route(response: &DirectionsResponse) -> Result<Option<Route>, PolylineError> {
    let Some(route) = response.routes.first() else {
        return Ok(None);
    };
    let Some(leg) = route.legs.first() else {
        return Ok(None);
    };

    let mut path = leg.path()?;
    if path.is_empty() {
        if let Some(overview) = &route.overview_polyline {
            path = RoutePath::new(polyline::decode(&overview.points, polyline::PRECISION)?);
        }
    }
    if path.is_empty() {
        return Ok(None);
    }

    Ok(Some(Route::new(path, leg.summary())))
}

fn format_location(coordinate: &Coordinate) -> String {
    format!("{},{}", coordinate.lat(), coordinate.lng())
}

/// [`DirectionsProvider`] backed by the Google Directions API.
pub struct GoogleDirections {
    client: MapsApiClient,
}

impl GoogleDirections {
    pub fn new(client: MapsApiClient) -> Self {
        Self { client }
    }

    pub async fn get_directions(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        mode: TravelMode,
    ) -> Result<DirectionsResponse, ApiError> {
        let query = DirectionsQuery {
            origin: format_location(origin),
            destination: format_location(destination),
            mode: mode.as_str(),
        };
        self.client.get("directions/json", &query).await
    }
}

#[async_trait]
impl DirectionsProvider for GoogleDirections {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        mode: TravelMode,
    ) -> ProfileResult<Route> {
        let response = self
            .get_directions(&origin, &destination, mode)
            .await
            .map_err(|why| match why {
                ApiError::Status { status, .. }
                    if status == "ZERO_RESULTS" || status == "NOT_FOUND" =>
                {
                    ProfileError::NoRouteFound
                }
                other => ProfileError::DirectionsUnavailable(other.to_string()),
            })?;

        first_leg_route(&response)
            .map_err(|why| ProfileError::DirectionsUnavailable(why.to_string()))?
            .ok_or(ProfileError::NoRouteFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn response(json: &str) -> DirectionsResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_step_polylines() {
        let response = response(
            r#"{
                "status": "OK",
                "routes": [{
                    "legs": [{
                        "distance": { "text": "3.1 km", "value": 3100 },
                        "duration": { "text": "6 mins", "value": 360 },
                        "steps": [
                            { "polyline": { "points": "oiehGnugjNo}@n}@" } },
                            { "polyline": { "points": "_hghG~sijNo}@~{B" } }
                        ]
                    }]
                }]
            }"#,
        );
        let route = first_leg_route(&response).unwrap().unwrap();
        assert_eq!(
            route.path.points(),
            &[c(43.45, -80.49), c(43.46, -80.5), c(43.47, -80.52)]
        );
        assert_eq!(
            route.summary,
            Some(LegSummary {
                distance_text: "3.1 km".to_owned(),
                duration_text: "6 mins".to_owned(),
            })
        );
    }

    #[test]
    fn falls_back_to_overview() {
        let response = response(
            r#"{
                "status": "OK",
                "routes": [{
                    "overview_polyline": { "points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@" },
                    "legs": [{ "steps": [] }]
                }]
            }"#,
        );
        let route = first_leg_route(&response).unwrap().unwrap();
        assert_eq!(route.path.len(), 3);
        assert_eq!(route.summary, None);
    }

    #[test]
    fn no_routes_means_none() {
        let response = response(r#"{ "status": "OK", "routes": [] }"#);
        assert!(first_leg_route(&response).unwrap().is_none());
    }

    #[test]
    fn broken_polylines_are_errors() {
        let response = response(
            r#"{
                "status": "OK",
                "routes": [{ "legs": [{ "steps": [{ "polyline": { "points": "_p~iF" } }] }] }]
            }"#,
        );
        assert_eq!(first_leg_route(&response), Err(PolylineError::Truncated));
    }
}
