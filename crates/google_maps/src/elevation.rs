use async_trait::async_trait;
use elevation_profile::{
    elevation_client::{align_results, ElevationResponse},
    ElevationProvider, ProfileError, ProfileResult,
};
use model::{Coordinate, ElevationSeries};
use serde::Serialize;

use crate::{
    client::{MapsApiClient, ServiceStatus},
    polyline, ApiError,
};

impl ServiceStatus for ElevationResponse {
    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("OK")
    }

    fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

/// Most locations the Elevation API accepts in one request.
pub const MAX_LOCATIONS: usize = 512;

#[derive(Serialize)]
struct ElevationQuery {
    /// `enc:<polyline>`, far shorter than `lat,lng|lat,lng|...`.
    locations: String,
}

/// [`ElevationProvider`] backed by the Google Elevation API.
pub struct GoogleElevation {
    client: MapsApiClient,
}

impl GoogleElevation {
    pub fn new(client: MapsApiClient) -> Self {
        Self { client }
    }

    pub async fn get_elevation(
        &self,
        points: &[Coordinate],
    ) -> Result<ElevationResponse, ApiError> {
        if points.len() > MAX_LOCATIONS {
            log::warn!(
                "Requesting elevation of {} locations, the API accepts at most {MAX_LOCATIONS}.",
                points.len()
            );
        }
        let query = ElevationQuery {
            locations: format!("enc:{}", polyline::encode(points, polyline::PRECISION)),
        };
        self.client.get("elevation/json", &query).await
    }
}

#[async_trait]
impl ElevationProvider for GoogleElevation {
    async fn fetch_elevations(&self, points: &[Coordinate]) -> ProfileResult<ElevationSeries> {
        if points.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }

        let response = self.get_elevation(points).await.map_err(|why| match why {
            ApiError::RequestError(e) => ProfileError::UpstreamUnavailable(e.to_string()),
            ApiError::InvalidResponse {
                status_code,
                response,
                ..
            } => ProfileError::UpstreamError {
                status: status_code.to_string(),
                details: response,
            },
            ApiError::Status { status, message } => ProfileError::UpstreamError {
                status,
                details: message,
            },
            other => ProfileError::MalformedResponse(other.to_string()),
        })?;

        align_results(points, response.results)
    }
}
