use async_trait::async_trait;
use model::{Coordinate, ElevationSample, ElevationSeries};
use serde::{Deserialize, Serialize};
use utility::serde::json_string;

use crate::{provider::ElevationProvider, ProfileError, ProfileResult};

/// Body of the `/elevation` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationResponse {
    pub results: Vec<ElevationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevationResult {
    pub location: Coordinate,
    pub elevation: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<f64>,
}

impl From<ElevationSample> for ElevationResult {
    fn from(sample: ElevationSample) -> Self {
        Self {
            location: sample.location,
            elevation: sample.elevation,
            resolution: sample.resolution,
        }
    }
}

#[derive(Serialize)]
struct ElevationQuery<'a> {
    #[serde(with = "json_string")]
    locations: &'a [Coordinate],
}

/// Pairs provider results with the points they were requested for.
///
/// The provider must answer with exactly one result per point, in request
/// order. A differing count is an error; the series is never truncated or
/// padded. Samples carry the submitted coordinate rather than the location
/// echoed by the provider.
pub fn align_results(
    points: &[Coordinate],
    results: Vec<ElevationResult>,
) -> ProfileResult<ElevationSeries> {
    if results.len() != points.len() {
        return Err(ProfileError::MalformedResponse(format!(
            "requested {} points but received {} samples",
            points.len(),
            results.len()
        )));
    }

    let samples = points
        .iter()
        .zip(results)
        .enumerate()
        .map(|(index, (point, result))| {
            let drift_km = point.distance_km(&result.location);
            if drift_km > 0.1 {
                log::warn!(
                    "Elevation sample {index} was reported at {} instead of {point} ({drift_km:.3} km off).",
                    result.location
                );
            }
            ElevationSample {
                location: *point,
                elevation: result.elevation,
                resolution: result.resolution,
            }
        })
        .collect::<Vec<_>>();

    Ok(ElevationSeries::new(samples))
}

/// Client for an elevation service exposing
/// `GET {base_url}/elevation?locations=<JSON array of {lat,lng}>`.
#[derive(Debug, Clone)]
pub struct HttpElevationClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpElevationClient {
    pub fn new<S: Into<String>>(base_url: S) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client<S: Into<String>>(base_url: S, http: reqwest::Client) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ElevationProvider for HttpElevationClient {
    async fn fetch_elevations(&self, points: &[Coordinate]) -> ProfileResult<ElevationSeries> {
        if points.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }

        let url = format!("{}/elevation", self.base_url);
        log::info!("Requesting elevation of {} points from '{url}'.", points.len());

        /* perform get-request */
        let response = self
            .http
            .get(&url)
            .query(&ElevationQuery { locations: points })
            .send()
            .await
            .map_err(|why| ProfileError::UpstreamUnavailable(why.to_string()))?;

        /* parse response */
        let status = response.status();
        if !status.is_success() {
            let details = response.text().await.ok().filter(|text| !text.is_empty());
            return Err(ProfileError::UpstreamError {
                status: status.to_string(),
                details,
            });
        }

        let body: ElevationResponse = response
            .json()
            .await
            .map_err(|why| ProfileError::MalformedResponse(why.to_string()))?;

        if let Some(status) = body.status.filter(|status| status != "OK") {
            return Err(ProfileError::UpstreamError {
                status,
                details: body.error_message,
            });
        }

        align_results(points, body.results)
    }
}
