use std::collections::HashMap;

use axum::{extract::Query, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use elevation_profile::{DirectionsProvider, ElevationProvider, ProfileError};
use google_maps::{
    polyline, GoogleDirections, GoogleElevation, MapsApiClient, MapsApiCredentials,
};
use model::{Coordinate, TravelMode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

fn c(lat: f64, lng: f64) -> Coordinate {
    Coordinate::new(lat, lng).unwrap()
}

async fn client_for(router: Router) -> MapsApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    MapsApiClient::new(&MapsApiCredentials::new("test-key"))
        .unwrap()
        .with_base_url(format!("http://{addr}"))
}

fn directions_body(status: &str) -> Value {
    json!({
        "status": status,
        "routes": if status == "OK" {
            json!([{
                "legs": [{
                    "distance": { "text": "3.1 km", "value": 3100 },
                    "duration": { "text": "6 mins", "value": 360 },
                    "steps": [
                        { "polyline": { "points": "oiehGnugjNo}@n}@" } },
                        { "polyline": { "points": "_hghG~sijNo}@~{B" } }
                    ]
                }]
            }])
        } else {
            json!([])
        }
    })
}

fn directions_router(status: &'static str) -> Router {
    Router::new().route(
        "/directions/json",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params["key"], "test-key");
            assert_eq!(params["mode"], "driving");
            assert_eq!(params["origin"], "43.45,-80.49");
            assert_eq!(params["destination"], "43.47,-80.52");
            Json(directions_body(status))
        }),
    )
}

#[tokio::test]
async fn directions_follow_the_first_leg() {
    let directions = GoogleDirections::new(client_for(directions_router("OK")).await);

    let route = directions
        .route(c(43.45, -80.49), c(43.47, -80.52), TravelMode::Driving)
        .await
        .unwrap();

    assert_eq!(
        route.path.points(),
        &[c(43.45, -80.49), c(43.46, -80.5), c(43.47, -80.52)]
    );
    assert_eq!(route.summary.unwrap().duration_text, "6 mins");
}

#[tokio::test]
async fn zero_results_is_no_route() {
    let directions = GoogleDirections::new(client_for(directions_router("ZERO_RESULTS")).await);

    let err = directions
        .route(c(43.45, -80.49), c(43.47, -80.52), TravelMode::Driving)
        .await
        .unwrap_err();

    assert_eq!(err, ProfileError::NoRouteFound);
}

#[tokio::test]
async fn denied_directions_are_unavailable() {
    let directions = GoogleDirections::new(client_for(directions_router("REQUEST_DENIED")).await);

    let err = directions
        .route(c(43.45, -80.49), c(43.47, -80.52), TravelMode::Driving)
        .await
        .unwrap_err();

    assert!(matches!(err, ProfileError::DirectionsUnavailable(_)), "{err:?}");
}

fn elevation_router(drop: usize) -> Router {
    Router::new().route(
        "/elevation/json",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            assert_eq!(params["key"], "test-key");
            let encoded = params["locations"].strip_prefix("enc:").unwrap();
            let results = polyline::decode(encoded, polyline::PRECISION)
                .unwrap()
                .into_iter()
                .enumerate()
                .map(|(index, location)| {
                    json!({
                        "elevation": index as f64 * 10.0,
                        "location": location,
                        "resolution": 19.08
                    })
                })
                .collect::<Vec<_>>();
            let keep = results.len().saturating_sub(drop);
            Json(json!({ "status": "OK", "results": &results[..keep] }))
        }),
    )
}

#[tokio::test]
async fn elevation_is_requested_in_one_batch() {
    let elevation = GoogleElevation::new(client_for(elevation_router(0)).await);
    let points = [c(39.7391536, -104.9847034), c(36.455556, -116.866667)];

    let series = elevation.fetch_elevations(&points).await.unwrap();

    assert_eq!(series.len(), 2);
    assert_eq!(series.samples()[0].location, points[0]);
    assert_eq!(series.samples()[1].location, points[1]);
    assert_eq!(series.samples()[1].elevation, 10.0);
    assert_eq!(series.samples()[0].resolution, Some(19.08));
}

#[tokio::test]
async fn elevation_count_mismatch_is_malformed() {
    let elevation = GoogleElevation::new(client_for(elevation_router(1)).await);

    let err = elevation
        .fetch_elevations(&[c(0.0, 0.0), c(0.0, 1.0), c(1.0, 1.0)])
        .await
        .unwrap_err();

    assert!(matches!(err, ProfileError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn elevation_http_errors_are_upstream_errors() {
    let router = Router::new().route(
        "/elevation/json",
        get(|| async { (StatusCode::FORBIDDEN, "nope").into_response() }),
    );
    let elevation = GoogleElevation::new(client_for(router).await);

    let err = elevation.fetch_elevations(&[c(0.0, 0.0)]).await.unwrap_err();

    assert!(
        matches!(&err, ProfileError::UpstreamError { status, .. } if status.starts_with("403")),
        "{err:?}"
    );
}

#[tokio::test]
async fn elevation_service_status_is_upstream_error() {
    let router = Router::new().route(
        "/elevation/json",
        get(|| async {
            Json(json!({
                "status": "OVER_QUERY_LIMIT",
                "error_message": "quota exceeded",
                "results": []
            }))
        }),
    );
    let elevation = GoogleElevation::new(client_for(router).await);

    let err = elevation.fetch_elevations(&[c(0.0, 0.0)]).await.unwrap_err();

    assert_eq!(
        err,
        ProfileError::UpstreamError {
            status: "OVER_QUERY_LIMIT".to_owned(),
            details: Some("quota exceeded".to_owned()),
        }
    );
}
