use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use elevation_profile::{
    DirectionsProvider, ElevationProvider, ProfileError, ProfileResult, Session,
};
use model::{Coordinate, ElevationSample, ElevationSeries, Route, RoutePath, TravelMode};
use reqwest::{header, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use web::{app, WebState};

struct StraightLine;

#[async_trait]
impl DirectionsProvider for StraightLine {
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        _mode: TravelMode,
    ) -> ProfileResult<Route> {
        Ok(RoutePath::new(vec![origin, destination]).into())
    }
}

/// Elevation grows by ten metres per point: 10, 20, 30, ...
struct Stepped;

#[async_trait]
impl ElevationProvider for Stepped {
    async fn fetch_elevations(&self, points: &[Coordinate]) -> ProfileResult<ElevationSeries> {
        if points.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }
        Ok(points
            .iter()
            .enumerate()
            .map(|(i, point)| ElevationSample::new(*point, (i + 1) as f64 * 10.0))
            .collect::<Vec<_>>()
            .into())
    }
}

struct Server {
    base: String,
    http: reqwest::Client,
}

impl Server {
    async fn start() -> Self {
        let state = WebState {
            session: Session::spawn(Arc::new(StraightLine), Arc::new(Stepped)),
            elevation: Arc::new(Stepped),
        };
        let router = app(state, Path::new("./resources/www/"));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn put(&self, path: &str, body: Value) -> reqwest::Response {
        self.http.put(self.url(path)).json(&body).send().await.unwrap()
    }

    async fn post(&self, path: &str, body: Option<Value>) -> reqwest::Response {
        let request = self.http.post(self.url(path));
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        request.send().await.unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.http.get(self.url(path)).send().await.unwrap()
    }
}

async fn json_of(response: reqwest::Response) -> Value {
    response.json().await.unwrap()
}

#[tokio::test]
async fn ping() {
    let server = Server::start().await;

    let response = server.get("/api/ping").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_of(response).await, json!({ "message": "pong!" }));
}

#[tokio::test]
async fn drawn_route_is_exported_as_csv() {
    let server = Server::start().await;

    let profile = json_of(server.put("/api/v1/profile/drawing", json!({ "active": true })).await).await;
    assert_eq!(profile["drawingActive"], json!(true));

    for (lat, lng) in [(0, 0), (0, 1), (1, 1)] {
        let response = server
            .post(
                "/api/v1/profile/drawing/events",
                Some(json!({ "type": "vertex", "coordinate": { "lat": lat, "lng": lng } })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
    let profile = json_of(
        server
            .post("/api/v1/profile/drawing/events", Some(json!({ "type": "complete" })))
            .await,
    )
    .await;
    assert_eq!(profile["phase"], json!("routeReady"));

    let action = json_of(server.post("/api/v1/profile/elevation", None).await).await;
    assert_eq!(action["outcome"], json!("applied"));
    assert_eq!(action["profile"]["phase"], json!("elevationReady"));
    assert_eq!(action["profile"]["minElevation"], json!(10.0));
    assert_eq!(action["profile"]["maxElevation"], json!(30.0));

    let chart = json_of(server.get("/api/v1/profile/chart").await).await;
    assert_eq!(
        chart,
        json!([
            { "index": 0, "elevation": 10.0 },
            { "index": 1, "elevation": 20.0 },
            { "index": 2, "elevation": 30.0 }
        ])
    );

    let response = server.get("/api/v1/profile/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"elevation.csv\""
    );
    assert_eq!(
        response.text().await.unwrap(),
        "Index,Lat,Long,Elevation\n0,0,0,10\n1,0,1,20\n2,1,1,30\n"
    );
}

#[tokio::test]
async fn directions_between_endpoints() {
    let server = Server::start().await;

    server
        .put("/api/v1/profile/start", json!({ "lat": 43.45, "lng": -80.49 }))
        .await;
    server
        .put("/api/v1/profile/end", json!({ "lat": 43.47, "lng": -80.52 }))
        .await;

    let action = json_of(server.post("/api/v1/profile/directions", None).await).await;
    assert_eq!(action["outcome"], json!("applied"));
    assert_eq!(action["profile"]["phase"], json!("routeReady"));
    assert_eq!(
        action["profile"]["route"],
        json!([
            { "lat": 43.45, "lng": -80.49 },
            { "lat": 43.47, "lng": -80.52 }
        ])
    );

    // the edited route has no elevation yet
    server.post("/api/v1/profile/elevation", None).await;
    let profile = json_of(
        server
            .put("/api/v1/profile/points/1", json!({ "lat": 43.48, "lng": -80.52 }))
            .await,
    )
    .await;
    assert_eq!(profile["phase"], json!("routeReady"));
    assert_eq!(profile.get("elevation"), None);
}

#[tokio::test]
async fn directions_without_endpoints_conflict() {
    let server = Server::start().await;

    let response = server.post("/api/v1/profile/directions", None).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_of(response).await;
    assert_eq!(body["httpMethod"], json!("POST"));
    assert_eq!(body["requestedUri"], json!("/api/v1/profile/directions"));
}

#[tokio::test]
async fn export_without_elevation_conflicts() {
    let server = Server::start().await;

    let response = server.get("/api/v1/profile/export").await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_coordinates_are_bad_requests() {
    let server = Server::start().await;

    let response = server
        .put("/api/v1/profile/start", json!({ "lat": 91.0, "lng": 0.0 }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let profile = json_of(server.get("/api/v1/profile").await).await;
    assert_eq!(profile["phase"], json!("empty"));
    assert_eq!(profile.get("start"), None);
}

#[tokio::test]
async fn clear_discards_the_profile() {
    let server = Server::start().await;

    server.put("/api/v1/profile/drawing", json!({ "active": true })).await;
    server
        .post(
            "/api/v1/profile/drawing/events",
            Some(json!({ "type": "vertex", "coordinate": { "lat": 1.0, "lng": 2.0 } })),
        )
        .await;
    server
        .post("/api/v1/profile/drawing/events", Some(json!({ "type": "complete" })))
        .await;

    let profile = json_of(server.post("/api/v1/profile/clear", None).await).await;

    assert_eq!(profile["phase"], json!("empty"));
    assert_eq!(profile.get("route"), None);
    assert_eq!(profile["chart"], json!([]));
}

#[tokio::test]
async fn elevation_endpoint_keeps_order() {
    let server = Server::start().await;
    let locations = r#"[{"lat":39.7391536,"lng":-104.9847034},{"lat":36.455556,"lng":-116.866667}]"#;

    let response = server
        .http
        .get(server.url("/api/elevation"))
        .query(&[("locations", locations)])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_of(response).await;
    assert_eq!(body["status"], json!("OK"));
    assert_eq!(
        body["results"],
        json!([
            { "location": { "lat": 39.7391536, "lng": -104.9847034 }, "elevation": 10.0 },
            { "location": { "lat": 36.455556, "lng": -116.866667 }, "elevation": 20.0 }
        ])
    );
}

#[tokio::test]
async fn elevation_endpoint_rejects_empty_requests() {
    let server = Server::start().await;

    let response = server
        .http
        .get(server.url("/api/elevation"))
        .query(&[("locations", "[]")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn elevation_endpoint_reports_bad_parameters_as_json() {
    let server = Server::start().await;

    for query in [&[][..], &[("locations", "not json")][..]] {
        let response = server
            .http
            .get(server.url("/api/elevation"))
            .query(query)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_of(response).await;
        assert_eq!(body["requestedUri"], json!("/api/elevation"));
        assert_eq!(body["message"], json!("Invalid query parameters."));
    }
}

#[tokio::test]
async fn unknown_api_routes_are_json_404s() {
    let server = Server::start().await;

    let response = server.get("/api/v1/nothing").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_of(response).await;
    assert_eq!(body["requestedUri"], json!("/api/v1/nothing"));
}

#[tokio::test]
async fn coordinate_schema() {
    let server = Server::start().await;

    let schema = json_of(server.get("/api/v1/profile/schema/coordinate").await).await;

    assert_eq!(schema["title"], json!("Coordinate"));
}
