use axum::{
    extract::{rejection::QueryRejection, OriginalUri, Query, State},
    http::Method,
    response::IntoResponse,
    routing::{get, on},
    Json, Router,
};
use elevation_profile::{elevation_client::ElevationResponse, ProfileError};
use model::Coordinate;
use serde::Deserialize;
use serde_json::json;
use utility::serde::json_string;

pub mod v1;

use crate::{
    common::{
        query_params, route_not_found, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL,
    },
    WebState,
};

pub fn routes(state: WebState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/elevation", get(elevation))
        .with_state(state.clone())
        .nest_service("/v1", v1::routes(state))
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

async fn ping() -> impl IntoResponse {
    Json(json!({
        "message": "pong!"
    }))
}

#[derive(Deserialize)]
struct ElevationQuery {
    #[serde(with = "json_string")]
    locations: Vec<Coordinate>,
}

/// `GET /api/elevation?locations=[{"lat":..,"lng":..},..]`, one elevation
/// result per location in request order.
async fn elevation(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { elevation, .. }): State<WebState>,
    params: Result<Query<ElevationQuery>, QueryRejection>,
) -> RouteResult<Json<ElevationResponse>> {
    let params = query_params(params, &Method::GET, original_uri.path())?;
    let map_error = |why: ProfileError| {
        RouteErrorResponse::from(why)
            .with_method(&Method::GET)
            .with_uri(original_uri.path())
    };

    if params.locations.is_empty() {
        return Err(map_error(ProfileError::EmptyRoute));
    }

    log::debug!(
        "Looking up elevation for {} locations.",
        params.locations.len()
    );
    let series = elevation
        .fetch_elevations(&params.locations)
        .await
        .map_err(map_error)?;

    Ok(Json(ElevationResponse {
        results: series.samples().iter().cloned().map(Into::into).collect(),
        status: Some("OK".to_owned()),
        error_message: None,
    }))
}
