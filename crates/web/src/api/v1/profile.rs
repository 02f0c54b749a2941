use axum::{
    extract::{rejection::JsonRejection, OriginalUri, Path, State},
    http::{header, Method, Uri},
    response::IntoResponse,
    routing::{get, on, post, put},
    Json, Router,
};
use elevation_profile::{
    export::{CSV_FILE_NAME, CSV_MIME_TYPE},
    DrawEvent, Outcome, ProfileError, ProfileSnapshot,
};
use model::{ChartPoint, Coordinate};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::{
    common::{json_body, route_not_found, schema, RouteErrorResponse, RouteResult, METHOD_FILTER_ALL},
    WebState,
};

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/", get(get_profile))
        .route("/start", put(put_start))
        .route("/end", put(put_end))
        .route("/directions", post(post_directions))
        .route("/drawing", put(put_drawing))
        .route("/drawing/events", post(post_drawing_event))
        .route("/points/:index", put(put_point))
        .route("/elevation", post(post_elevation))
        .route("/chart", get(get_chart))
        .route("/export", get(get_export))
        .route("/clear", post(post_clear))
        .route("/reset", post(post_reset))
        .route("/schema/coordinate", get(schema::<Coordinate>))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Answer of the actions that wait for a provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionDto {
    /// `discarded` if the answer arrived after the session moved on.
    outcome: Outcome,
    profile: ProfileSnapshot,
}

#[derive(Debug, Deserialize)]
struct DrawingDto {
    active: bool,
}

fn request_failed(why: ProfileError, method: &Method, uri: &Uri) -> RouteErrorResponse {
    RouteErrorResponse::from(why)
        .with_method(method)
        .with_uri(uri.path())
}

async fn get_profile(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<ProfileSnapshot>> {
    session
        .snapshot()
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn put_start(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
    payload: Result<Json<Coordinate>, JsonRejection>,
) -> RouteResult<Json<ProfileSnapshot>> {
    let start = json_body(payload, &method, original_uri.path())?;
    session
        .set_start(start)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn put_end(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
    payload: Result<Json<Coordinate>, JsonRejection>,
) -> RouteResult<Json<ProfileSnapshot>> {
    let end = json_body(payload, &method, original_uri.path())?;
    session
        .set_end(end)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn post_directions(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<ActionDto>> {
    let outcome = session
        .fetch_directions()
        .await
        .map_err(|why| request_failed(why, &method, &original_uri))?;
    let profile = session
        .snapshot()
        .await
        .map_err(|why| request_failed(why, &method, &original_uri))?;

    Ok(Json(ActionDto { outcome, profile }))
}

async fn put_drawing(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
    payload: Result<Json<DrawingDto>, JsonRejection>,
) -> RouteResult<Json<ProfileSnapshot>> {
    let drawing = json_body(payload, &method, original_uri.path())?;
    session
        .set_drawing(drawing.active)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn post_drawing_event(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
    payload: Result<Json<DrawEvent>, JsonRejection>,
) -> RouteResult<Json<ProfileSnapshot>> {
    let event = json_body(payload, &method, original_uri.path())?;
    session
        .draw(event)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn put_point(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    Path(index): Path<usize>,
    State(WebState { session, .. }): State<WebState>,
    payload: Result<Json<Coordinate>, JsonRejection>,
) -> RouteResult<Json<ProfileSnapshot>> {
    let coordinate = json_body(payload, &method, original_uri.path())?;
    session
        .move_point(index, coordinate)
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn post_elevation(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<ActionDto>> {
    let outcome = session
        .fetch_elevation()
        .await
        .map_err(|why| request_failed(why, &method, &original_uri))?;
    let profile = session
        .snapshot()
        .await
        .map_err(|why| request_failed(why, &method, &original_uri))?;

    Ok(Json(ActionDto { outcome, profile }))
}

async fn get_chart(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<Vec<ChartPoint>>> {
    session
        .chart()
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

/// The elevation series as a `text/csv` download named `elevation.csv`.
async fn get_export(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<impl IntoResponse> {
    let csv = session
        .export_csv()
        .await
        .map_err(|why| request_failed(why, &method, &original_uri))?;

    Ok((
        [
            (header::CONTENT_TYPE, CSV_MIME_TYPE.to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CSV_FILE_NAME}\""),
            ),
        ],
        csv,
    ))
}

async fn post_clear(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<ProfileSnapshot>> {
    session
        .clear()
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}

async fn post_reset(
    method: Method,
    OriginalUri(original_uri): OriginalUri,
    State(WebState { session, .. }): State<WebState>,
) -> RouteResult<Json<ProfileSnapshot>> {
    session
        .reset()
        .await
        .map(Json)
        .map_err(|why| request_failed(why, &method, &original_uri))
}
