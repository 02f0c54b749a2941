use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        OriginalUri, Query, Request,
    },
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use elevation_profile::ProfileError;
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

/// Unwraps a json body, answering malformed bodies with `400 Bad Request`
/// instead of axum's plain text rejection.
pub(crate) fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    method: &Method,
    uri: &str,
) -> RouteResult<T> {
    payload.map(|Json(body)| body).map_err(|why| {
        RouteErrorResponse::new(StatusCode::BAD_REQUEST)
            .with_method(method)
            .with_uri(uri)
            .with_message("Invalid request body.")
            .with_detailed_information(why.body_text())
    })
}

/// Unwraps query parameters, answering malformed ones with a json
/// `400 Bad Request`.
pub(crate) fn query_params<T>(
    params: Result<Query<T>, QueryRejection>,
    method: &Method,
    uri: &str,
) -> RouteResult<T> {
    params.map(|Query(params)| params).map_err(|why| {
        RouteErrorResponse::new(StatusCode::BAD_REQUEST)
            .with_method(method)
            .with_uri(uri)
            .with_message("Invalid query parameters.")
            .with_detailed_information(why.body_text())
    })
}

// - Commonly used responeses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_information: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
            detailed_information: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("i dunno what happened here :/");
        self.with_message(message)
    }

    pub fn with_detailed_information(mut self, message: impl Into<String>) -> Self {
        self.detailed_information = Some(message.into());
        self
    }
}

/// Maps profile errors onto http status codes: bad input is `400`, a missing
/// route between the endpoints `404`, actions the session is not ready for
/// `409` and provider trouble `502`/`503`.
pub fn status_code(error: &ProfileError) -> StatusCode {
    match error {
        ProfileError::InvalidCoordinate(_)
        | ProfileError::EmptyRoute
        | ProfileError::PointOutOfRange { .. } => StatusCode::BAD_REQUEST,
        ProfileError::NoRouteFound => StatusCode::NOT_FOUND,
        ProfileError::NoRoute
        | ProfileError::EmptySeries
        | ProfileError::MissingEndpoint(_)
        | ProfileError::DrawingInactive => StatusCode::CONFLICT,
        ProfileError::DirectionsUnavailable(_)
        | ProfileError::UpstreamError { .. }
        | ProfileError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        ProfileError::UpstreamUnavailable(_) | ProfileError::SessionClosed => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ProfileError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<ProfileError> for RouteErrorResponse {
    fn from(value: ProfileError) -> Self {
        if value.is_upstream() {
            log::warn!("Profile request failed upstream: {value}");
        }
        Self::new(status_code(&value)).with_message(value.to_string())
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}
