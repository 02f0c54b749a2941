use std::error;
use std::fmt;

use model::InvalidCoordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileError {
    InvalidCoordinate(InvalidCoordinate),
    /// The directions provider found no route between the endpoints.
    NoRouteFound,
    DirectionsUnavailable(String),
    /// The elevation provider could not be reached.
    UpstreamUnavailable(String),
    /// The elevation provider answered, but not with success.
    UpstreamError {
        status: String,
        details: Option<String>,
    },
    MalformedResponse(String),
    EmptySeries,
    /// Writing the export failed.
    Export(String),
    /// An elevation fetch or route edit was requested without a route.
    NoRoute,
    /// A route with no points can not be sampled.
    EmptyRoute,
    MissingEndpoint(Endpoint),
    DrawingInactive,
    PointOutOfRange {
        index: usize,
        len: usize,
    },
    SessionClosed,
}

pub type ProfileResult<O> = Result<O, ProfileError>;

impl ProfileError {
    /// Input and state errors are the caller's fault, everything else is
    /// caused by a collaborator.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::DirectionsUnavailable(_)
                | Self::UpstreamUnavailable(_)
                | Self::UpstreamError { .. }
                | Self::MalformedResponse(_)
        )
    }
}

impl error::Error for ProfileError {}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProfileError::InvalidCoordinate(e) => write!(f, "{e}"),
            ProfileError::NoRouteFound => {
                write!(f, "No route found between start and end.")
            }
            ProfileError::DirectionsUnavailable(why) => {
                write!(f, "Directions service unavailable: {why}")
            }
            ProfileError::UpstreamUnavailable(why) => {
                write!(f, "Elevation service unavailable: {why}")
            }
            ProfileError::UpstreamError { status, details } => match details {
                Some(details) => {
                    write!(f, "Elevation service error ({status}): {details}")
                }
                None => write!(f, "Elevation service error ({status})"),
            },
            ProfileError::MalformedResponse(why) => {
                write!(f, "Malformed elevation response: {why}")
            }
            ProfileError::EmptySeries => write!(f, "There is no elevation data to export."),
            ProfileError::Export(why) => write!(f, "Could not write export: {why}"),
            ProfileError::NoRoute => write!(f, "There is no route yet."),
            ProfileError::EmptyRoute => write!(f, "The route has no points."),
            ProfileError::MissingEndpoint(endpoint) => {
                write!(f, "The {endpoint} point has not been set.")
            }
            ProfileError::DrawingInactive => write!(f, "Drawing mode is not active."),
            ProfileError::PointOutOfRange { index, len } => {
                write!(f, "Point {index} is out of range for a route of {len} points.")
            }
            ProfileError::SessionClosed => write!(f, "The profile session has shut down."),
        }
    }
}

impl From<csv::Error> for ProfileError {
    fn from(e: csv::Error) -> Self {
        ProfileError::Export(e.to_string())
    }
}

impl From<InvalidCoordinate> for ProfileError {
    fn from(e: InvalidCoordinate) -> Self {
        ProfileError::InvalidCoordinate(e)
    }
}
