use model::{ChartPoint, Coordinate, ElevationSeries, LegSummary, Route, RoutePath};
use serde::Serialize;

use crate::{
    acquisition::{DrawEvent, DrawingSession},
    error::Endpoint,
    export, ProfileError, ProfileResult,
};

/// Identifies one outstanding provider request. Tokens are handed out in
/// increasing order and a response is only applied while its token is the
/// pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Empty,
    RouteReady,
    ElevationReady,
}

/// Route and elevation data of a session. Elevation can only exist next to
/// the route it was fetched for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RouteState {
    #[default]
    Empty,
    RouteReady {
        route: Route,
    },
    ElevationReady {
        route: Route,
        series: ElevationSeries,
        chart: Vec<ChartPoint>,
    },
}

impl RouteState {
    pub fn phase(&self) -> Phase {
        match self {
            RouteState::Empty => Phase::Empty,
            RouteState::RouteReady { .. } => Phase::RouteReady,
            RouteState::ElevationReady { .. } => Phase::ElevationReady,
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteState::Empty => None,
            RouteState::RouteReady { route } | RouteState::ElevationReady { route, .. } => {
                Some(route)
            }
        }
    }

    pub fn series(&self) -> Option<&ElevationSeries> {
        match self {
            RouteState::ElevationReady { series, .. } => Some(series),
            _ => None,
        }
    }

    pub fn chart(&self) -> &[ChartPoint] {
        match self {
            RouteState::ElevationReady { chart, .. } => chart,
            _ => &[],
        }
    }

    /// Drops the route (and with it any elevation) and hands it out.
    fn take_route(&mut self) -> Option<Route> {
        match std::mem::take(self) {
            RouteState::Empty => None,
            RouteState::RouteReady { route } | RouteState::ElevationReady { route, .. } => {
                Some(route)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsRequest {
    pub token: RequestToken,
    pub start: Coordinate,
    pub end: Coordinate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElevationRequest {
    pub token: RequestToken,
    pub points: Vec<Coordinate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Applied,
    /// The response belonged to a superseded request and was dropped.
    Discarded,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub phase: Phase,
    pub drawing_active: bool,
    pub drawing_vertices: Vec<Coordinate>,
    pub start: Option<Coordinate>,
    pub end: Option<Coordinate>,
    pub route: Option<RoutePath>,
    pub distance_km: Option<f64>,
    pub summary: Option<LegSummary>,
    pub elevation: Option<ElevationSeries>,
    pub chart: Vec<ChartPoint>,
    /// Bounds of the chart's elevation axis.
    pub min_elevation: Option<f64>,
    pub max_elevation: Option<f64>,
    pub directions_pending: bool,
    pub elevation_pending: bool,
}

/// The state machine behind an elevation profile session.
///
/// Network calls are split in two: `begin_*` validates the current state
/// and returns a request value carrying a [`RequestToken`], `apply_*` feeds
/// the provider's answer back. Any route change invalidates outstanding
/// requests, so late answers can never be paired with the wrong route.
#[derive(Debug, Default)]
pub struct ProfileBuilder {
    state: RouteState,
    drawing_active: bool,
    drawing: DrawingSession,
    start: Option<Coordinate>,
    end: Option<Coordinate>,
    last_token: u64,
    pending_directions: Option<RequestToken>,
    pending_elevation: Option<RequestToken>,
}

impl ProfileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RouteState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn route(&self) -> Option<&Route> {
        self.state.route()
    }

    pub fn series(&self) -> Option<&ElevationSeries> {
        self.state.series()
    }

    pub fn chart(&self) -> &[ChartPoint] {
        self.state.chart()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing_active
    }

    pub fn drawing_vertices(&self) -> &[Coordinate] {
        self.drawing.vertices()
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.start
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.end
    }

    pub fn snapshot(&self) -> ProfileSnapshot {
        let route = self.route();
        let series = self.series();
        ProfileSnapshot {
            phase: self.phase(),
            drawing_active: self.drawing_active,
            drawing_vertices: self.drawing.vertices().to_vec(),
            start: self.start,
            end: self.end,
            route: route.map(|route| route.path.clone()),
            distance_km: route.map(|route| route.path.distance_km()),
            summary: route.and_then(|route| route.summary.clone()),
            elevation: series.cloned(),
            chart: self.chart().to_vec(),
            min_elevation: series.and_then(ElevationSeries::min_elevation),
            max_elevation: series.and_then(ElevationSeries::max_elevation),
            directions_pending: self.pending_directions.is_some(),
            elevation_pending: self.pending_elevation.is_some(),
        }
    }

    fn next_token(&mut self) -> RequestToken {
        self.last_token += 1;
        RequestToken(self.last_token)
    }

    /// Installs a freshly acquired route. Elevation of the previous route
    /// and every outstanding request die with it.
    fn replace_route(&mut self, route: Route) {
        self.pending_directions = None;
        self.pending_elevation = None;
        self.state = RouteState::RouteReady { route };
    }

    fn discard_route(&mut self) {
        self.pending_directions = None;
        self.pending_elevation = None;
        self.state.take_route();
    }

    // - endpoints -

    pub fn set_start(&mut self, coordinate: Coordinate) {
        self.start = Some(coordinate);
    }

    pub fn set_end(&mut self, coordinate: Coordinate) {
        self.end = Some(coordinate);
    }

    // - directions mode -

    /// Prepares a directions request between the stored endpoints.
    /// A previously pending directions request is superseded.
    pub fn begin_directions(&mut self) -> ProfileResult<DirectionsRequest> {
        let start = self.start.ok_or(ProfileError::MissingEndpoint(Endpoint::Start))?;
        let end = self.end.ok_or(ProfileError::MissingEndpoint(Endpoint::End))?;
        let token = self.next_token();
        self.pending_directions = Some(token);
        log::debug!("Directions request {} issued.", token.raw());
        Ok(DirectionsRequest { token, start, end })
    }

    /// Applies the answer to a directions request. On error the session is
    /// left as it was.
    pub fn apply_directions(
        &mut self,
        token: RequestToken,
        result: ProfileResult<Route>,
    ) -> ProfileResult<Outcome> {
        if self.pending_directions != Some(token) {
            log::debug!("Discarding stale directions response {}.", token.raw());
            return Ok(Outcome::Discarded);
        }
        self.pending_directions = None;

        let route = result?;
        if route.path.is_empty() {
            return Err(ProfileError::NoRouteFound);
        }
        self.replace_route(route);
        Ok(Outcome::Applied)
    }

    // - drawing mode -

    /// Turns drawing mode on or off. Turning it off drops an unfinished
    /// drawing; the current route is untouched either way.
    pub fn set_drawing(&mut self, active: bool) {
        if !active {
            self.drawing.restart();
        }
        self.drawing_active = active;
    }

    pub fn draw(&mut self, event: DrawEvent) -> ProfileResult<()> {
        if !self.drawing_active {
            return Err(ProfileError::DrawingInactive);
        }
        match event {
            DrawEvent::Vertex(vertex) => {
                if !self.drawing.is_started() {
                    // a new drawing replaces whatever route came before
                    self.discard_route();
                }
                self.drawing.push(vertex);
            }
            DrawEvent::Restart => self.drawing.restart(),
            DrawEvent::Complete => {
                let route = self.drawing.finish()?;
                self.replace_route(route);
            }
        }
        Ok(())
    }

    // - editing -

    /// Moves a single route point. This is a route change, so fetched
    /// elevation is dropped.
    pub fn move_point(&mut self, index: usize, coordinate: Coordinate) -> ProfileResult<()> {
        let mut route = self.route().cloned().ok_or(ProfileError::NoRoute)?;
        let len = route.path.len();
        route
            .path
            .replace(index, coordinate)
            .ok_or(ProfileError::PointOutOfRange { index, len })?;
        self.replace_route(route);
        Ok(())
    }

    // - elevation -

    /// Prepares an elevation request for every point of the current route.
    pub fn begin_elevation(&mut self) -> ProfileResult<ElevationRequest> {
        let route = self.route().ok_or(ProfileError::NoRoute)?;
        if route.path.is_empty() {
            return Err(ProfileError::EmptyRoute);
        }
        let points = route.path.points().to_vec();
        let token = self.next_token();
        self.pending_elevation = Some(token);
        log::debug!(
            "Elevation request {} issued for {} points.",
            token.raw(),
            points.len()
        );
        Ok(ElevationRequest { token, points })
    }

    /// Applies the answer to an elevation request. On error the state is
    /// left as it was: the route stays, and so does elevation fetched for it
    /// earlier.
    pub fn apply_elevation(
        &mut self,
        token: RequestToken,
        result: ProfileResult<ElevationSeries>,
    ) -> ProfileResult<Outcome> {
        if self.pending_elevation != Some(token) {
            log::debug!("Discarding stale elevation response {}.", token.raw());
            return Ok(Outcome::Discarded);
        }
        self.pending_elevation = None;

        let series = result?;
        let route = self.route().ok_or(ProfileError::NoRoute)?;

        let aligned = series.len() == route.path.len()
            && series
                .samples()
                .iter()
                .zip(route.path.points())
                .all(|(sample, point)| sample.location == *point);
        if !aligned {
            return Err(ProfileError::MalformedResponse(format!(
                "{} samples do not match the {} route points",
                series.len(),
                route.path.len()
            )));
        }

        let route = self.state.take_route().ok_or(ProfileError::NoRoute)?;
        let chart = series.chart();
        self.state = RouteState::ElevationReady {
            route,
            series,
            chart,
        };
        Ok(Outcome::Applied)
    }

    // - export -

    pub fn export_csv(&self) -> ProfileResult<String> {
        let series = self.series().ok_or(ProfileError::EmptySeries)?;
        export::to_csv(series)
    }

    // - reset -

    /// Drops route, elevation, chart, an unfinished drawing and all
    /// outstanding requests. Endpoints and the drawing toggle survive.
    pub fn clear(&mut self) {
        self.discard_route();
        self.drawing.restart();
    }

    /// Like [`ProfileBuilder::clear`], but also forgets the endpoints and
    /// leaves drawing mode.
    pub fn reset(&mut self) {
        self.clear();
        self.start = None;
        self.end = None;
        self.drawing_active = false;
    }
}
