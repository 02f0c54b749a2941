use std::sync::Arc;

use model::{ChartPoint, Coordinate, ElevationSeries, Route};
use tokio::sync::{mpsc, oneshot};

use crate::{
    acquisition::{self, DrawEvent},
    builder::{Outcome, ProfileBuilder, ProfileSnapshot, RequestToken},
    provider::{DirectionsProvider, ElevationProvider},
    ProfileError, ProfileResult,
};

const MAILBOX_SIZE: usize = 32;

type Responder<T> = oneshot::Sender<T>;

#[derive(Debug)]
pub(crate) enum Request {
    Snapshot {
        responder: Responder<ProfileSnapshot>,
    },
    SetStart {
        coordinate: Coordinate,
        responder: Responder<ProfileSnapshot>,
    },
    SetEnd {
        coordinate: Coordinate,
        responder: Responder<ProfileSnapshot>,
    },
    FetchDirections {
        responder: Responder<ProfileResult<Outcome>>,
    },
    SetDrawing {
        active: bool,
        responder: Responder<ProfileSnapshot>,
    },
    Draw {
        event: DrawEvent,
        responder: Responder<ProfileResult<ProfileSnapshot>>,
    },
    MovePoint {
        index: usize,
        coordinate: Coordinate,
        responder: Responder<ProfileResult<ProfileSnapshot>>,
    },
    FetchElevation {
        responder: Responder<ProfileResult<Outcome>>,
    },
    Chart {
        responder: Responder<Vec<ChartPoint>>,
    },
    ExportCsv {
        responder: Responder<ProfileResult<String>>,
    },
    Clear {
        responder: Responder<ProfileSnapshot>,
    },
    Reset {
        responder: Responder<ProfileSnapshot>,
    },
    // posted back by the tasks talking to the providers
    DirectionsResolved {
        token: RequestToken,
        result: ProfileResult<Route>,
        responder: Responder<ProfileResult<Outcome>>,
    },
    ElevationResolved {
        token: RequestToken,
        result: ProfileResult<ElevationSeries>,
        responder: Responder<ProfileResult<Outcome>>,
    },
}

/// Owns the [`ProfileBuilder`] of one user session and serializes every
/// access to it through a mailbox.
///
/// Provider calls run in their own tasks and post their result back into
/// the mailbox, so the session keeps answering (e.g. a `clear`) while a
/// request is in flight. Answers are matched to the current state by their
/// request token.
pub struct Session {
    builder: ProfileBuilder,
    directions: Arc<dyn DirectionsProvider>,
    elevation: Arc<dyn ElevationProvider>,
    mailbox: mpsc::WeakSender<Request>,
}

impl Session {
    /// Starts a session task and returns a handle to talk to it. The task
    /// ends once every handle is dropped.
    pub fn spawn(
        directions: Arc<dyn DirectionsProvider>,
        elevation: Arc<dyn ElevationProvider>,
    ) -> SessionHandle {
        let (tx, mut rx) = mpsc::channel(MAILBOX_SIZE);
        let mut session = Session {
            builder: ProfileBuilder::new(),
            directions,
            elevation,
            mailbox: tx.downgrade(),
        };

        tokio::spawn(async move {
            while let Some(request) = rx.recv().await {
                session.handle(request);
            }
            log::debug!("Profile session closed.");
        });

        SessionHandle { sender: tx }
    }

    fn handle(&mut self, request: Request) {
        match request {
            Request::Snapshot { responder } => {
                respond(responder, self.builder.snapshot());
            }
            Request::SetStart {
                coordinate,
                responder,
            } => {
                self.builder.set_start(coordinate);
                respond(responder, self.builder.snapshot());
            }
            Request::SetEnd {
                coordinate,
                responder,
            } => {
                self.builder.set_end(coordinate);
                respond(responder, self.builder.snapshot());
            }
            Request::FetchDirections { responder } => self.fetch_directions(responder),
            Request::SetDrawing { active, responder } => {
                self.builder.set_drawing(active);
                respond(responder, self.builder.snapshot());
            }
            Request::Draw { event, responder } => {
                let result = self.builder.draw(event).map(|_| self.builder.snapshot());
                respond(responder, result);
            }
            Request::MovePoint {
                index,
                coordinate,
                responder,
            } => {
                let result = self
                    .builder
                    .move_point(index, coordinate)
                    .map(|_| self.builder.snapshot());
                respond(responder, result);
            }
            Request::FetchElevation { responder } => self.fetch_elevation(responder),
            Request::Chart { responder } => {
                respond(responder, self.builder.chart().to_vec());
            }
            Request::ExportCsv { responder } => {
                respond(responder, self.builder.export_csv());
            }
            Request::Clear { responder } => {
                self.builder.clear();
                respond(responder, self.builder.snapshot());
            }
            Request::Reset { responder } => {
                self.builder.reset();
                respond(responder, self.builder.snapshot());
            }
            Request::DirectionsResolved {
                token,
                result,
                responder,
            } => {
                if let Err(why) = &result {
                    log::warn!("Directions request {} failed: {why}", token.raw());
                }
                respond(responder, self.builder.apply_directions(token, result));
            }
            Request::ElevationResolved {
                token,
                result,
                responder,
            } => {
                if let Err(why) = &result {
                    log::warn!("Elevation request {} failed: {why}", token.raw());
                }
                respond(responder, self.builder.apply_elevation(token, result));
            }
        }
    }

    fn fetch_directions(&mut self, responder: Responder<ProfileResult<Outcome>>) {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return respond(responder, Err(ProfileError::SessionClosed));
        };
        let request = match self.builder.begin_directions() {
            Ok(request) => request,
            Err(why) => return respond(responder, Err(why)),
        };

        let provider = self.directions.clone();
        tokio::spawn(async move {
            let result =
                acquisition::directions(provider.as_ref(), request.start, request.end).await;
            let resolved = Request::DirectionsResolved {
                token: request.token,
                result,
                responder,
            };
            if mailbox.send(resolved).await.is_err() {
                log::debug!("Session closed before directions arrived.");
            }
        });
    }

    fn fetch_elevation(&mut self, responder: Responder<ProfileResult<Outcome>>) {
        let Some(mailbox) = self.mailbox.upgrade() else {
            return respond(responder, Err(ProfileError::SessionClosed));
        };
        let request = match self.builder.begin_elevation() {
            Ok(request) => request,
            Err(why) => return respond(responder, Err(why)),
        };

        let provider = self.elevation.clone();
        tokio::spawn(async move {
            let result = provider.fetch_elevations(&request.points).await;
            let resolved = Request::ElevationResolved {
                token: request.token,
                result,
                responder,
            };
            if mailbox.send(resolved).await.is_err() {
                log::debug!("Session closed before elevation arrived.");
            }
        });
    }
}

fn respond<T>(responder: Responder<T>, value: T) {
    if responder.send(value).is_err() {
        log::debug!("Requester went away before the session answered.");
    }
}

/// Cloneable handle to a running [`Session`].
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<Request>,
}

impl SessionHandle {
    async fn ask<T, F>(&self, make_request: F) -> ProfileResult<T>
    where
        F: FnOnce(Responder<T>) -> Request,
    {
        let (responder, response) = oneshot::channel();
        self.sender
            .send(make_request(responder))
            .await
            .map_err(|_| ProfileError::SessionClosed)?;
        response.await.map_err(|_| ProfileError::SessionClosed)
    }

    pub async fn snapshot(&self) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::Snapshot { responder }).await
    }

    pub async fn set_start(&self, coordinate: Coordinate) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::SetStart {
            coordinate,
            responder,
        })
        .await
    }

    pub async fn set_end(&self, coordinate: Coordinate) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::SetEnd {
            coordinate,
            responder,
        })
        .await
    }

    /// Requests directions between the stored endpoints and waits until the
    /// answer was applied (or discarded as stale).
    pub async fn fetch_directions(&self) -> ProfileResult<Outcome> {
        self.ask(|responder| Request::FetchDirections { responder })
            .await?
    }

    pub async fn set_drawing(&self, active: bool) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::SetDrawing { active, responder })
            .await
    }

    pub async fn draw(&self, event: DrawEvent) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::Draw { event, responder })
            .await?
    }

    pub async fn move_point(
        &self,
        index: usize,
        coordinate: Coordinate,
    ) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::MovePoint {
            index,
            coordinate,
            responder,
        })
        .await?
    }

    /// Fetches elevation for the current route and waits until the answer
    /// was applied (or discarded as stale).
    pub async fn fetch_elevation(&self) -> ProfileResult<Outcome> {
        self.ask(|responder| Request::FetchElevation { responder })
            .await?
    }

    pub async fn chart(&self) -> ProfileResult<Vec<ChartPoint>> {
        self.ask(|responder| Request::Chart { responder }).await
    }

    pub async fn export_csv(&self) -> ProfileResult<String> {
        self.ask(|responder| Request::ExportCsv { responder })
            .await?
    }

    pub async fn clear(&self) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::Clear { responder }).await
    }

    pub async fn reset(&self) -> ProfileResult<ProfileSnapshot> {
        self.ask(|responder| Request::Reset { responder }).await
    }
}
