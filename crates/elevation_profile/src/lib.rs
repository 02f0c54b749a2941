//! Turns a route (from a directions service or drawn by hand) into an
//! elevation profile: sampling, elevation lookup, chart series and CSV export.

pub mod acquisition;
pub mod builder;
pub mod elevation_client;
pub mod error;
pub mod export;
pub mod provider;
pub mod session;

pub use acquisition::DrawEvent;
pub use builder::{Outcome, Phase, ProfileBuilder, ProfileSnapshot, RequestToken};
pub use elevation_client::HttpElevationClient;
pub use error::{Endpoint, ProfileError, ProfileResult};
pub use provider::{DirectionsProvider, ElevationProvider};
pub use session::{Session, SessionHandle};
