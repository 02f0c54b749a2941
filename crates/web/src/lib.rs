pub use crate::common::RouteResult;

use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use axum::{extract::FromRef, routing::get_service, Router};
use elevation_profile::{ElevationProvider, SessionHandle};
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

pub mod api;
pub mod common;

pub const BIND_ADDRESS_VAR: &str = "WEB_BIND_ADDRESS";
pub const STATIC_DIR_VAR: &str = "WEB_STATIC_DIR";
pub const ELEVATION_URL_VAR: &str = "ELEVATION_URL";

#[derive(Clone, FromRef)]
pub struct WebState {
    /// The profile session driven by the browser UI.
    pub session: SessionHandle,
    /// Backs the `/api/elevation` endpoint.
    pub elevation: Arc<dyn ElevationProvider>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WebConfig {
    pub bind_address: String,
    pub static_dir: PathBuf,
    /// Another `/elevation` service the session should use instead of
    /// talking to Google directly.
    pub elevation_url: Option<String>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_owned(),
            static_dir: PathBuf::from("./resources/www/"),
            elevation_url: None,
        }
    }
}

impl WebConfig {
    pub fn from_env() -> Self {
        let var = |name: &str| env::var(name).ok().filter(|value| !value.is_empty());
        let defaults = Self::default();

        Self {
            bind_address: var(BIND_ADDRESS_VAR).unwrap_or(defaults.bind_address),
            static_dir: var(STATIC_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            elevation_url: var(ELEVATION_URL_VAR),
        }
    }
}

/// All routes of the web server: the json api below `/api`, static files
/// for everything else.
pub fn app(state: WebState, static_dir: &Path) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(static_dir))
}

pub async fn start_web_server(config: &WebConfig, state: WebState) -> std::io::Result<()> {
    let routes = app(state, &config.static_dir);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("Listening on {}.", listener.local_addr()?);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

fn static_content_router(static_dir: &Path) -> Router {
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new(static_dir)
                .not_found_service(ServeFile::new(static_dir.join("error404.html"))),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = WebConfig::default();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.static_dir, PathBuf::from("./resources/www/"));
        assert_eq!(config.elevation_url, None);
    }
}
