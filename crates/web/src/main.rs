use std::sync::Arc;

use elevation_profile::{ElevationProvider, HttpElevationClient, Session};
use google_maps::{GoogleDirections, GoogleElevation, MapsApiClient, MapsApiCredentials};
use web::{start_web_server, WebConfig, WebState};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = WebConfig::from_env();

    // google maps
    let credentials =
        MapsApiCredentials::env().expect("expected google maps credentials in env.");
    let maps_client =
        || MapsApiClient::new(&credentials).expect("could not build google maps client.");
    let google_elevation: Arc<dyn ElevationProvider> =
        Arc::new(GoogleElevation::new(maps_client()));

    // session
    let session_elevation: Arc<dyn ElevationProvider> = match &config.elevation_url {
        Some(url) => {
            let client = HttpElevationClient::new(url.as_str());
            log::info!("Fetching elevation from '{}'.", client.base_url());
            Arc::new(client)
        }
        None => google_elevation.clone(),
    };
    let session = Session::spawn(
        Arc::new(GoogleDirections::new(maps_client())),
        session_elevation,
    );

    // web server
    let web_future = start_web_server(
        &config,
        WebState {
            session,
            elevation: google_elevation,
        },
    );

    if let Err(why) = web_future.await {
        log::error!("Web server stopped: {why}");
    }
}
