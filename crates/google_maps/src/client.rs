use std::env;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{ApiError, ApiResult};

pub const MAPS_API_URL: &str = "https://maps.googleapis.com/maps/api";

pub const API_KEY_VAR: &str = "GOOGLE_MAPS_API_KEY";
pub const PROXY_VAR: &str = "GOOGLE_MAPS_PROXY";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapsApiCredentials {
    pub api_key: String,
    pub proxy: Option<String>,
}

impl MapsApiCredentials {
    pub fn new<S: Into<String>>(api_key: S) -> Self {
        Self {
            api_key: api_key.into(),
            proxy: None,
        }
    }

    pub fn env() -> ApiResult<Self> {
        let api_key = env::var(API_KEY_VAR)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(ApiError::MissingCredentials(API_KEY_VAR))?;
        let proxy = env::var(PROXY_VAR).ok().filter(|proxy| !proxy.is_empty());

        Ok(Self { api_key, proxy })
    }
}

/// Every Google Maps web service reports a `status` next to its payload.
pub trait ServiceStatus {
    fn status(&self) -> &str;
    fn error_message(&self) -> Option<&str>;
}

pub struct MapsApiClient {
    credentials: MapsApiCredentials,
    base_url: String,
    http: reqwest::Client,
}

impl MapsApiClient {
    pub fn new(credentials: &MapsApiCredentials) -> ApiResult<Self> {
        /* build a new http client with optional proxy */
        let http = if let Some(proxy_url) = &credentials.proxy {
            log::info!("Using proxy '{proxy_url}' for Google Maps requests.");
            reqwest::Client::builder()
                .proxy(reqwest::Proxy::all(proxy_url)?)
                .build()?
        } else {
            reqwest::Client::new()
        };

        Ok(Self {
            credentials: credentials.clone(),
            base_url: MAPS_API_URL.to_owned(),
            http,
        })
    }

    /// Points the client at another host, e.g. a local stand-in.
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        let base_url: String = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Fetch data from an endpoint using this client. Responses whose
    /// `status` is not `OK` are turned into [`ApiError::Status`].
    pub async fn get<T, Q>(&self, endpoint: &str, query: &Q) -> ApiResult<T>
    where
        T: DeserializeOwned + ServiceStatus,
        Q: Serialize + ?Sized,
    {
        log::info!("Requesting endpoint '{endpoint}'.");

        /* perform get-request */
        let url = format!("{}/{endpoint}", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", &self.credentials.api_key)])
            .send()
            .await?;

        /* parse response */
        let status_code = response.status();
        if !status_code.is_success() {
            return Err(ApiError::InvalidResponse {
                status_code,
                endpoint: endpoint.to_owned(),
                response: response.text().await.ok(),
            });
        }

        let body: T = serde_json::from_str(&response.text().await?)?;
        match body.status() {
            "OK" => Ok(body),
            status => Err(ApiError::Status {
                status: status.to_owned(),
                message: body.error_message().map(str::to_owned),
            }),
        }
    }
}
