//! HTTP [`Backend`] implementation.

mod impls;
mod wire;

use std::time::Duration;

use derive_more::{Display, Error as StdError};
use reqwest::{header, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use smart_default::SmartDefault;
use tracerr::Traced;
use tracing as log;

use crate::{domain::user::session, infra::backend};
#[cfg(doc)]
use crate::infra::Backend;

/// [`Http`] client configuration.
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Base URL of the backend API, e.g. `https://school.example.com/api`.
    #[default("http://localhost:8000/api".to_owned())]
    pub base_url: String,

    /// Timeout of a single request.
    #[default(Duration::from_secs(30))]
    pub timeout: Duration,
}

/// [`Backend`] reachable over HTTP with a JSON API.
#[derive(Clone, Debug)]
pub struct Http {
    /// Underlying HTTP client.
    client: reqwest::Client,

    /// Base URL every endpoint path is resolved against.
    base_url: Url,
}

impl Http {
    /// Creates a new [`Http`] backend with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the [`Config::base_url`] is malformed or the client failed to
    /// initialize.
    pub fn new(conf: &Config) -> Result<Self, Traced<InitError>> {
        let mut raw = conf.base_url.trim().to_owned();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw)
            .ok()
            .filter(|u| matches!(u.scheme(), "http" | "https"))
            .ok_or_else(|| InitError::BaseUrl(conf.base_url.clone()))
            .map_err(tracerr::wrap!())?;

        let client = reqwest::Client::builder()
            .timeout(conf.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION"),
            ))
            .build()
            .map_err(tracerr::from_and_wrap!(=> InitError))?;

        Ok(Self { client, base_url })
    }

    /// Resolves the provided endpoint `path` against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, backend::Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| backend::Error::Network(e.to_string()))
    }

    /// Builds a `GET` request to the provided `path`.
    fn get(&self, path: &str) -> Result<RequestBuilder, backend::Error> {
        Ok(self.client.get(self.endpoint(path)?))
    }

    /// Builds a `POST` request to the provided `path`.
    fn post(&self, path: &str) -> Result<RequestBuilder, backend::Error> {
        Ok(self.client.post(self.endpoint(path)?))
    }

    /// Builds a `PUT` request to the provided `path`.
    fn put(&self, path: &str) -> Result<RequestBuilder, backend::Error> {
        Ok(self.client.put(self.endpoint(path)?))
    }

    /// Sends the provided `request` and decodes the payload of its response.
    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, backend::Error> {
        let (status, body) = self.send(request).await?;
        wire::decode(status, &body)
    }

    /// Sends the provided `request` ignoring the payload of its response.
    async fn acknowledge(
        &self,
        request: RequestBuilder,
    ) -> Result<(), backend::Error> {
        let (status, body) = self.send(request).await?;
        wire::acknowledge(status, &body)
    }

    /// Sends the provided `request` returning the status and body of its
    /// response.
    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<(http::StatusCode, String), backend::Error> {
        let response = request
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| backend::Error::Network(e.to_string()))?;

        let status = response.status();
        let url = response.url().path().to_owned();
        let body = response
            .text()
            .await
            .map_err(|e| backend::Error::Network(e.to_string()))?;
        log::debug!("backend responded `{status}` to `{url}`");

        Ok((status, body))
    }
}

/// Extension of a [`RequestBuilder`] with a bearer [`session::Token`].
trait BearerExt {
    /// Authorizes the request with the provided `token`.
    fn bearer(self, token: &session::Token) -> Self;
}

impl BearerExt for RequestBuilder {
    fn bearer(self, token: &session::Token) -> Self {
        self.bearer_auth(token.expose())
    }
}

/// Error of initializing an [`Http`] backend.
#[derive(Debug, Display, derive_more::From, StdError)]
pub enum InitError {
    /// Provided base URL is not an absolute HTTP(S) URL.
    #[display("Invalid backend base URL: `{_0}`")]
    #[from(ignore)]
    BaseUrl(#[error(not(source))] String),

    /// HTTP client could not be built.
    #[display("Failed to build HTTP client: {_0}")]
    Client(reqwest::Error),
}

#[cfg(test)]
mod spec {
    use super::{Config, Http};

    #[test]
    fn endpoints_resolve_under_base_path() {
        let http = Http::new(&Config {
            base_url: "https://school.example.com/api".to_owned(),
            ..Config::default()
        })
        .unwrap();

        assert_eq!(
            http.endpoint("/students/filters/options").unwrap().as_str(),
            "https://school.example.com/api/students/filters/options",
        );
        assert_eq!(
            http.endpoint("auth/login").unwrap().as_str(),
            "https://school.example.com/api/auth/login",
        );
    }

    #[test]
    fn rejects_non_http_base_url() {
        for base_url in ["", "school.example.com", "ftp://school.example.com"] {
            assert!(
                Http::new(&Config {
                    base_url: base_url.to_owned(),
                    ..Config::default()
                })
                .is_err(),
                "accepted `{base_url}`",
            );
        }
    }
}
