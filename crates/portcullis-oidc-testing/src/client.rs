//! Flow-driving HTTP client.
//!
//! Follows 302/303 redirect chains with an isolated, inspectable cookie jar
//! and the test-environment scheme rule: any `https://` target is downgraded
//! to `http://` before following, because providers force TLS while the
//! harness runs plaintext. The walk is bounded: a misbehaving redirect loop
//! surfaces as [`FlowError::TooManyRedirects`] instead of a hung test.

use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, COOKIE, LOCATION, SET_COOKIE};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Default bound on redirect hops.
pub const DEFAULT_MAX_HOPS: usize = 16;

/// Errors from the flow client.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("redirect chain exceeded {max_hops} hops")]
    TooManyRedirects { max_hops: usize },

    #[error("redirect response missing a Location header")]
    MissingLocation,

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Downgrade an `https://` URL to `http://`; anything else passes through.
#[must_use]
pub fn downgrade_scheme(url: &str) -> String {
    match url.strip_prefix("https://") {
        Some(rest) => format!("http://{rest}"),
        None => url.to_string(),
    }
}

/// Minimal inspectable cookie jar.
///
/// Cleared cookies keep an entry with an empty value (so tests can assert
/// the clearing) but are no longer sent.
#[derive(Debug, Default)]
pub struct CookieJar {
    cookies: BTreeMap<String, String>,
}

impl CookieJar {
    fn store(&mut self, set_cookie: &str) {
        let pair = set_cookie.split(';').next().unwrap_or("");
        if let Some((name, value)) = pair.split_once('=') {
            self.cookies
                .insert(name.trim().to_string(), value.trim().to_string());
        }
    }

    /// Current value of a cookie, empty string if cleared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    fn header_value(&self) -> Option<String> {
        let parts: Vec<String> = self
            .cookies
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// A terminal (or single) response observed by the client.
#[derive(Debug)]
pub struct FlowResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl FlowResponse {
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Redirect-following client with its own cookie store.
pub struct FlowClient {
    http: Client,
    jar: CookieJar,
    max_hops: usize,
}

impl Default for FlowClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowClient {
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("failed to build HTTP client"),
            jar: CookieJar::default(),
            max_hops: DEFAULT_MAX_HOPS,
        }
    }

    #[must_use]
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Current value of a cookie, empty string if cleared.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.jar.get(name)
    }

    /// GET the URL and follow 302/303 redirects until a terminal response.
    ///
    /// A terminal response returns after a single request, so re-following
    /// an already-terminal URL is a no-op walk.
    pub async fn follow(&mut self, url: &str) -> Result<FlowResponse, FlowError> {
        let mut target = Url::parse(&downgrade_scheme(url))?;

        for _ in 0..self.max_hops {
            let response = self.send_get(target.clone()).await?;

            if response.status == StatusCode::FOUND || response.status == StatusCode::SEE_OTHER {
                let location = response.location().ok_or(FlowError::MissingLocation)?;
                target = target.join(&downgrade_scheme(location))?;
                continue;
            }

            return Ok(response);
        }

        Err(FlowError::TooManyRedirects {
            max_hops: self.max_hops,
        })
    }

    /// Single GET without following redirects.
    pub async fn get(&mut self, url: &str) -> Result<FlowResponse, FlowError> {
        let target = Url::parse(&downgrade_scheme(url))?;
        self.send_get(target).await
    }

    /// Single form POST without following redirects. The body is
    /// form-encoded exactly once; values pass through literally.
    pub async fn post_form(
        &mut self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<FlowResponse, FlowError> {
        let target = Url::parse(&downgrade_scheme(url))?;
        let mut request = self.http.post(target).form(params);
        if let Some(cookies) = self.jar.header_value() {
            request = request.header(COOKIE, cookies);
        }
        let response = request.send().await?;
        self.absorb(response).await
    }

    async fn send_get(&mut self, url: Url) -> Result<FlowResponse, FlowError> {
        let mut request = self.http.get(url);
        if let Some(cookies) = self.jar.header_value() {
            request = request.header(COOKIE, cookies);
        }
        let response = request.send().await?;
        self.absorb(response).await
    }

    async fn absorb(&mut self, response: reqwest::Response) -> Result<FlowResponse, FlowError> {
        for value in response.headers().get_all(SET_COOKIE) {
            if let Ok(set_cookie) = value.to_str() {
                self.jar.store(set_cookie);
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        Ok(FlowResponse {
            status,
            headers,
            body,
        })
    }
}
