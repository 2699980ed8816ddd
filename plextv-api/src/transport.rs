use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, redirect};
use std::time::Duration;
use url::Url;

use crate::error::PlexTvError;

const CONNECT_TIMEOUT_SECS: u64 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_REDIRECTS: usize = 10;

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_ACCEPT: &str = "application/json,text/json;q=0.5,application/xml,application/xhtml+xml,text/xml;q=0.4,text/html,text/plain,*/*;q=0.1";

/// A single outbound request: method, fully built URL, optional form fields
/// and extra headers merged over the transport defaults.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: Url,
    pub form: Option<Vec<(String, String)>>,
    pub headers: Vec<(String, String)>,
}

impl TransportRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            form: None,
            headers: Vec::new(),
        }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.form = Some(fields);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Issues exactly one HTTP request. Implementations never retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, PlexTvError>;
}

/// reqwest-backed transport with a fixed policy shared by every call.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, PlexTvError> {
        Self::with_user_agent(DEFAULT_USER_AGENT)
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, PlexTvError> {
        let mut headers = HeaderMap::new();
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::CONNECTION, HeaderValue::from_static("close"));
        // 0-100 MiB
        headers.insert(header::RANGE, HeaderValue::from_static("bytes=0-104857600"));
        headers.insert(header::ACCEPT, HeaderValue::from_static(DEFAULT_ACCEPT));

        let http_client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .redirect(redirect::Policy::none())
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { http_client })
    }

    fn build(&self, method: Method, url: Url, request: &TransportRequest) -> RequestBuilder {
        // Request headers take precedence over the client defaults
        let mut builder = self.http_client.request(method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(fields) = &request.form {
            builder = builder.form(fields);
        }
        builder
    }
}

fn redirect_target(response: &Response) -> Option<String> {
    if !response.status().is_redirection() {
        return None;
    }
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, PlexTvError> {
        tracing::debug!(method = %request.method, path = request.url.path(), "Sending request");

        // Method and form are kept across redirects
        let mut url = request.url.clone();
        let mut hops = 0;
        let response = loop {
            let response = self
                .build(request.method.clone(), url.clone(), &request)
                .send()
                .await?;

            let Some(location) = redirect_target(&response) else {
                break response;
            };
            if hops == MAX_REDIRECTS {
                tracing::warn!(hops, "Redirect limit reached");
                return Err(PlexTvError::TooManyRedirects(MAX_REDIRECTS));
            }
            url = url.join(&location)?;
            hops += 1;
            tracing::debug!(hops, path = url.path(), "Following redirect");
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.bytes().await?.to_vec();

        tracing::debug!(status, bytes = body.len(), "Received response");

        Ok(TransportResponse {
            status,
            body,
            content_type,
        })
    }
}
