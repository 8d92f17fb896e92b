mod rate;
mod response;

pub use rate::{
    parse_rate, Rate, RateTracker, HEADER_RATE_LIMIT, HEADER_RATE_REMAINING, HEADER_RATE_RESET,
};
pub use response::{check_response, Response};

use crate::api::{AccountService, CardService, ContactService, TickerService, TransactionService};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::oauth::Terminals;
use log::{debug, info, warn};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const DEFAULT_CONTENT_TYPE: &str = "application/json";

// Bytes read from an unused body before it is released.
const DRAIN_LIMIT: usize = 512;

// Bytes of an error body kept for classification.
const ERROR_BODY_LIMIT: usize = 8 * 1024;

/// Build the underlying transport. A configured bearer token is attached to every request.
pub fn build_client(cfg: &Config) -> Result<reqwest::Client> {
    let mut default_headers = HeaderMap::new();
    if let Some(token) = cfg.token.as_deref() {
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| Error::Config("token is not a valid header value".into()))?;
        default_headers.insert(AUTHORIZATION, value);
    }
    let client = reqwest::Client::builder()
        .default_headers(default_headers)
        .timeout(Duration::from_secs(cfg.timeout_secs))
        .use_rustls_tls()
        .build()?;
    Ok(client)
}

/// Percent-encode a single path segment such as a card or transaction id.
pub fn encode_path_segment(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// A fully built API request, ready to hand to [`Client::execute`].
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// JSON-encoded body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Uphold API client.
///
/// Cheap to clone; clones share the transport and the rate snapshot, so one
/// client can serve many concurrent tasks.
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: Config,
    rate: RateTracker,
}

impl Client {
    /// Create a client with its own transport built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let http = build_client(&config)?;
        Ok(Self::with_http(http, config))
    }

    /// Create a client on top of a caller-provided transport.
    pub fn with_http(http: reqwest::Client, config: Config) -> Self {
        info!(
            "Created Uphold client; api_url={} auth_url={}",
            config.api_url, config.auth_url
        );
        Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                rate: RateTracker::new(),
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn api_url(&self) -> &Url {
        &self.inner.config.api_url
    }

    pub fn auth_url(&self) -> &Url {
        &self.inner.config.auth_url
    }

    pub fn token_url(&self) -> &Url {
        &self.inner.config.token_url
    }

    pub fn user_agent(&self) -> &str {
        &self.inner.config.user_agent
    }

    /// OAuth endpoints of this client, for handing to [`crate::oauth::configure_oauth`].
    pub fn terminals(&self, redirect_url: Option<Url>) -> Terminals {
        Terminals {
            auth_url: self.auth_url().clone(),
            token_url: self.token_url().clone(),
            redirect_url,
        }
    }

    /// Rate limit counters from the most recent completed call.
    ///
    /// With many concurrent callers this is whichever call finished last.
    pub fn rate(&self) -> Rate {
        self.inner.rate.current()
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(self)
    }

    pub fn cards(&self) -> CardService<'_> {
        CardService::new(self)
    }

    pub fn contacts(&self) -> ContactService<'_> {
        ContactService::new(self)
    }

    pub fn ticker(&self) -> TickerService<'_> {
        TickerService::new(self)
    }

    pub fn transactions(&self) -> TransactionService<'_> {
        TransactionService::new(self)
    }

    /// Build an API request.
    ///
    /// `path` is resolved against the API base URL; relative paths should not
    /// start with a slash. When `body` is given it is JSON encoded into the
    /// request body.
    pub fn new_request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Request> {
        let url = self.inner.config.api_url.join(path)?;
        let body = body.map(serde_json::to_vec).transpose()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        }
        let ua = self.user_agent();
        if !ua.is_empty() {
            let value = HeaderValue::from_str(ua)
                .map_err(|_| Error::Config(format!("invalid user agent: {ua:?}")))?;
            headers.insert(USER_AGENT, value);
        }

        Ok(Request {
            method,
            url,
            headers,
            body,
        })
    }

    /// Build a request that carries no body.
    pub fn new_empty_request(&self, method: Method, path: &str) -> Result<Request> {
        self.new_request::<()>(method, path, None)
    }

    /// Send a request and decode the JSON response into `T`.
    ///
    /// An empty (or all whitespace) success body is not an error:
    /// `T::default()` is returned. A body cut off mid-document is.
    pub async fn execute<T: DeserializeOwned + Default>(
        &self,
        req: Request,
    ) -> Result<(T, Response)> {
        let (res, envelope) = self.dispatch(req).await?;
        let bytes = res.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok((T::default(), envelope));
        }
        let value = match serde_json::from_slice::<T>(&bytes) {
            Ok(v) => v,
            Err(e) => {
                warn!("Failed to decode response from {}: {}", envelope.url(), e);
                return Err(e.into());
            }
        };
        Ok((value, envelope))
    }

    /// Send a request and copy the raw success body into `sink` without decoding.
    pub async fn execute_raw<W: Write + ?Sized>(
        &self,
        req: Request,
        sink: &mut W,
    ) -> Result<Response> {
        let (mut res, envelope) = self.dispatch(req).await?;
        while let Some(chunk) = res.chunk().await? {
            sink.write_all(&chunk)?;
        }
        Ok(envelope)
    }

    /// Send a request whose response body is not needed.
    pub async fn execute_empty(&self, req: Request) -> Result<Response> {
        let (res, envelope) = self.dispatch(req).await?;
        drain(res).await;
        Ok(envelope)
    }

    // Send, record the rate snapshot, then classify. Error bodies are consumed
    // here; on success the caller owns the body.
    async fn dispatch(&self, req: Request) -> Result<(reqwest::Response, Response)> {
        debug!("{} {}", req.method, req.url);
        let mut builder = self
            .inner
            .http
            .request(req.method, req.url)
            .headers(req.headers);
        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        let res = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Uphold request failed to send: {}", e);
                return Err(Error::Transport(e));
            }
        };

        let envelope = Response::from_reqwest(&res);
        self.inner.rate.update(envelope.rate());
        debug!("{} -> {}", envelope.url(), envelope.status());

        if envelope.status().is_success() {
            return Ok((res, envelope));
        }

        let body = read_error_body(res).await;
        let err = response::classify_error(&envelope, &body);
        warn!("Uphold API error from {}: {}", envelope.url(), err);
        Err(err)
    }
}

// Error bodies are kept up to ERROR_BODY_LIMIT bytes; a failed read keeps what arrived.
async fn read_error_body(mut res: reqwest::Response) -> Vec<u8> {
    let mut body = Vec::new();
    while body.len() < ERROR_BODY_LIMIT {
        match res.chunk().await {
            Ok(Some(chunk)) => body.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(e) => {
                warn!("Failed to read error body from {}: {}", res.url(), e);
                break;
            }
        }
    }
    body.truncate(ERROR_BODY_LIMIT);
    body
}

// Read at most DRAIN_LIMIT bytes so the connection can go back to the pool.
async fn drain(mut res: reqwest::Response) {
    let mut drained = 0usize;
    while drained < DRAIN_LIMIT {
        match res.chunk().await {
            Ok(Some(chunk)) => drained += chunk.len(),
            _ => break,
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("user_agent", &self.inner.config.user_agent)
            .field("rate", &self.rate())
            .finish()
    }
}
