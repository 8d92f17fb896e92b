use std::env;
use url::Url;

pub const LIVE_AUTH_URL: &str = "https://uphold.com/authorize/";
pub const SANDBOX_AUTH_URL: &str = "https://sandbox.uphold.com/authorize/";
pub const TOKEN_ACCESS_URL: &str = "https://api.uphold.com/oauth2/token";
pub const API_URL: &str = "https://api.uphold.com/v0/";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent`, `<product>/<version>`.
pub fn default_user_agent() -> String {
    format!("uphold-rs/{}", env!("CARGO_PKG_VERSION"))
}

/// Runtime configuration for Uphold API clients.
/// Values come from the production defaults, optionally overridden by environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub auth_url: Url,
    pub token_url: Url,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Bearer token obtained out of band through the OAuth flow.
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: parse_static(API_URL),
            auth_url: parse_static(LIVE_AUTH_URL),
            token_url: parse_static(TOKEN_ACCESS_URL),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            token: None,
        }
    }
}

impl Config {
    /// Load configuration from environment.
    ///
    /// Env vars:
    /// - UPHOLD_API_URL (default: https://api.uphold.com/v0/)
    /// - UPHOLD_AUTH_URL (default: https://uphold.com/authorize/)
    /// - UPHOLD_TOKEN_URL (default: https://api.uphold.com/oauth2/token)
    /// - UPHOLD_SANDBOX (`1` or `true` switches the auth URL to the sandbox)
    /// - UPHOLD_USER_AGENT (default: uphold-rs/<version>; empty omits the header)
    /// - UPHOLD_HTTP_TIMEOUT_SECS (default: 30)
    /// - UPHOLD_TOKEN (optional bearer token)
    pub fn from_env() -> Result<Self, url::ParseError> {
        let mut cfg = Self::default();

        if let Ok(v) = env::var("UPHOLD_API_URL") {
            cfg = cfg.with_api_url(&v)?;
        }
        if let Ok(v) = env::var("UPHOLD_AUTH_URL") {
            cfg.auth_url = Url::parse(&v)?;
        }
        if let Ok(v) = env::var("UPHOLD_TOKEN_URL") {
            cfg.token_url = Url::parse(&v)?;
        }
        let sandbox = env::var("UPHOLD_SANDBOX")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        if sandbox {
            cfg = cfg.use_sandbox();
        }
        if let Ok(v) = env::var("UPHOLD_USER_AGENT") {
            cfg.user_agent = v;
        }
        cfg.timeout_secs = env::var("UPHOLD_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        cfg.token = env::var("UPHOLD_TOKEN").ok().filter(|t| !t.is_empty());

        Ok(cfg)
    }

    /// Point the client at another API root. A trailing `/` is added when missing
    /// so relative paths extend the root instead of replacing its last segment.
    pub fn with_api_url(mut self, url: &str) -> Result<Self, url::ParseError> {
        let mut base = url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.api_url = Url::parse(&base)?;
        Ok(self)
    }

    /// Use the sandbox authorization endpoint. Only the auth URL changes.
    pub fn use_sandbox(mut self) -> Self {
        self.auth_url = parse_static(SANDBOX_AUTH_URL);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

// Only used for the compile-time constants above.
fn parse_static(s: &'static str) -> Url {
    Url::parse(s).unwrap_or_else(|e| panic!("invalid built-in URL {s}: {e}"))
}
