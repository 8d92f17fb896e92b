//! Client for the Uphold REST API.
//!
//! Covers accounts, cards, contacts, tickers and transactions. Every call
//! goes through one pipeline: build a [`Request`], send it, record the rate
//! limit headers, classify the status, and decode the body.
//!
//! ```no_run
//! use uphold::{Client, Config, Currency};
//!
//! #[tokio::main]
//! async fn main() -> uphold::Result<()> {
//!     let client = Client::new(Config::from_env()?)?;
//!     let (pairs, response) = client.ticker().for_currency(Currency::USD).await?;
//!     println!("{} pairs, {} requests left", pairs.len(), response.rate().remaining);
//!     Ok(())
//! }
//! ```
//!
//! Access tokens are obtained outside this crate. [`oauth::configure_oauth`]
//! collects the settings an OAuth2 client needs; the resulting token goes
//! into [`Config::token`].

pub mod api;
pub mod config;
pub mod currency;
pub mod error;
pub mod http;
pub mod oauth;
pub mod types;

pub use config::Config;
pub use currency::Currency;
pub use error::{Block, Error, ErrorBody, ErrorResponse, FieldError, RateLimitError, Result};
pub use http::{Client, Rate, Request, Response};
