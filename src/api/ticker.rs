use reqwest::Method;

use crate::currency::Currency;
use crate::http::{Client, Response};
use crate::types::CurrencyPair;
use crate::Result;

/// Exchange rates. These endpoints do not need an access token.
pub struct TickerService<'a> {
    client: &'a Client,
}

impl<'a> TickerService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Rates for every supported pair.
    pub async fn list_all(&self) -> Result<(Vec<CurrencyPair>, Response)> {
        let req = self.client.new_empty_request(Method::GET, "ticker")?;
        self.client.execute(req).await
    }

    /// Rates of every pair quoted against `currency`.
    pub async fn for_currency(&self, currency: Currency) -> Result<(Vec<CurrencyPair>, Response)> {
        let path = format!("ticker/{}", currency);
        let req = self.client.new_empty_request(Method::GET, &path)?;
        self.client.execute(req).await
    }
}
