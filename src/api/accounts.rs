use reqwest::Method;

use crate::http::{encode_path_segment, Client, Response};
use crate::types::Account;
use crate::Result;

/// Funding accounts linked to the user.
pub struct AccountService<'a> {
    client: &'a Client,
}

impl<'a> AccountService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> Result<(Vec<Account>, Response)> {
        let req = self.client.new_empty_request(Method::GET, "me/accounts")?;
        self.client.execute(req).await
    }

    pub async fn get(&self, id: &str) -> Result<(Account, Response)> {
        let path = format!("me/accounts/{}", encode_path_segment(id));
        let req = self.client.new_empty_request(Method::GET, &path)?;
        self.client.execute(req).await
    }
}
