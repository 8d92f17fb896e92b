use reqwest::Method;

use crate::http::{encode_path_segment, Client, Response};
use crate::types::Contact;
use crate::Result;

pub struct ContactService<'a> {
    client: &'a Client,
}

impl<'a> ContactService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> Result<(Vec<Contact>, Response)> {
        let req = self.client.new_empty_request(Method::GET, "me/contacts")?;
        self.client.execute(req).await
    }

    pub async fn get(&self, id: &str) -> Result<(Contact, Response)> {
        let path = format!("me/contacts/{}", encode_path_segment(id));
        let req = self.client.new_empty_request(Method::GET, &path)?;
        self.client.execute(req).await
    }
}
