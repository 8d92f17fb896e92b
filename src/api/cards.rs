use reqwest::Method;

use crate::http::{encode_path_segment, Client, Response};
use crate::types::Card;
use crate::{Error, Result};

/// Cards hold the user's balances, one currency each.
pub struct CardService<'a> {
    client: &'a Client,
}

impl<'a> CardService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list_all(&self) -> Result<(Vec<Card>, Response)> {
        let req = self.client.new_empty_request(Method::GET, "me/cards")?;
        self.client.execute(req).await
    }

    pub async fn get(&self, id: &str) -> Result<(Card, Response)> {
        let path = format!("me/cards/{}", encode_path_segment(id));
        let req = self.client.new_empty_request(Method::GET, &path)?;
        self.client.execute(req).await
    }

    /// Create a card. Only `label` and `currency` are sent.
    pub async fn add(&self, card: &Card) -> Result<(Card, Response)> {
        let payload = Card {
            label: card.label.clone(),
            currency: card.currency.clone(),
            ..Card::default()
        };
        let req = self
            .client
            .new_request(Method::POST, "me/cards", Some(&payload))?;
        self.client.execute(req).await
    }

    /// Update a card's label and, when present, its settings.
    pub async fn update(&self, card: &Card) -> Result<(Card, Response)> {
        let id = card_id(card)?;
        let payload = Card {
            label: card.label.clone(),
            settings: card.settings.clone(),
            ..Card::default()
        };
        let path = format!("me/cards/{}", encode_path_segment(id));
        let req = self
            .client
            .new_request(Method::PATCH, &path, Some(&payload))?;
        self.client.execute(req).await
    }
}

pub(crate) fn card_id(card: &Card) -> Result<&str> {
    card.id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidInput("card has no id".into()))
}
