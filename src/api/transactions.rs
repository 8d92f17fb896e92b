use reqwest::Method;
use serde::Serialize;

use super::cards::card_id;
use crate::http::{encode_path_segment, Client, Response};
use crate::types::{Card, Quote, Txn};
use crate::{Error, Result};

/// Transfers, deposits and withdrawals.
pub struct TransactionService<'a> {
    client: &'a Client,
}

#[derive(Serialize)]
struct CommitPayload<'a> {
    message: &'a str,
}

impl<'a> TransactionService<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create a transaction from `quote` on `card`.
    ///
    /// A realtime quote is committed right away (`?commit=true`); otherwise
    /// the returned transaction is pending until [`commit`](Self::commit).
    pub async fn create(&self, card: &Card, quote: &Quote) -> Result<(Txn, Response)> {
        let mut path = format!("me/cards/{}/transactions", encode_path_segment(card_id(card)?));
        if quote.realtime {
            path.push_str("?commit=true");
        }
        let req = self.client.new_request(Method::POST, &path, Some(quote))?;
        self.client.execute(req).await
    }

    /// Commit a pending transaction, attaching `message` to it.
    pub async fn commit(&self, card: &Card, txn: &Txn, message: &str) -> Result<(Txn, Response)> {
        let path = txn_action_path(card, txn, "commit")?;
        let req = self
            .client
            .new_request(Method::POST, &path, Some(&CommitPayload { message }))?;
        self.client.execute(req).await
    }

    /// Cancel a transaction that has not been claimed yet.
    pub async fn cancel(&self, card: &Card, txn: &Txn) -> Result<(Txn, Response)> {
        let path = txn_action_path(card, txn, "cancel")?;
        let req = self.client.new_empty_request(Method::POST, &path)?;
        self.client.execute(req).await
    }

    /// Send the recipient of an unclaimed transaction another reminder.
    pub async fn resend(&self, card: &Card, txn: &Txn) -> Result<(Txn, Response)> {
        let path = txn_action_path(card, txn, "resend")?;
        let req = self.client.new_empty_request(Method::POST, &path)?;
        self.client.execute(req).await
    }

    pub async fn list_for_user(&self) -> Result<(Vec<Txn>, Response)> {
        let req = self.client.new_empty_request(Method::GET, "me/transactions")?;
        self.client.execute(req).await
    }

    pub async fn list_for_card(&self, card: &Card) -> Result<(Vec<Txn>, Response)> {
        let path = format!("me/cards/{}/transactions", encode_path_segment(card_id(card)?));
        let req = self.client.new_empty_request(Method::GET, &path)?;
        self.client.execute(req).await
    }

    /// Public transaction feed of the Uphold reserve.
    pub async fn list_public(&self) -> Result<(Vec<Txn>, Response)> {
        let req = self
            .client
            .new_empty_request(Method::GET, "reserve/transactions")?;
        self.client.execute(req).await
    }
}

fn txn_action_path(card: &Card, txn: &Txn, action: &str) -> Result<String> {
    let txn_id = txn
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidInput("transaction has no id".into()))?;
    Ok(format!(
        "me/cards/{}/transactions/{}/{}",
        encode_path_segment(card_id(card)?),
        encode_path_segment(txn_id),
        action
    ))
}
