//! OAuth configuration.
//!
//! The client never runs the OAuth handshake. It only assembles the settings
//! (credentials, endpoints, scopes) an external OAuth implementation needs,
//! and can render the authorization URL users are sent to.

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Application credentials issued by Uphold.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// OAuth endpoints plus the redirect target that receives the authorization code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Terminals {
    pub auth_url: Url,
    pub token_url: Url,
    pub redirect_url: Option<Url>,
}

/// OAuth scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "user:read")]
    UserRead,
    #[serde(rename = "cards:read")]
    CardsRead,
    #[serde(rename = "cards:write")]
    CardsWrite,
    #[serde(rename = "accounts:read")]
    AccountsRead,
    #[serde(rename = "contacts:read")]
    ContactsRead,
    #[serde(rename = "contacts:write")]
    ContactsWrite,
    #[serde(rename = "transactions:read")]
    TransactionsRead,
    #[serde(rename = "transactions:deposit")]
    TransactionsDeposit,
    #[serde(rename = "transactions:withdraw")]
    TransactionsWithdraw,
    #[serde(rename = "transactions:transfer:self")]
    TransactionsTransferSelf,
    #[serde(rename = "transactions:transfer:others")]
    TransactionsTransferOthers,
    #[serde(rename = "transactions:transfer:application")]
    TransactionsTransferApplication,
}

impl Permission {
    pub const ALL: [Permission; 12] = [
        Permission::UserRead,
        Permission::CardsRead,
        Permission::CardsWrite,
        Permission::AccountsRead,
        Permission::ContactsRead,
        Permission::ContactsWrite,
        Permission::TransactionsRead,
        Permission::TransactionsDeposit,
        Permission::TransactionsWithdraw,
        Permission::TransactionsTransferSelf,
        Permission::TransactionsTransferOthers,
        Permission::TransactionsTransferApplication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::UserRead => "user:read",
            Permission::CardsRead => "cards:read",
            Permission::CardsWrite => "cards:write",
            Permission::AccountsRead => "accounts:read",
            Permission::ContactsRead => "contacts:read",
            Permission::ContactsWrite => "contacts:write",
            Permission::TransactionsRead => "transactions:read",
            Permission::TransactionsDeposit => "transactions:deposit",
            Permission::TransactionsWithdraw => "transactions:withdraw",
            Permission::TransactionsTransferSelf => "transactions:transfer:self",
            Permission::TransactionsTransferOthers => "transactions:transfer:others",
            Permission::TransactionsTransferApplication => "transactions:transfer:application",
        }
    }

    /// Parse a scope string such as `cards:read`.
    pub fn from_scope(scope: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == scope)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn permissions_to_strings(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_string()).collect()
}

/// Everything an OAuth2 authorization-code client needs to talk to Uphold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: Url,
    pub token_url: Url,
    pub redirect_url: Option<Url>,
    pub scopes: Vec<String>,
}

impl OAuthConfig {
    /// URL the user visits to grant access.
    pub fn authorize_url(&self, state: &str) -> Url {
        let mut url = self.auth_url.clone();
        {
            let mut q = url.query_pairs_mut();
            q.append_pair("client_id", &self.client_id);
            q.append_pair("response_type", "code");
            if !self.scopes.is_empty() {
                q.append_pair("scope", &self.scopes.join(" "));
            }
            q.append_pair("state", state);
            if let Some(redirect) = &self.redirect_url {
                q.append_pair("redirect_uri", redirect.as_str());
            }
        }
        url
    }
}

pub fn configure_oauth(
    credential: Credential,
    terminals: Terminals,
    permissions: &[Permission],
) -> OAuthConfig {
    OAuthConfig {
        client_id: credential.client_id,
        client_secret: credential.client_secret,
        auth_url: terminals.auth_url,
        token_url: terminals.token_url,
        redirect_url: terminals.redirect_url,
        scopes: permissions_to_strings(permissions),
    }
}
