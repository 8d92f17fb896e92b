//! Resource services.
//!
//! Each service is a thin wrapper over [`Client::new_request`](crate::Client::new_request)
//! and [`Client::execute`](crate::Client::execute) for one group of endpoints.
//! Every call returns the decoded value together with the response envelope.

mod accounts;
mod cards;
mod contacts;
mod ticker;
mod transactions;

pub use accounts::AccountService;
pub use cards::CardService;
pub use contacts::ContactService;
pub use ticker::TickerService;
pub use transactions::TransactionService;
