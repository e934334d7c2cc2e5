//! Transactions: the record exchanged with the finance API and the pages for
//! listing, creating, editing and deleting them.
//!
//! Every change is made through the finance API. Nothing is stored locally.

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod edit_endpoint;
mod edit_page;
mod form;
mod transactions_page;
mod view;

pub use core::{
    Transaction, TransactionId, TransactionPayload, TransactionType, UNCATEGORIZED_LABEL,
    parse_date,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_new_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use edit_page::get_edit_transaction_page;
pub use transactions_page::get_transactions_page;
pub use view::filter_form;
