//! The typed client for the finance REST API that stores the user's data.

mod client;
mod models;

pub use client::ApiClient;
pub use models::{HealthStatus, Page, TransactionFilter};
