//! Dashboard module
//!
//! Provides an overview page showing the totals, categories and daily
//! spending of the user's transactions as charts and tables.

mod aggregation;
mod charts;
mod handlers;
mod presentation;
mod tables;

pub use handlers::get_dashboard_page;
