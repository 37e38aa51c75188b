//! Directive tracking: meeting action items moved through a role-gated
//! lifecycle, with an append-only progress history and reporting views.
//!
//! - [`workflow`]: the status/role action table and command application
//! - [`ledger`]: appending progress updates and comments
//! - [`query`] and [`report`]: filtered views and grouped status counts
//! - [`store`]: the canonical collection and its key-value persistence
//! - [`api`]: HTTP surface over the store

pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
pub mod query;
pub mod render;
pub mod report;
pub mod store;
pub mod workflow;
