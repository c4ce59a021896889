//! Shared finances API
//!
//! Groups of users pool money, record income and spending against a running
//! group balance, and talk in a per-group chat:
//! - Membership approval with creator / admin / user / pending / blocked roles
//! - An append-only operation ledger kept in step with each group balance
//! - PostgreSQL storage, or in-memory storage for development and tests

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
