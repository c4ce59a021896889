//! Infrastructure layer - Store backends, services and process plumbing

pub(crate) mod access;
pub mod chat;
pub mod group;
pub mod ledger;
pub mod logging;
pub mod membership;
pub mod storage;
pub mod user;
