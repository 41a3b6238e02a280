//! Connection-check and sync-trigger tools for source integrations,
//! served over JSON-RPC.

pub mod client;
pub mod errors;
pub mod models;
pub mod server;
pub mod tools;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;
