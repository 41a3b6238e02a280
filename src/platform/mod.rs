//! Static platform metadata shared by the API handlers

pub mod auth_configs;

pub use auth_configs::Fields;
