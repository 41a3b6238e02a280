pub mod connection;
pub mod connections;
pub mod destinations;
pub mod models;
pub mod redis;
pub mod sources;
pub mod sync_jobs;
pub mod users;

pub use connection::DbClient;
