//! Database models and types module.
//! This module contains all the database-related structs, enums, and type definitions.

mod db_models; // Core database models
mod params; // Request parameter models
mod responses; // API response models

pub use db_models::*;
pub use params::*;
pub use responses::*;
