//! API module containing route handlers and initialization logic
//!
//! This module is responsible for:
//! - Defining API routes and handlers
//! - Resolving the user a request acts as
//! - Initializing the API router
//! - Providing API documentation through the index endpoint

/// Request authentication
pub mod auth;

/// Route handlers for various API endpoints
pub mod handlers;

/// API documentation and index endpoint
pub mod index;

/// Router initialization and configuration
pub mod init;

/// Shared router state
pub mod state;

pub use init::initialize_router;
pub use state::AppState;
