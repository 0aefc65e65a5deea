//! HTTP API for Fileshelf.
//!
//! A thin axum layer over the auth and file services. Every route runs
//! behind the identity middleware, which attaches verified token claims
//! but never rejects; handlers decide what they require.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
