//! Gateway API Server Library
//!
//! This library provides the HTTP surface of the gateway: health endpoints,
//! test endpoints and the relay routes that forward to the downstream .NET API

pub mod app;
pub mod error;
pub mod models;
pub mod router;

// Re-export the main server function
pub use app::start_server;
