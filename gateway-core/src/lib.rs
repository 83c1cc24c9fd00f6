//! Gateway Core Library
//!
//! This library provides core functionality for the gateway including:
//! - Configuration management
//! - The downstream relay client and its normalized result types

pub mod client;
pub mod config;

// Re-export commonly used types
pub use client::{
    DotNetClient, DownstreamClient, RelayError, RelayMethod, RelayRequest, RelayResult,
};
pub use config::model::{ClientConfig, Config, ServerSettings};
