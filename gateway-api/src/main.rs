//! Gateway API Server
//!
//! Main entry point for the downstream relay gateway

use gateway_api::start_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    start_server().await?;
    Ok(())
}
