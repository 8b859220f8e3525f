//! motbwa terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Connect to a local server, logging to ./motbwa.log
//! motbwa --port 8080
//!
//! # Remote server, verbose logs
//! MOTBWA_HOST=chat.example RUST_LOG=debug motbwa -p 443
//! ```

use clap::Parser;
use motbwa_client::ApiClient;
use motbwa_tui::{Args, Runtime, TerminalDriver, init_logging};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let server = args.server_config();
    tracing::info!(url = server.base_url(), "motbwa starting");

    let driver = TerminalDriver::new()?;
    let runtime = Runtime::new(driver, ApiClient::new(server));

    runtime.run().await?;

    tracing::info!("motbwa stopped");
    Ok(())
}
