//! Binary crate for the `cep-weather` service.
//!
//! This crate focuses on:
//! - Serving `GET /weather?cep=...` over HTTP
//! - Parsing CLI arguments and interactive configuration
//! - Logging setup

use clap::Parser;

mod cli;
mod logging;
mod router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.json_logs);
    cmd.run().await
}
