//! Rolekeeper operator console.

#![forbid(unsafe_code)]

mod command;
mod console_config;
mod execute;
mod prompt;
mod render;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rolekeeper_application::{DirectoryAdminService, DirectoryClient};
use rolekeeper_core::{AppError, AppResult};
use rolekeeper_infrastructure::{HttpDirectoryClient, InMemoryDirectoryClient};
use tracing::{error, info};

use crate::command::{Cli, Command};
use crate::console_config::{ConsoleConfig, init_tracing};
use crate::execute::execute;
use crate::prompt::TerminalConfirmation;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing();

    match run(cli.command).await {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            error!(error = %failure, "command failed");
            eprintln!("error: {failure}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> AppResult<String> {
    let config = ConsoleConfig::load()?;

    let client: Arc<dyn DirectoryClient> = if config.demo {
        info!("using in-memory sample directory");
        Arc::new(InMemoryDirectoryClient::seeded())
    } else {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|error| {
                AppError::Internal(format!("failed to build directory http client: {error}"))
            })?;
        info!(directory_url = %config.directory_url, "using directory service");
        Arc::new(HttpDirectoryClient::new(
            http_client,
            config.directory_url.clone(),
        ))
    };

    let service = DirectoryAdminService::new(client);
    let confirmation = TerminalConfirmation::new(config.assume_yes);

    execute(&service, &confirmation, command).await
}
