//! Terminal front end for the employee-document registry.

mod app;
mod console;
mod error;
mod render;

use std::fs::File;

use docreg_client::ClientConfig;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::app::App;
use crate::console::Console;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Ok(log_file) = File::create("docreg.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), log_file);
    }

    if let Err(e) = run().await {
        log::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    let _ = dotenvy::dotenv();
    let config = ClientConfig::from_env()?;
    log::info!("[cli] backend {} (timeout {:?})", config.api_url, config.timeout);

    App::new(Console::stdio(), &config).run().await
}
