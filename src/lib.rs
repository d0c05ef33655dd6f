pub mod commands;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod fs_utils;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod repl;
pub mod request;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

pub use config::{AppConfig, CliArgs};
pub use constants::{
    COMPARE_PROMPT, DEFAULT_ANALYZE_PROMPT, DEFAULT_GEMINI_ENDPOINT, DEFAULT_VISION_MODEL,
    EMPTY_ANALYSIS_TEXT, IMAGE_DIR_NAME, SUPPORTED_EXTENSIONS,
};
pub use dispatcher::{parse_command, Command, Dispatcher, Outcome};
pub use error::{Result, VisionError};
pub use gateway::{GeminiGateway, ModelGateway};
pub use models::{AnalysisRequest, ImageFormat, ImagePayload, ImageReference};
pub use request::build_analysis_request;

/// Loads configuration, then runs the interactive loop on a single thread.
pub fn run() -> ExitCode {
    // a missing .env is fine; the key may already be exported
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    logging::init(args.verbose);

    exit_status(start(&args))
}

fn start(args: &CliArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env(args)?;
    tracing::debug!(?config, "configuration loaded");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let gateway = GeminiGateway::new(&config);
    let dispatcher = Dispatcher::new(config, gateway);

    runtime.block_on(repl::run_repl(&dispatcher))?;
    Ok(())
}

/// Quitting the loop is a clean exit; anything that stops startup is a failure.
fn exit_status<E: std::fmt::Display>(result: std::result::Result<(), E>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "Error:".bright_red().bold(), err);
            ExitCode::FAILURE
        }
    }
}
