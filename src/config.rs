use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use llmapi::GenerationConfig;
use secrecy::{ExposeSecret, SecretString};

use crate::constants::{API_KEY_ENV, DEFAULT_GEMINI_ENDPOINT, DEFAULT_VISION_MODEL, IMAGE_DIR_NAME};
use crate::error::{Result, VisionError};

/// Command line options. Every option can also be set through its env var.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "gemini-vision",
    version,
    about = "Describe and compare local images with a Gemini vision model"
)]
pub struct CliArgs {
    /// Directory that image names are resolved against
    #[arg(long, env = "GEMINI_VISION_IMAGE_DIR")]
    pub image_dir: Option<PathBuf>,

    /// Gemini model name
    #[arg(long, env = "GEMINI_MODEL")]
    pub model: Option<String>,

    /// Base URL of the generateContent endpoint
    #[arg(long, env = "GEMINI_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds; by default a request waits indefinitely
    #[arg(long, env = "GEMINI_TIMEOUT_SECS")]
    pub timeout: Option<u64>,

    /// Log request details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Immutable settings built once at startup and shared by the dispatcher and gateway.
#[derive(Debug)]
pub struct AppConfig {
    pub api_key: SecretString,
    pub model: String,
    pub endpoint: String,
    pub image_dir: PathBuf,
    pub timeout: Option<Duration>,
    pub generation: GenerationConfig,
}

impl AppConfig {
    pub fn from_env(args: &CliArgs) -> Result<Self> {
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    /// Builds the config from CLI options plus a variable lookup.
    pub fn from_lookup<F>(args: &CliArgs, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                VisionError::Config(format!(
                    "{API_KEY_ENV} is not set. Export it or add it to a .env file."
                ))
            })?;

        let model = non_blank(args.model.as_deref())
            .unwrap_or(DEFAULT_VISION_MODEL)
            .to_string();
        let endpoint = non_blank(args.endpoint.as_deref())
            .unwrap_or(DEFAULT_GEMINI_ENDPOINT)
            .to_string();

        let timeout = match args.timeout {
            Some(0) => {
                return Err(VisionError::Config(
                    "timeout must be greater than zero seconds".to_string(),
                ))
            }
            other => other.map(Duration::from_secs),
        };

        Ok(Self {
            api_key: SecretString::from(api_key),
            model,
            endpoint,
            image_dir: args
                .image_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(IMAGE_DIR_NAME)),
            timeout,
            generation: GenerationConfig::default(),
        })
    }

    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
