use crate::config::AppConfig;
use crate::constants::{COMPARE_PROMPT, DEFAULT_ANALYZE_PROMPT};
use crate::error::Result;
use crate::fs_utils::resolve_image;
use crate::gateway::ModelGateway;
use crate::request::build_analysis_request;

/// Describes one image. A missing or blank prompt falls back to the default.
pub async fn analyze_image<G>(
    config: &AppConfig,
    gateway: &G,
    image_name: &str,
    prompt: Option<&str>,
) -> Result<String>
where
    G: ModelGateway + ?Sized,
{
    let reference = resolve_image(&config.image_dir, image_name).await?;

    let prompt = prompt
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_ANALYZE_PROMPT);

    let request = build_analysis_request(&[reference], prompt, &config.generation).await?;
    gateway.analyze(&request).await
}

/// Compares two images with the fixed comparison prompt.
///
/// Both names are validated before anything is read, so a bad second image
/// never reaches the gateway.
pub async fn compare_images<G>(
    config: &AppConfig,
    gateway: &G,
    first_name: &str,
    second_name: &str,
) -> Result<String>
where
    G: ModelGateway + ?Sized,
{
    let first = resolve_image(&config.image_dir, first_name).await?;
    let second = resolve_image(&config.image_dir, second_name).await?;

    let request = build_analysis_request(&[first, second], COMPARE_PROMPT, &config.generation).await?;
    gateway.analyze(&request).await
}
