use crate::config::AppConfig;
use crate::error::Result;
use crate::fs_utils::collect_directory_images;

pub async fn list_images(config: &AppConfig) -> Result<Vec<String>> {
    let images = collect_directory_images(&config.image_dir).await?;
    tracing::debug!(
        dir = %config.image_dir.display(),
        count = images.len(),
        "listed images"
    );
    Ok(images)
}
