use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::constants::SUPPORTED_EXTENSIONS;
use crate::error::{Result, VisionError};
use crate::models::{ImageFormat, ImageReference};

/// Checks that `path` is an existing regular file with a whitelisted extension.
///
/// Existence is checked first, so a missing `notes.txt` is `FileNotFound`
/// and an existing one is `UnsupportedFormat`. Nothing is cached; every call
/// hits the file system again.
pub async fn validate_image(path: &Path) -> Result<ImageReference> {
    if !is_regular_file(path).await? {
        return Err(VisionError::FileNotFound(path.to_path_buf()));
    }

    let format = ImageFormat::from_path(path)
        .ok_or_else(|| VisionError::UnsupportedFormat(path.to_path_buf()))?;

    Ok(ImageReference {
        path: path.to_path_buf(),
        format,
    })
}

/// Resolves an image name typed at the prompt against `image_dir`.
///
/// Absolute names replace the directory (`Path::join` semantics). A bare name
/// without a dot (`cat`) that fails validation is retried with each supported
/// extension in whitelist order; the first error is kept when none exists.
pub async fn resolve_image(image_dir: &Path, name: &str) -> Result<ImageReference> {
    let candidate = image_dir.join(name);

    match validate_image(&candidate).await {
        Err(err @ (VisionError::FileNotFound(_) | VisionError::UnsupportedFormat(_)))
            if !name.contains('.') =>
        {
            for extension in SUPPORTED_EXTENSIONS {
                let with_extension = image_dir.join(format!("{name}.{extension}"));
                if is_regular_file(&with_extension).await? {
                    tracing::debug!(
                        name,
                        resolved = %with_extension.display(),
                        "resolved image name by extension"
                    );
                    return validate_image(&with_extension).await;
                }
            }
            Err(err)
        }
        other => other,
    }
}

/// Names of the supported images directly inside `dir`, sorted case-insensitively.
pub async fn collect_directory_images(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|err| VisionError::io_read(dir, err))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|err| VisionError::io_read(dir, err))?
    {
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(path = %entry.path().display(), "skipping entry: {err}");
                continue;
            }
        };

        if !metadata.is_file() {
            continue;
        }

        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };

        if ImageFormat::from_path(Path::new(&file_name)).is_some() {
            names.push(file_name);
        }
    }

    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

pub fn resolve_mime_type(path: &Path, format: ImageFormat) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(format.mime_type())
        .to_string()
}

pub fn display_dir(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf())
}

async fn is_regular_file(path: &Path) -> Result<bool> {
    match fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_file()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(VisionError::io_read(path, err)),
    }
}
