use llmapi::GenerationConfig;
use serde::Serialize;
use tokio::fs;

use crate::error::{Result, VisionError};
use crate::fs_utils::resolve_mime_type;
use crate::models::{AnalysisRequest, ImagePayload, ImageReference};

/// Reads every referenced image into memory and pairs them with the prompt.
///
/// Images keep the order they were given in. The file is opened and closed
/// inside `fs::read`, so a failed read leaves no handle behind.
pub async fn build_analysis_request(
    images: &[ImageReference],
    prompt: &str,
    generation: &GenerationConfig,
) -> Result<AnalysisRequest> {
    let mut payloads = Vec::with_capacity(images.len());

    for image in images {
        let bytes = fs::read(image.path())
            .await
            .map_err(|err| VisionError::io_read(image.path(), err))?;

        payloads.push(ImagePayload {
            file_name: image.file_name(),
            mime_type: resolve_mime_type(image.path(), image.format()),
            bytes,
        });
    }

    let request = AnalysisRequest {
        prompt: prompt.to_string(),
        images: payloads,
        generation: generation.clone(),
    };
    log_request_summary(&request);

    Ok(request)
}

fn log_request_summary(request: &AnalysisRequest) {
    #[derive(Serialize)]
    struct DebugImage<'a> {
        file_name: &'a str,
        mime_type: &'a str,
        byte_length: usize,
    }

    #[derive(Serialize)]
    struct DebugRequest<'a> {
        prompt: &'a str,
        images: Vec<DebugImage<'a>>,
        generation: &'a GenerationConfig,
    }

    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let summary = DebugRequest {
        prompt: &request.prompt,
        images: request
            .images
            .iter()
            .map(|image| DebugImage {
                file_name: &image.file_name,
                mime_type: &image.mime_type,
                byte_length: image.bytes.len(),
            })
            .collect(),
        generation: &request.generation,
    };

    match serde_json::to_string(&summary) {
        Ok(json) => tracing::debug!(request = %json, "built analysis request"),
        Err(err) => tracing::warn!("failed to serialise request summary: {err}"),
    }
}
