use async_trait::async_trait;
use llmapi::providers::gemini::{response_to_text_data, send_generate_request};
use llmapi::{LLMClient, LLMMessage, LLMMessageType};

use crate::config::AppConfig;
use crate::error::{Result, VisionError};
use crate::models::AnalysisRequest;

/// The hosted vision model, seen as a single blocking question/answer call.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Returns the model's text exactly as received.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String>;
}

/// Sends requests to Gemini's `generateContent` endpoint. No retries.
pub struct GeminiGateway {
    client: LLMClient,
}

impl GeminiGateway {
    pub fn new(config: &AppConfig) -> Self {
        let client = LLMClient::new(config.api_key(), &config.endpoint, &config.model)
            .with_timeout(config.timeout);
        Self { client }
    }
}

/// Prompt first, then the images in request order.
pub fn to_gemini_messages(request: &AnalysisRequest) -> Vec<LLMMessage> {
    let mut content = Vec::with_capacity(request.images.len() + 1);
    content.push(LLMMessageType::text(request.prompt.clone()));

    for image in &request.images {
        content.push(LLMMessageType::image_bytes(
            &image.bytes,
            image.mime_type.clone(),
        ));
    }

    vec![LLMMessage::user(content)]
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        tracing::info!(
            model = self.client.default_model(),
            images = request.images.len(),
            "calling model gateway"
        );

        let response = send_generate_request(
            &self.client,
            to_gemini_messages(request),
            Some(&request.generation),
        )
        .await
        .map_err(|err| VisionError::Gateway(format!("{err:#}")))?;

        response_to_text_data(&response).map_err(|err| VisionError::Gateway(format!("{err:#}")))
    }
}
