use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde_json::{Value, json};

use crate::types::{GenerationConfig, LLMClient, LLMMessage, LLMMessageType, LLMUserType};
use crate::utils::truncate_for_log;

use super::models::GeminiResponse;

const MAX_ERROR_BODY_CHARS: usize = 2000;

pub fn convert_body_parts_gemini(body_part: Vec<LLMMessageType>) -> Vec<Value> {
    body_part
        .into_iter()
        .map(|part| match part {
            LLMMessageType::TEXT(text) => json!({ "text": text }),
            LLMMessageType::IMAGE {
                data_b64,
                mime_type,
            } => json!({
                "inlineData": {
                    "mimeType": mime_type,
                    "data": data_b64
                }
            }),
        })
        .collect()
}

fn convert_messages_to_gemini_contents(messages: Vec<LLMMessage>) -> Vec<Value> {
    messages
        .into_iter()
        .map(|m| {
            let parts = convert_body_parts_gemini(m.content);
            json!({
                "role": role_to_str(m.role),
                "parts": parts
            })
        })
        .collect()
}

fn role_to_str(role: LLMUserType) -> &'static str {
    match role {
        LLMUserType::Human => "user",
        LLMUserType::AI => "model",
    }
}

pub fn build_generate_body(
    messages: Vec<LLMMessage>,
    generation_config: Option<&GenerationConfig>,
) -> Value {
    let mut body = json!({
        "contents": convert_messages_to_gemini_contents(messages)
    });
    if let Some(config) = generation_config {
        body["generationConfig"] = json!(config);
    }
    body
}

pub async fn send_generate_request(
    api_client: &LLMClient,
    messages: Vec<LLMMessage>,
    generation_config: Option<&GenerationConfig>,
) -> Result<GeminiResponse> {
    let endpoint = api_client.endpoint().trim_end_matches('/');
    let model = api_client
        .default_model()
        .strip_prefix("models/")
        .unwrap_or(api_client.default_model());
    let url = format!("{}/{}:generateContent", endpoint, model);

    let body = build_generate_body(messages, generation_config);

    tracing::debug!(%url, "sending generateContent request");

    let client = Client::new();
    let mut request = client
        .post(&url)
        .header("x-goog-api-key", api_client.api_key())
        .header("Content-Type", "application/json")
        .json(&body);
    if let Some(timeout) = api_client.timeout() {
        request = request.timeout(timeout);
    }

    let response = request.send().await.context("HTTP request failed")?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .context("Reading response body failed")?;

    if !status.is_success() {
        return Err(anyhow!(
            "Gemini generateContent failed: status {} body {}",
            status,
            truncate_for_log(&response_text, MAX_ERROR_BODY_CHARS)
        ));
    }

    let response: GeminiResponse = serde_json::from_str(&response_text).with_context(|| {
        format!(
            "Failed to decode Gemini response JSON. Raw response: {}",
            truncate_for_log(&response_text, MAX_ERROR_BODY_CHARS)
        )
    })?;

    tracing::debug!(
        candidates = response.candidates.len(),
        model_version = response.model_version.as_deref().unwrap_or("unknown"),
        "received generateContent response"
    );

    Ok(response)
}

pub fn response_to_text_data(response: &GeminiResponse) -> Result<String> {
    //get only 1 text response
    if let Some(candidate) = response.candidates.first() {
        let mut full_text = String::new();
        for part in &candidate.content.parts {
            if let Some(text) = &part.text {
                full_text.push_str(text);
            }
        }
        Ok(full_text)
    } else if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        Err(anyhow!("Prompt was blocked by Gemini: {}", reason))
    } else {
        Err(anyhow!("No candidates found"))
    }
}
