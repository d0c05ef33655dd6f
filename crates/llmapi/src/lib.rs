pub mod providers;
pub mod types;
pub mod utils;

pub use providers::gemini::{response_to_text_data, send_generate_request};
pub use types::{GenerationConfig, LLMClient, LLMMessage, LLMMessageType, LLMUserType};
