pub const DEFAULT_VISION_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const IMAGE_DIR_NAME: &str = "images";
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

pub const DEFAULT_ANALYZE_PROMPT: &str = "Describe this image in detail.";
pub const COMPARE_PROMPT: &str = "Compare these two images and describe their differences.";
pub const EMPTY_ANALYSIS_TEXT: &str = "No analysis generated.";

pub const REPL_PROMPT: &str = "vision> ";
