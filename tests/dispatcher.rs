//! Command loop behavior against a fake model gateway.

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use gemini_vision_lib::{
    AnalysisRequest, AppConfig, CliArgs, Dispatcher, ModelGateway, Outcome, Result, VisionError,
    COMPARE_PROMPT, DEFAULT_ANALYZE_PROMPT, EMPTY_ANALYSIS_TEXT,
};
use tempfile::TempDir;

struct FakeGateway {
    calls: Mutex<Vec<AnalysisRequest>>,
    reply: std::result::Result<String, String>,
}

impl FakeGateway {
    fn answering(text: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Ok(text.to_string()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Err(message.to_string()),
        }
    }

    fn calls(&self) -> Vec<AnalysisRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for FakeGateway {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        self.reply.clone().map_err(VisionError::Gateway)
    }
}

fn image_dir(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for name in files {
        fs::write(dir.path().join(name), format!("bytes of {name}")).unwrap();
    }
    dir
}

fn dispatcher(dir: &Path, gateway: FakeGateway) -> Dispatcher<FakeGateway> {
    colored::control::set_override(false);
    let args = CliArgs {
        image_dir: Some(dir.to_path_buf()),
        ..CliArgs::default()
    };
    let config = AppConfig::from_lookup(&args, |_| Some("test-key".to_string())).unwrap();
    Dispatcher::new(config, gateway)
}

async fn run(dispatcher: &Dispatcher<FakeGateway>, line: &str) -> (Outcome, String) {
    let mut out = Vec::new();
    let outcome = dispatcher.dispatch(line, &mut out).await.unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn missing_image_never_reaches_gateway() {
    let dir = image_dir(&[]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (outcome, output) = run(&dispatcher, "analyze ghost.jpg").await;

    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("Error:"), "{output}");
    assert!(output.contains("not found"), "{output}");
    assert!(dispatcher.gateway().calls().is_empty());
}

#[tokio::test]
async fn unsupported_format_is_rejected_even_when_present() {
    let dir = image_dir(&["notes.txt", "scan.BMP"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    for line in ["analyze notes.txt", "analyze scan.BMP"] {
        let (outcome, output) = run(&dispatcher, line).await;
        assert_eq!(outcome, Outcome::Continue);
        assert!(output.contains("Unsupported image format"), "{output}");
    }
    assert!(dispatcher.gateway().calls().is_empty());
}

#[tokio::test]
async fn analyze_without_prompt_uses_default() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("A tabby cat asleep."));

    let (outcome, output) = run(&dispatcher, "analyze cat.jpg").await;

    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("A tabby cat asleep."), "{output}");

    let calls = dispatcher.gateway().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, DEFAULT_ANALYZE_PROMPT);
    assert_eq!(calls[0].images.len(), 1);
    assert_eq!(calls[0].images[0].file_name, "cat.jpg");
    assert_eq!(calls[0].images[0].mime_type, "image/jpeg");
    assert_eq!(calls[0].images[0].bytes, b"bytes of cat.jpg");
    assert_eq!(calls[0].generation.temperature, 0.4);
    assert_eq!(calls[0].generation.top_p, 1.0);
    assert_eq!(calls[0].generation.top_k, 32);
}

#[tokio::test]
async fn analyze_with_prompt_passes_it_verbatim() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("It is stretching."));

    run(&dispatcher, r#"analyze cat.jpg "Describe the cat's behavior""#).await;

    let calls = dispatcher.gateway().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, "Describe the cat's behavior");
}

#[tokio::test]
async fn analyze_resolves_bare_names() {
    let dir = image_dir(&["sunset.webp"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("Orange sky."));

    run(&dispatcher, "analyze sunset").await;

    let calls = dispatcher.gateway().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].images[0].file_name, "sunset.webp");
    assert_eq!(calls[0].images[0].mime_type, "image/webp");
}

#[tokio::test]
async fn compare_needs_both_images_valid() {
    let dir = image_dir(&["a.jpg", "b.png", "notes.txt"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("They differ."));

    for line in [
        "compare a.jpg missing.png",
        "compare missing.jpg b.png",
        "compare a.jpg notes.txt",
    ] {
        let (outcome, output) = run(&dispatcher, line).await;
        assert_eq!(outcome, Outcome::Continue);
        assert!(output.contains("Error:"), "{line}: {output}");
    }
    assert!(dispatcher.gateway().calls().is_empty());

    let (_, output) = run(&dispatcher, "compare a.jpg b.png").await;
    assert!(output.contains("They differ."), "{output}");

    let calls = dispatcher.gateway().calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].prompt, COMPARE_PROMPT);
    let names: Vec<_> = calls[0].images.iter().map(|i| i.file_name.as_str()).collect();
    assert_eq!(names, ["a.jpg", "b.png"]);
}

#[tokio::test]
async fn list_shows_only_supported_images() {
    let dir = image_dir(&["a.jpg", "notes.txt", "b.PNG"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (outcome, output) = run(&dispatcher, "list").await;

    assert_eq!(outcome, Outcome::Continue);
    let entries: Vec<&str> = output
        .lines()
        .filter_map(|line| line.trim().split_once(". "))
        .map(|(_, name)| name)
        .collect();
    assert_eq!(entries, ["a.jpg", "b.PNG"]);
    assert!(!output.contains("notes.txt"));
    assert!(dispatcher.gateway().calls().is_empty());
}

#[tokio::test]
async fn list_of_empty_directory_says_so() {
    let dir = image_dir(&["readme.md"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (_, output) = run(&dispatcher, "list").await;
    assert!(output.contains("No images found"), "{output}");
}

#[tokio::test]
async fn list_of_missing_directory_is_an_error_not_a_crash() {
    let dir = image_dir(&[]);
    let dispatcher = dispatcher(&dir.path().join("absent"), FakeGateway::answering("unused"));

    let (outcome, output) = run(&dispatcher, "list").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("Unable to read"), "{output}");
}

#[tokio::test]
async fn quit_stops_without_gateway_calls() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (outcome, _) = run(&dispatcher, "quit").await;
    assert_eq!(outcome, Outcome::Quit);

    let (outcome, _) = run(&dispatcher, "exit").await;
    assert_eq!(outcome, Outcome::Quit);
    assert!(dispatcher.gateway().calls().is_empty());
}

#[tokio::test]
async fn gateway_failure_is_printed_and_loop_survives() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::failing("status 429 quota exceeded"));

    let (outcome, output) = run(&dispatcher, "analyze cat.jpg").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(
        output.contains("Gateway error: status 429 quota exceeded"),
        "{output}"
    );

    let (outcome, output) = run(&dispatcher, "list").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("cat.jpg"), "{output}");
}

#[tokio::test]
async fn usage_errors_keep_the_loop_alive() {
    let dir = image_dir(&[]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (outcome, output) = run(&dispatcher, "analyze").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("analyze requires an image name"), "{output}");

    let (outcome, output) = run(&dispatcher, "compare only-one.jpg").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("compare requires two image names"), "{output}");

    let (outcome, output) = run(&dispatcher, "paint cat.jpg").await;
    assert_eq!(outcome, Outcome::Continue);
    assert!(output.contains("Unknown command 'paint'"), "{output}");
}

#[tokio::test]
async fn blank_model_answer_renders_placeholder() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("  \n"));

    let (_, output) = run(&dispatcher, "analyze cat.jpg").await;
    assert!(output.contains(EMPTY_ANALYSIS_TEXT), "{output}");
}

#[tokio::test]
async fn model_text_is_printed_unmodified() {
    let dir = image_dir(&["cat.jpg"]);
    let answer = "**Subject:** a cat\n\n- whiskers: long\n- mood: 😼";
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering(answer));

    let (_, output) = run(&dispatcher, "analyze cat.jpg").await;
    assert!(output.contains(answer), "{output}");
}

#[tokio::test]
async fn validation_is_repeated_for_every_command() {
    let dir = image_dir(&["cat.jpg"]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("A cat."));

    run(&dispatcher, "analyze cat.jpg").await;
    fs::remove_file(dir.path().join("cat.jpg")).unwrap();
    let (_, output) = run(&dispatcher, "analyze cat.jpg").await;

    assert!(output.contains("not found"), "{output}");
    assert_eq!(dispatcher.gateway().calls().len(), 1);
}

#[tokio::test]
async fn help_lists_every_command() {
    let dir = image_dir(&[]);
    let dispatcher = dispatcher(dir.path(), FakeGateway::answering("unused"));

    let (outcome, output) = run(&dispatcher, "help").await;
    assert_eq!(outcome, Outcome::Continue);
    for keyword in ["analyze", "compare", "list", "quit"] {
        assert!(output.contains(keyword), "missing {keyword}: {output}");
    }
}
