use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr so they never mix with model output on stdout.
///
/// `RUST_LOG` wins unless `--verbose` is given; the default level is `warn`.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("gemini_vision_lib=debug,llmapi=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
