fn main() -> std::process::ExitCode {
    gemini_vision_lib::run()
}
