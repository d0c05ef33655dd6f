use std::io::{self, Write};

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::constants::REPL_PROMPT;
use crate::dispatcher::{Dispatcher, Outcome};
use crate::fs_utils::display_dir;
use crate::gateway::ModelGateway;

/// Reads commands until `quit`, end of input or Ctrl-C.
///
/// Each line is handled to completion, including the model call, before the
/// next one is read.
pub async fn run_repl<G: ModelGateway>(dispatcher: &Dispatcher<G>) -> Result<(), ReadlineError> {
    print_banner(dispatcher);

    let mut rl = DefaultEditor::new()?;
    let mut stdout = io::stdout();

    loop {
        stdout.flush()?;
        match rl.readline(REPL_PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    let _ = rl.add_history_entry(trimmed);
                }

                if dispatcher.dispatch(trimmed, &mut stdout).await? == Outcome::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\n{}", "👋 Goodbye!".bright_cyan());
                break;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(())
}

fn print_banner<G: ModelGateway>(dispatcher: &Dispatcher<G>) {
    println!("{}", "🖼️  Gemini Vision Assistant".bright_cyan().bold());
    println!("Model: {}", dispatcher.config().model.bright_green());
    println!(
        "Images: {}",
        display_dir(&dispatcher.config().image_dir)
            .display()
            .to_string()
            .bright_green()
    );
    println!(
        "{}",
        "Commands: analyze <image> [prompt], compare <image1> <image2>, list, help, quit"
            .bright_black()
    );
    println!("{}", "─".repeat(50).bright_black());
}
