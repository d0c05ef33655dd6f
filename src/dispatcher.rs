use std::io::{self, Write};

use colored::Colorize;

use crate::commands::analyze::{analyze_image, compare_images};
use crate::commands::library::list_images;
use crate::config::AppConfig;
use crate::constants::{DEFAULT_ANALYZE_PROMPT, EMPTY_ANALYSIS_TEXT};
use crate::error::{Result, VisionError};
use crate::fs_utils::display_dir;
use crate::gateway::ModelGateway;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Analyze {
        image: String,
        prompt: Option<String>,
    },
    Compare {
        first: String,
        second: String,
    },
    List,
    Help,
    Quit,
}

/// What the loop should do after a line has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

enum Reply {
    Analysis { heading: &'static str, text: String },
    Images(Vec<String>),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
///
/// The keyword is the first whitespace-delimited token. For `analyze`,
/// everything after the image token is one prompt string; surrounding
/// matching quotes are removed.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (keyword, rest) = split_first_token(line);

    let command = match keyword.to_lowercase().as_str() {
        "analyze" => {
            if rest.is_empty() {
                return Err(VisionError::Usage(
                    "analyze requires an image name. Usage: analyze <image> [prompt...]"
                        .to_string(),
                ));
            }
            let (image, prompt) = split_first_token(rest);
            let prompt = strip_matching_quotes(prompt);
            Command::Analyze {
                image: image.to_string(),
                prompt: (!prompt.is_empty()).then(|| prompt.to_string()),
            }
        }
        "compare" => {
            let names: Vec<&str> = rest.split_whitespace().collect();
            match names.as_slice() {
                [first, second] => Command::Compare {
                    first: first.to_string(),
                    second: second.to_string(),
                },
                [] | [_] => {
                    return Err(VisionError::Usage(
                        "compare requires two image names. Usage: compare <image1> <image2>"
                            .to_string(),
                    ))
                }
                _ => {
                    return Err(VisionError::Usage(
                        "compare takes exactly two image names. Usage: compare <image1> <image2>"
                            .to_string(),
                    ))
                }
            }
        }
        "list" => no_arguments("list", rest, Command::List)?,
        "help" => no_arguments("help", rest, Command::Help)?,
        "quit" | "exit" => no_arguments(keyword, rest, Command::Quit)?,
        _ => {
            return Err(VisionError::Usage(format!(
                "Unknown command '{keyword}'. Type 'help' to see the available commands."
            )))
        }
    };

    Ok(Some(command))
}

fn split_first_token(text: &str) -> (&str, &str) {
    match text.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (text, ""),
    }
}

/// Strips one pair of surrounding quotes, but only when they enclose the
/// whole prompt (`"red" or "blue"` is left alone).
fn strip_matching_quotes(text: &str) -> &str {
    let text = text.trim();
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            let inner = &text[1..text.len() - 1];
            if !inner.contains(quote) {
                return inner;
            }
        }
    }
    text
}

fn no_arguments(keyword: &str, rest: &str, command: Command) -> Result<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(VisionError::Usage(format!("{keyword} takes no arguments")))
    }
}

/// Routes parsed commands to the validator, request builder and gateway,
/// then renders the result. Per-command errors are printed, never returned.
pub struct Dispatcher<G> {
    config: AppConfig,
    gateway: G,
}

impl<G: ModelGateway> Dispatcher<G> {
    pub fn new(config: AppConfig, gateway: G) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Handles one input line. Only I/O errors on `out` escape.
    pub async fn dispatch<W: Write>(&self, line: &str, out: &mut W) -> io::Result<Outcome> {
        let reply = match parse_command(line) {
            Ok(Some(command)) => self.execute(command).await,
            Ok(None) => return Ok(Outcome::Continue),
            Err(err) => Err(err),
        };

        match reply {
            Ok(reply) => self.render(reply, out),
            Err(err) => {
                tracing::debug!(error = ?err, "command failed");
                render_error(&err, out)?;
                Ok(Outcome::Continue)
            }
        }
    }

    async fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Analyze { image, prompt } => {
                let text =
                    analyze_image(&self.config, &self.gateway, &image, prompt.as_deref()).await?;
                Ok(Reply::Analysis {
                    heading: "📝 Result:",
                    text,
                })
            }
            Command::Compare { first, second } => {
                let text = compare_images(&self.config, &self.gateway, &first, &second).await?;
                Ok(Reply::Analysis {
                    heading: "🔎 Comparison Result:",
                    text,
                })
            }
            Command::List => Ok(Reply::Images(list_images(&self.config).await?)),
            Command::Help => Ok(Reply::Help),
            Command::Quit => Ok(Reply::Quit),
        }
    }

    fn render<W: Write>(&self, reply: Reply, out: &mut W) -> io::Result<Outcome> {
        match reply {
            Reply::Analysis { heading, text } => {
                writeln!(out, "{}", heading.bright_green().bold())?;
                if text.trim().is_empty() {
                    writeln!(out, "{}", EMPTY_ANALYSIS_TEXT.bright_black())?;
                } else {
                    writeln!(out, "{text}")?;
                }
                writeln!(out, "{}", "─".repeat(50).bright_black())?;
            }
            Reply::Images(names) => {
                let dir = display_dir(&self.config.image_dir);
                if names.is_empty() {
                    writeln!(out, "No images found in '{}'.", dir.display())?;
                } else {
                    writeln!(
                        out,
                        "{}",
                        format!("📷 Available images in '{}':", dir.display()).cyan()
                    )?;
                    for (index, name) in names.iter().enumerate() {
                        writeln!(out, "{:>3}. {}", index + 1, name)?;
                    }
                }
            }
            Reply::Help => write_help(&self.config, out)?,
            Reply::Quit => {
                writeln!(out, "{}", "👋 Goodbye!".bright_cyan())?;
                return Ok(Outcome::Quit);
            }
        }
        Ok(Outcome::Continue)
    }
}

fn render_error<W: Write>(err: &VisionError, out: &mut W) -> io::Result<()> {
    writeln!(out, "{} {}", "Error:".bright_red().bold(), err)
}

pub fn write_help<W: Write>(config: &AppConfig, out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "Commands:".bold())?;
    writeln!(
        out,
        "  analyze <image> [prompt...]  Describe an image (default prompt: \"{DEFAULT_ANALYZE_PROMPT}\")"
    )?;
    writeln!(out, "  compare <image1> <image2>    Describe the differences between two images")?;
    writeln!(
        out,
        "  list                         List supported images in '{}'",
        config.image_dir.display()
    )?;
    writeln!(out, "  help                         Show this message")?;
    writeln!(out, "  quit                         Exit")
}
