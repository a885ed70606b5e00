//! Interactive editing support
//!
//! Opens $EDITOR on a small buffer holding an entry's mood and text.

use anyhow::{bail, Context, Result};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::process::Command;

const MOOD_PREFIX: &str = "mood:";
const BUFFER_HEADER: &str =
    "<!-- Edit the mood line and the text below. This line is ignored. -->";

/// Open content in the user's preferred editor
///
/// Uses $EDITOR, $VISUAL, or falls back to common editors.
pub fn edit_text(initial_content: &str) -> Result<String> {
    let editor = find_editor()?;

    let temp_path = env::temp_dir().join(format!("diary_edit_{}.md", std::process::id()));
    fs::write(&temp_path, initial_content)
        .with_context(|| format!("Failed to create temp file: {:?}", temp_path))?;

    let status = Command::new(&editor)
        .arg(&temp_path)
        .status()
        .with_context(|| format!("Failed to run editor: {}", editor))?;

    if !status.success() {
        let _ = fs::remove_file(&temp_path);
        bail!(
            "Editor '{}' exited with non-zero status. Check that your editor is configured correctly.",
            editor
        );
    }

    let content = fs::read_to_string(&temp_path)
        .with_context(|| format!("Failed to read edited file: {:?}", temp_path))?;
    let _ = fs::remove_file(&temp_path);

    Ok(content)
}

/// Buffer shown in the editor for an entry
pub fn entry_buffer(text: &str, mood: &str) -> String {
    format!("{}\n{} {}\n\n{}\n", BUFFER_HEADER, MOOD_PREFIX, mood, text)
}

/// Read text and mood back out of an edited buffer
///
/// A leading header line is dropped. The next line is the mood when it
/// starts with `mood:`. Everything after it, trimmed, is the text.
pub fn parse_entry_buffer(content: &str) -> (String, String) {
    let mut lines = content.lines().peekable();
    if lines.peek().map(|line| line.trim()) == Some(BUFFER_HEADER) {
        lines.next();
    }

    let mood = match lines.peek() {
        Some(first) if first.trim_start().starts_with(MOOD_PREFIX) => {
            let mood = first.trim_start()[MOOD_PREFIX.len()..].trim().to_string();
            lines.next();
            mood
        }
        _ => String::new(),
    };

    let text = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    (text, mood)
}

/// Find the user's preferred editor
fn find_editor() -> Result<String> {
    if let Ok(editor) = env::var("EDITOR") {
        if !editor.is_empty() {
            return Ok(editor);
        }
    }

    if let Ok(visual) = env::var("VISUAL") {
        if !visual.is_empty() {
            return Ok(visual);
        }
    }

    for editor in ["nano", "vim", "vi", "emacs", "notepad"] {
        if command_exists(editor) {
            return Ok(editor.to_string());
        }
    }

    bail!(
        "No editor found. Set $EDITOR environment variable.\n\
         Example: export EDITOR=nano"
    )
}

/// Check if a command exists in PATH
fn command_exists(cmd: &str) -> bool {
    Command::new("which")
        .arg(cmd)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Prompt for confirmation
///
/// Returns true if user confirms, false otherwise.
/// In non-interactive mode (no TTY), returns false.
pub fn confirm(prompt: &str) -> Result<bool> {
    if !atty::is(atty::Stream::Stdin) {
        return Ok(false);
    }

    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
