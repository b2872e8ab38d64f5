// Interactive input - ask for one location at a time

use anyhow::{Context, Result};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "Enter a URL (type q to quit): ";
const QUIT: &str = "q";

/// Prompt until a non-blank line is entered. Returns `None` on end of
/// input or when the user types `q`.
pub fn read_location<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Option<String>> {
    loop {
        output.write_all(PROMPT.as_bytes())?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("error reading from stdin")?;
        if read == 0 {
            return Ok(None);
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if text == QUIT {
            return Ok(None);
        }
        return Ok(Some(text.to_string()));
    }
}
