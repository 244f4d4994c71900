//! Reading snippet text from a file or stdin.

use std::io::Read;

use anyhow::Context;

/// Read the snippet named on the command line; `-` means stdin.
pub fn read(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read snippet from stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(source).with_context(|| format!("Snippet not found: {source}"))
}
