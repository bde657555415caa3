//! Confirmation gate for writing the document

use std::io::{self, BufRead, Write};

/// Ask a yes/no question; `y` or `yes` (any case) confirms
///
/// End of input counts as "no".
pub fn confirm(prompt: &str, mut input: impl BufRead, mut output: impl Write) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(output)?;
        return Ok(false);
    }
    let answer = line.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}
