//! Output handling for CLI
//!
//! Run reports go to stdout as pretty-printed JSON; plain lines cover
//! the human-readable listings. Structured log events never pass
//! through here.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a pretty-printed JSON value to stdout
pub fn write_json_pretty(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}

/// Write a plain line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;

    Ok(())
}
