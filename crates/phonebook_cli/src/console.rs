//! Line-oriented console adapter.
//!
//! Wraps any `BufRead` / `Write` pair so the command loop can run against a
//! terminal or against in-memory buffers in tests.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `label` without a newline and reads one line of input.
    ///
    /// Returns `None` at end of input. The trailing line break is removed.
    /// Bytes that are not valid UTF-8 are replaced with `U+FFFD`, so the
    /// caller sees them as ordinary (invalid) input.
    pub fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut raw = Vec::new();
        if self.input.read_until(b'\n', &mut raw)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&raw);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    pub fn say(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "{message}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}
