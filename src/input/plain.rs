use std::io::{self, BufRead, Write};

use super::{LineSource, ReadOutcome};
use crate::error::ShellError;

/// Reads newline-terminated lines from any buffered reader.
pub struct PlainSource<R> {
    reader: R,
}

impl<R: BufRead> PlainSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for PlainSource<R> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes())?;
        stdout.flush()?;

        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => Ok(ReadOutcome::Eof),
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Ok(ReadOutcome::Line(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => Ok(ReadOutcome::Interrupted),
            Err(e) => Err(e.into()),
        }
    }
}
