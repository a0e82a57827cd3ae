use std::borrow::Cow;

use crate::process::ProcessId;

/// Marker replaced by the interpreter's process id.
pub const PID_MARKER: &str = "$$";

pub(crate) trait ExpansionHandler {
    fn expand_line<'a>(&self, input: &'a str) -> Cow<'a, str>;
}

impl ExpansionHandler for super::Shell {
    fn expand_line<'a>(&self, input: &'a str) -> Cow<'a, str> {
        expand_pid(input, self.pid)
    }
}

/// Replace the first `$$` in `input` with `pid`. Later markers are left alone.
pub fn expand_pid(input: &str, pid: ProcessId) -> Cow<'_, str> {
    match input.find(PID_MARKER) {
        Some(pos) => {
            let rest = &input[pos + PID_MARKER.len()..];
            Cow::Owned(format!("{}{}{}", &input[..pos], pid, rest))
        }
        None => Cow::Borrowed(input),
    }
}
