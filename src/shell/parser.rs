/// Longest line the interpreter considers, terminator included.
pub const MAX_LINE_LENGTH: usize = 2048;
/// Most argument slots per command, terminator included.
pub const MAX_ARGUMENTS: usize = 512;

/// A tokenized line, before builtin dispatch and redirection planning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub args: Vec<String>,
    pub background: bool,
}

/// Blank lines and lines starting with `#` carry no command.
pub fn is_blank_or_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Cut `line` down to what fits the line buffer, on a character boundary.
pub fn truncate_line(line: &str) -> &str {
    let limit = MAX_LINE_LENGTH - 1;
    if line.len() <= limit {
        return line;
    }

    let mut end = limit;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    log::warn!("line longer than {} bytes, truncated", limit);
    &line[..end]
}

/// Split on runs of spaces. No quoting, no escaping.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens: Vec<String> = line
        .split(' ')
        .filter(|token| !token.is_empty())
        .map(String::from)
        .collect();

    if tokens.len() > MAX_ARGUMENTS - 1 {
        log::warn!(
            "too many arguments, keeping the first {}",
            MAX_ARGUMENTS - 1
        );
        tokens.truncate(MAX_ARGUMENTS - 1);
    }
    tokens
}

/// Tokenize `line` and strip a trailing bare `&`.
///
/// Returns `None` when nothing but the marker (or nothing at all) is left.
pub fn parse(line: &str) -> Option<ParsedLine> {
    let mut args = tokenize(line);
    let background = args.last().is_some_and(|last| last == "&");
    if background {
        args.pop();
    }

    if args.is_empty() {
        None
    } else {
        Some(ParsedLine { args, background })
    }
}
