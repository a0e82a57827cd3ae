use crate::process::ProcessError;

/// One external command, ready to launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// `argv[0]` is the program name.
    pub argv: Vec<String>,
    pub background: bool,
    pub input_path: Option<String>,
    pub output_path: Option<String>,
}

impl Command {
    /// Pull the first `< path` and the first `> path` out of `args`.
    ///
    /// Later occurrences of either operator stay in the argument vector as literals.
    pub fn plan(args: Vec<String>, background: bool) -> Result<Self, ProcessError> {
        let mut argv = args;
        let input_path = take_redirection(&mut argv, "<")?;
        let output_path = take_redirection(&mut argv, ">")?;

        if argv.is_empty() {
            return Err(ProcessError::Usage("missing command".to_string()));
        }

        Ok(Command {
            argv,
            background,
            input_path,
            output_path,
        })
    }
}

fn take_redirection(argv: &mut Vec<String>, operator: &str) -> Result<Option<String>, ProcessError> {
    let Some(index) = argv.iter().position(|token| token == operator) else {
        return Ok(None);
    };

    if index + 1 >= argv.len() {
        return Err(ProcessError::Usage(format!(
            "missing path after '{}'",
            operator
        )));
    }

    let path = argv.remove(index + 1);
    argv.remove(index);
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_operators_leaves_argv_alone() {
        let cmd = Command::plan(args(&["ls", "-la"]), false).unwrap();
        assert_eq!(cmd.argv, args(&["ls", "-la"]));
        assert_eq!(cmd.input_path, None);
        assert_eq!(cmd.output_path, None);
    }

    #[test]
    fn both_operators_are_removed_preserving_order() {
        let cmd = Command::plan(
            args(&["sort", "-r", "<", "in.txt", "-u", ">", "out.txt", "-f"]),
            true,
        )
        .unwrap();
        assert_eq!(
            cmd,
            Command {
                argv: args(&["sort", "-r", "-u", "-f"]),
                background: true,
                input_path: Some("in.txt".to_string()),
                output_path: Some("out.txt".to_string()),
            }
        );
    }

    #[test]
    fn output_before_input() {
        let cmd = Command::plan(args(&["cat", ">", "b", "<", "a"]), false).unwrap();
        assert_eq!(cmd.argv, args(&["cat"]));
        assert_eq!(cmd.input_path.as_deref(), Some("a"));
        assert_eq!(cmd.output_path.as_deref(), Some("b"));
    }

    #[test]
    fn second_occurrence_is_passed_through() {
        let cmd = Command::plan(args(&["echo", ">", "x", ">", "y"]), false).unwrap();
        assert_eq!(cmd.argv, args(&["echo", ">", "y"]));
        assert_eq!(cmd.output_path.as_deref(), Some("x"));

        let cmd = Command::plan(args(&["cat", "<", "a", "<", "b"]), false).unwrap();
        assert_eq!(cmd.argv, args(&["cat", "<", "b"]));
        assert_eq!(cmd.input_path.as_deref(), Some("a"));
    }

    #[test]
    fn operators_must_match_exactly() {
        let cmd = Command::plan(args(&["echo", ">>", "x", "<in"]), false).unwrap();
        assert_eq!(cmd.argv, args(&["echo", ">>", "x", "<in"]));
        assert_eq!(cmd.input_path, None);
        assert_eq!(cmd.output_path, None);
    }

    #[test]
    fn operator_without_path_is_a_usage_error() {
        assert!(matches!(
            Command::plan(args(&["cat", "<"]), false),
            Err(ProcessError::Usage(_))
        ));
        assert!(matches!(
            Command::plan(args(&["ls", ">"]), false),
            Err(ProcessError::Usage(_))
        ));
    }

    #[test]
    fn redirection_without_program_is_a_usage_error() {
        assert!(matches!(
            Command::plan(args(&["<", "in.txt"]), false),
            Err(ProcessError::Usage(_))
        ));
    }
}
