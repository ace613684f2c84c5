// src/exec/command.rs

//! Command lines as written in `cmds = [...]` and how they reach the shell.

use std::fmt;
use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;

/// A single entry of a target's `cmds`, with its prefixes decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    /// Text handed to the shell.
    pub text: String,
    /// `@` prefix: do not echo before running.
    pub silent: bool,
    /// `-` prefix: a non-zero exit status does not fail the target.
    pub ignore_errors: bool,
}

impl CommandLine {
    /// Decode leading `@` / `-` prefixes (any order, any count) and strip
    /// the whitespace around them.
    pub fn parse(raw: &str) -> Self {
        let mut silent = false;
        let mut ignore_errors = false;
        let mut rest = raw.trim_start();

        loop {
            if let Some(stripped) = rest.strip_prefix('@') {
                silent = true;
                rest = stripped.trim_start();
            } else if let Some(stripped) = rest.strip_prefix('-') {
                ignore_errors = true;
                rest = stripped.trim_start();
            } else {
                break;
            }
        }

        Self {
            text: rest.trim_end().to_string(),
            silent,
            ignore_errors,
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Build a shell command appropriate for the platform.
///
/// stdout/stderr are inherited so the tool's own output (and failure
/// report) reaches the user unchanged.
pub fn shell_command(line: &CommandLine, working_dir: &Path) -> Command {
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&line.text);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&line.text);
        c
    };

    cmd.current_dir(working_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_line() {
        let line = CommandLine::parse("poetry lock");
        assert_eq!(line.text, "poetry lock");
        assert!(!line.silent);
        assert!(!line.ignore_errors);
    }

    #[test]
    fn prefixes_in_any_order() {
        let a = CommandLine::parse("@-rm -f coverage.xml");
        let b = CommandLine::parse("- @ rm -f coverage.xml");
        assert_eq!(a, b);
        assert!(a.silent && a.ignore_errors);
        assert_eq!(a.text, "rm -f coverage.xml");
    }

    #[test]
    fn dash_inside_the_command_is_kept() {
        let line = CommandLine::parse("@echo -n done");
        assert_eq!(line.text, "echo -n done");
        assert!(line.silent);
        assert!(!line.ignore_errors);
    }
}
