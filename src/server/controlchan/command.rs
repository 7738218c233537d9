//! The wire-level command shape: a case-folded name and a trimmed argument string. Individual
//! command handlers are responsible for any further parsing of `arg`.

use std::fmt;

/// A parsed FTP command line: `NAME arg...`, split on the first run of whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// Upper-cased command verb, e.g. `"RETR"`.
    pub name: String,
    /// Everything after the verb, trimmed of leading/trailing whitespace. Empty if the client
    /// sent no argument.
    pub arg: String,
}

impl Command {
    /// Splits `line` (without its trailing CRLF/LF) into a [`Command`].
    pub fn parse(line: &str) -> Command {
        let line = line.trim_end_matches(['\r', '\n']);
        match line.split_once(char::is_whitespace) {
            Some((name, rest)) => Command {
                name: name.to_ascii_uppercase(),
                arg: rest.trim().to_string(),
            },
            None => Command {
                name: line.trim().to_ascii_uppercase(),
                arg: String::new(),
            },
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.arg.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {}", self.name, self.arg)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_arg() {
        let cmd = Command::parse("retr foo/bar.txt\r\n");
        assert_eq!(cmd.name, "RETR");
        assert_eq!(cmd.arg, "foo/bar.txt");
    }

    #[test]
    fn parses_bare_command() {
        let cmd = Command::parse("NOOP\r\n");
        assert_eq!(cmd.name, "NOOP");
        assert_eq!(cmd.arg, "");
    }

    #[test]
    fn folds_case_of_name_only() {
        let cmd = Command::parse("UsEr Anonymous");
        assert_eq!(cmd.name, "USER");
        assert_eq!(cmd.arg, "Anonymous");
    }
}
