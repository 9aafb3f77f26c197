//! Running external programs and capturing their output.

use std::io;
use std::process::{Command, Stdio};

/// A program plus its arguments and extra environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalCommand {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
        }
    }

    /// Parse a whitespace-separated command line. No shell quoting is
    /// interpreted. Returns `None` for a blank line.
    pub fn parse(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        Some(Self {
            program,
            args: parts.collect(),
            envs: Vec::new(),
        })
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// The command as it would be typed, for logs.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a command to completion. Implementations block until the process
/// exits; there is no timeout.
pub trait CommandRunner {
    fn run(&mut self, command: &ExternalCommand) -> io::Result<CommandOutput>;
}

/// Spawns real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ExternalCommand) -> io::Result<CommandOutput> {
        log::debug!("spawning `{}`", command.display());
        let output = Command::new(&command.program)
            .args(&command.args)
            .envs(command.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .output()?;

        // Lossy decoding: a stray invalid byte must not turn a successful
        // run into a failure.
        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!(
            "`{}` exited with {:?} ({} bytes stdout, {} bytes stderr)",
            command.display(),
            result.code,
            output.stdout.len(),
            output.stderr.len()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_program_and_arguments() {
        let cmd = ExternalCommand::parse("  cargo run --bin  migrate ").unwrap();
        assert_eq!(cmd.program, "cargo");
        assert_eq!(cmd.args, vec!["run", "--bin", "migrate"]);
        assert_eq!(cmd.display(), "cargo run --bin migrate");
    }

    #[test]
    fn parse_blank_line_is_none() {
        assert!(ExternalCommand::parse("   ").is_none());
    }

    #[test]
    fn signal_termination_is_not_success() {
        let out = CommandOutput {
            code: None,
            ..Default::default()
        };
        assert!(!out.success());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_captures_streams_and_exit_code() {
        let cmd = ExternalCommand::new("sh")
            .arg("-c")
            .arg("printf out; printf err >&2; exit 3");
        let out = SystemRunner.run(&cmd).unwrap();
        assert_eq!(out.code, Some(3));
        assert_eq!(out.stdout, "out");
        assert_eq!(out.stderr, "err");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_replaces_invalid_utf8() {
        let cmd = ExternalCommand::new("sh")
            .arg("-c")
            .arg("printf 'ok \\377 done'");
        let out = SystemRunner.run(&cmd).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "ok \u{FFFD} done");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_passes_extra_environment() {
        let cmd = ExternalCommand::new("sh")
            .arg("-c")
            .arg("printf \"$ALEX_PROBE\"")
            .env("ALEX_PROBE", "visible");
        let out = SystemRunner.run(&cmd).unwrap();
        assert_eq!(out.stdout, "visible");
    }
}
