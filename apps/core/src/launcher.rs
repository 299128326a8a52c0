use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("empty command line")]
    EmptyCommand,
    #[error("unterminated quote in command line: {0}")]
    UnterminatedQuote(String),
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Starts external commands. Implementations must not wait for the child.
pub trait ProcessLauncher {
    fn spawn(&self, command_line: &str) -> Result<(), LaunchError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn spawn(&self, command_line: &str) -> Result<(), LaunchError> {
        let argv = split_command_line(command_line)?;
        let (program, args) = argv.split_first().ok_or(LaunchError::EmptyCommand)?;

        Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(drop)
            .map_err(|source| LaunchError::Spawn {
                program: program.clone(),
                source,
            })
    }
}

/// Fire-and-forget: failures are logged and reported as `false`.
pub fn try_spawn(launcher: &dyn ProcessLauncher, command_line: &str) -> bool {
    match launcher.spawn(command_line) {
        Ok(()) => {
            log::info!("spawned '{command_line}'");
            true
        }
        Err(error) => {
            log::warn!("could not spawn '{command_line}': {error}");
            false
        }
    }
}

/// Splits a command line into argv with POSIX shell quoting rules.
pub fn split_command_line(line: &str) -> Result<Vec<String>, LaunchError> {
    let argv =
        shlex::split(line).ok_or_else(|| LaunchError::UnterminatedQuote(line.to_string()))?;
    if argv.is_empty() {
        return Err(LaunchError::EmptyCommand);
    }
    Ok(argv)
}

/// Removes desktop-entry field codes (`%u`, `%F`, ...) from an `Exec` value.
/// `%%` becomes a literal `%`.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('%') => out.push('%'),
            Some(_) | None => {}
        }
    }

    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
