use std::io::{BufRead, Write};
use std::path::PathBuf;

use thiserror::Error;

use crate::config::{self, ConfigError};
use crate::contract::{CoreRequest, CoreResponse, MenuResponse, QueueChangedRequest};
use crate::core_service::{CoreService, ServiceError};
use crate::inventory::{ApplicationInventory, DesktopEntryInventory};
use crate::source::{FileTray, NotificationTray, TrayError};
use crate::transport;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("service error: {0}")]
    Service(#[from] ServiceError),
    #[error("tray error: {0}")]
    Tray(#[from] TrayError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Serve,
    Snapshot(PathBuf),
    PrintMenu,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub app_dirs: Vec<PathBuf>,
    pub mode: RunMode,
    pub verbose: bool,
}

pub const USAGE: &str = "usage: messaging-menu [--config <path>] [--apps-dir <dir>]... \
[--snapshot <file> | --print-menu] [--verbose]";

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let value = next_value(&mut iter, arg)?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--apps-dir" => {
                let value = next_value(&mut iter, arg)?;
                options.app_dirs.push(PathBuf::from(value));
            }
            "--snapshot" => {
                let value = next_value(&mut iter, arg)?;
                set_mode(&mut options, RunMode::Snapshot(PathBuf::from(value)))?;
            }
            "--print-menu" => set_mode(&mut options, RunMode::PrintMenu)?,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            other => return Err(format!("unknown argument '{other}'\n{USAGE}")),
        }
    }

    Ok(options)
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> Result<&'a String, String> {
    iter.next()
        .filter(|value| !value.starts_with("--"))
        .ok_or_else(|| format!("missing value for {flag}"))
}

fn set_mode(options: &mut RuntimeOptions, mode: RunMode) -> Result<(), String> {
    if options.mode != RunMode::Serve {
        return Err("--snapshot and --print-menu are mutually exclusive".to_string());
    }
    options.mode = mode;
    Ok(())
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    log::info!(
        "startup mode={:?} config_path={}",
        options.mode,
        config.config_path.display()
    );

    let inventory = build_inventory(&options.app_dirs);
    let mut service = CoreService::new(&config, inventory)?;

    let stdout = std::io::stdout();
    let mut output = stdout.lock();
    match options.mode {
        RunMode::Serve => {
            let stdin = std::io::stdin();
            let handled = serve(&mut service, stdin.lock(), &mut output)?;
            log::info!("input closed after {handled} requests");
        }
        RunMode::Snapshot(path) => {
            let response = run_snapshot(&mut service, &FileTray::new(path))?;
            writeln!(output, "{}", serde_json::to_string(&response)?)?;
        }
        RunMode::PrintMenu => {
            let menu = MenuResponse::from_indicator(service.indicator());
            writeln!(output, "{}", serde_json::to_string_pretty(&menu)?)?;
        }
    }
    Ok(())
}

fn build_inventory(app_dirs: &[PathBuf]) -> Box<dyn ApplicationInventory + Send> {
    let inventory = if app_dirs.is_empty() {
        DesktopEntryInventory::from_xdg()
    } else {
        DesktopEntryInventory::from_dirs(app_dirs)
    };
    for warning in inventory.load_warnings() {
        log::warn!("{warning}");
    }
    log::debug!("loaded {} desktop entries", inventory.len());
    Box::new(inventory)
}

/// Reads one source list from `tray` and runs a single scan. Unlike the event
/// path, tray failures are reported to the caller.
pub fn run_snapshot(
    service: &mut CoreService,
    tray: &dyn NotificationTray,
) -> Result<CoreResponse, RuntimeError> {
    let sources = tray.sources()?;
    let response =
        service.handle_command(CoreRequest::QueueChanged(QueueChangedRequest { sources }))?;
    Ok(response)
}

/// Answers one JSON request per input line until EOF. Blank lines are skipped.
/// Returns the number of requests handled.
pub fn serve<R: BufRead, W: Write>(
    service: &mut CoreService,
    input: R,
    output: &mut W,
) -> Result<usize, RuntimeError> {
    let mut handled = 0;
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let reply = transport::handle_json(service, trimmed);
        writeln!(output, "{reply}")?;
        output.flush()?;
        handled += 1;
    }
    Ok(handled)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn defaults_to_serve_mode() {
        let options = parse_cli_args(&[]).unwrap();
        assert_eq!(options, RuntimeOptions::default());
    }

    #[test]
    fn collects_repeated_apps_dirs() {
        let options =
            parse_cli_args(&args(&["--apps-dir", "/a", "--apps-dir", "/b", "--print-menu"]))
                .unwrap();
        assert_eq!(options.app_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(options.mode, RunMode::PrintMenu);
    }

    #[test]
    fn rejects_missing_value_and_conflicting_modes() {
        assert!(parse_cli_args(&args(&["--config"])).is_err());
        assert!(parse_cli_args(&args(&["--config", "--verbose"])).is_err());
        assert!(parse_cli_args(&args(&["--snapshot", "s.json", "--print-menu"])).is_err());
        assert!(parse_cli_args(&args(&["--bogus"])).is_err());
    }
}
