use std::sync::OnceLock;

pub const DEFAULT_FILTER: &str = "messaging_menu_core=info";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Installs the stderr logger. `RUST_LOG` overrides the default filter; `verbose`
/// raises the crate to debug.
pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ if verbose => "messaging_menu_core=debug".to_string(),
        _ => DEFAULT_FILTER.to_string(),
    };

    pretty_env_logger::formatted_builder()
        .parse_filters(&filter)
        .try_init()?;

    install_panic_hook();
    Ok(())
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            log::error!("panic at {location}: {payload}");
            prior(panic_info);
        }));
    });
}
