fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match messaging_menu_core::runtime::parse_cli_args(&args) {
        Ok(options) => options,
        Err(error) => {
            eprintln!("[messaging-menu] {error}");
            std::process::exit(2);
        }
    };

    if let Err(error) = messaging_menu_core::logging::init(options.verbose) {
        eprintln!("[messaging-menu] logger unavailable: {error}");
    }

    if let Err(error) = messaging_menu_core::runtime::run_with_options(options) {
        log::error!("runtime failed: {error}");
        eprintln!("[messaging-menu] runtime failed: {error}");
        std::process::exit(1);
    }
}
