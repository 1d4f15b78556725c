//! jsgettext - JavaScript translation catalogs from gettext MO files
//!
//! Usage: `jsgettext <locale> [config.toml]`
//!
//! Writes the catalog script for `<locale>` to stdout. Without an explicit
//! config file the usual fallback chain (project, user, built-in) is used.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use jsgettext::config::AppConfig;
use jsgettext::logging::{init_logging, LoggingConfig};
use jsgettext::render_with_config;

const USAGE: &str = "usage: jsgettext <locale> [config.toml]";

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(locale) = args.next() else {
        eprintln!("{}", USAGE);
        return ExitCode::from(2);
    };
    let config_path = args.next();

    let config = match &config_path {
        Some(path) => AppConfig::load_from_file(Path::new(path)),
        None => AppConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("jsgettext: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(&LoggingConfig::from(&config.logging));

    let rendered = match render_with_config(&config, &locale) {
        Ok(rendered) => rendered,
        Err(e) => {
            tracing::error!(error = %e, locale = %locale, "Failed to render catalog");
            eprintln!("jsgettext: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = write_script(&mut std::io::stdout().lock(), &rendered.body) {
        tracing::error!(error = %e, "Failed to write catalog");
        eprintln!("jsgettext: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn write_script<W: Write>(out: &mut W, body: &str) -> jsgettext::Result<()> {
    out.write_all(body.as_bytes())?;
    out.flush()?;
    Ok(())
}
