use anyhow::Result;
use std::io::{self, IsTerminal};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Dependencies that are chatty at debug level
const QUIET_DEPENDENCIES: &str = "hyper=warn,reqwest=warn,sqlx=warn,tower_http=info";

/// Filter directive for the given flags.
///
/// `-q` wins over everything. Otherwise RUST_LOG, when set, wins over the
/// verbosity count, which wins over the configured level.
pub fn filter_directive(verbose: u8, quiet: bool, default_level: &str) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => format!("{},{}", default_level, QUIET_DEPENDENCIES),
        1 => format!("debug,{}", QUIET_DEPENDENCIES),
        _ => "trace".to_string(),
    }
}

/// JSON lines when RUST_LOG_JSON says so, or when stdout is not a terminal
pub fn use_json(configured: bool) -> bool {
    match std::env::var("RUST_LOG_JSON") {
        Ok(v) => v == "true" || v == "1",
        Err(_) => configured || !io::stdout().is_terminal(),
    }
}

pub fn init_logging(verbose: u8, quiet: bool, default_level: &str, json: bool, log_file: Option<&Path>) -> Result<()> {
    let directive = filter_directive(verbose, quiet, default_level);
    let filter = if quiet {
        EnvFilter::new(directive)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive))
    };
    let registry = Registry::default().with(filter);

    let Some(log_path) = log_file else {
        if json {
            registry
                .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                .init();
        } else {
            registry
                .with(fmt::layer().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                .init();
        }
        return Ok(());
    };

    // Daily rotation: marquee.log becomes marquee.2024-05-01 and so on
    let log_dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir)?;
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log file name: {}", log_path.display()))?;
    let prefix = file_name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(file_name);
    let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, prefix);

    if json {
        registry
            .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(appender))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .with_writer(appender),
            )
            .init();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(3, true, "info"), "error");
        assert_eq!(filter_directive(0, false, "warn"), format!("warn,{}", QUIET_DEPENDENCIES));
        assert!(filter_directive(1, false, "info").starts_with("debug,"));
        assert_eq!(filter_directive(2, false, "info"), "trace");
    }
}
