// Conditional logging macros - only active in debug builds

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use log::LevelFilter;

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        if false {
            log::debug!($($arg)*);
        }
    };
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if false {
            log::info!($($arg)*);
        }
    };
}

/// Sets up `env_logger`. `RUST_LOG` wins over `verbose`; without either,
/// only warnings are shown. Records go to `log_file` when given, stderr
/// otherwise.
///
/// # Errors
///
/// Fails if `log_file` cannot be created.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> io::Result<()> {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(default_level)
        .parse_default_env()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        });
    if let Some(path) = log_file {
        builder.target(env_logger::Target::Pipe(Box::new(File::create(path)?)));
    }
    // A logger may already be installed (tests); keep it
    let _ = builder.try_init();
    Ok(())
}
