//! Logger setup for the command line tool
//!
//! The library only emits records through the `log` facade; the binary
//! installs `env_logger` once at startup through [`Logger::init`].

use std::fs::File;
use std::io::{self, Write};

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Installs the process-wide logger
pub struct Logger;

impl Logger {
    /// Initialize logging
    ///
    /// # Arguments
    ///
    /// * `verbose` - Log at `debug` instead of `info`
    /// * `log_file` - Write records to this file instead of stderr
    ///
    /// `RUST_LOG` takes precedence over the default level.
    pub fn init(verbose: bool, log_file: Option<&str>) -> io::Result<()> {
        let default_level = Self::default_level(verbose);
        let mut builder = Builder::from_env(Env::default().default_filter_or(default_level.as_str()));

        builder.format(|buf, record| {
            writeln!(buf, "[{} {}] {}", record.level(), record.target(), record.args())
        });

        if let Some(path) = log_file {
            let file = File::create(path)?;
            builder.target(Target::Pipe(Box::new(file)));
        }

        // A second initialization (e.g. from tests) keeps the first logger
        if builder.try_init().is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }
        Ok(())
    }

    /// Level used when `RUST_LOG` is not set
    pub fn default_level(verbose: bool) -> LevelFilter {
        if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
