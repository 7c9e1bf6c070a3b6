//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod annotate_command;
pub mod inspect_command;

pub use command_traits::{Command, CommandFactory};
pub use annotate_command::AnnotateCommand;
pub use inspect_command::InspectCommand;

use std::path::Path;

use clap::ArgMatches;
use log::debug;

use crate::config::PipelineConfig;
use crate::errors::ZonalResult;

/// Factory for creating command instances based on CLI arguments
///
/// Loads the configuration file when one is given and lets `--raster`,
/// `--regions` and `--progress` override it.
#[derive(Default)]
pub struct ZonalkitCommandFactory;

impl ZonalkitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        ZonalkitCommandFactory
    }

    /// Build the configuration from `--config` plus command-line overrides
    pub fn build_config(&self, args: &ArgMatches) -> ZonalResult<PipelineConfig> {
        let mut config = match args.get_one::<String>("config") {
            Some(path) => PipelineConfig::from_file(Path::new(path))?,
            None => PipelineConfig::default(),
        };

        if let Some(raster) = args.get_one::<String>("raster") {
            config.raster.path = Some(raster.into());
        }
        if let Some(regions) = args.get_one::<String>("regions") {
            config.regions.path = Some(regions.into());
        }
        if args.get_flag("progress") {
            config.show_progress = true;
        }

        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }
}

impl CommandFactory for ZonalkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> ZonalResult<Box<dyn Command>> {
        let config = self.build_config(args)?;

        if args.get_flag("inspect") {
            Ok(Box::new(InspectCommand::new(config)?))
        } else {
            Ok(Box::new(AnnotateCommand::new(args, config)?))
        }
    }
}
