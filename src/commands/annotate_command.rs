//! Zonal annotation command
//!
//! Loads a raster and a region collection, runs the statistics pipeline and
//! writes the annotated FeatureCollection to a file or stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::ArgMatches;
use log::info;

use crate::api::ZonalKit;
use crate::classifier::SchemeKind;
use crate::commands::command_traits::Command;
use crate::config::PipelineConfig;
use crate::errors::ZonalResult;

/// Command for annotating regions with raster statistics
pub struct AnnotateCommand {
    kit: ZonalKit,
    /// Output file; stdout when absent
    output: Option<PathBuf>,
}

impl AnnotateCommand {
    /// Create a new annotate command from CLI arguments and the loaded configuration
    pub fn new(args: &ArgMatches, config: PipelineConfig) -> ZonalResult<Self> {
        let kit = ZonalKit::new(config)?;
        // Fail before any work if an input is missing
        kit.config().raster_path()?;
        kit.config().regions_path()?;

        Ok(AnnotateCommand {
            kit,
            output: args.get_one::<String>("output").map(PathBuf::from),
        })
    }
}

impl Command for AnnotateCommand {
    fn execute(&self) -> ZonalResult<()> {
        let annotated = self.kit.annotate_files()?;

        let scheme = &annotated.scheme;
        match scheme.kind() {
            SchemeKind::Quantile => info!("Quantile breakpoints: {:?}", scheme.breakpoints()),
            kind => info!("Too few region means for quantiles, using {:?} breakpoints {:?}",
                          kind, scheme.breakpoints()),
        }

        match &self.output {
            Some(path) => self.kit.write_geojson(&annotated, path),
            None => {
                let document = self.kit.to_geojson(&annotated)?;
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", document)?;
                Ok(())
            },
        }
    }
}
