//! Raster inspection command

use crate::api::ZonalKit;
use crate::commands::command_traits::Command;
use crate::config::PipelineConfig;
use crate::errors::ZonalResult;

/// Prints the raster's size, georeferencing, frame, no-data value and value range
pub struct InspectCommand {
    kit: ZonalKit,
}

impl InspectCommand {
    pub fn new(config: PipelineConfig) -> ZonalResult<Self> {
        let kit = ZonalKit::new(config)?;
        kit.config().raster_path()?;
        Ok(InspectCommand { kit })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> ZonalResult<()> {
        print!("{}", self.kit.inspect()?);
        Ok(())
    }
}
