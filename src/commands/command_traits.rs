//! Command pattern interfaces
//!
//! This module defines the core Command pattern interfaces
//! for the CLI application.

use crate::errors::ZonalResult;

/// Represents an executable command in the application
///
/// Command objects encapsulate the logic for a specific CLI operation,
/// allowing for separation of concerns and better testability.
pub trait Command {
    /// Execute the command
    fn execute(&self) -> ZonalResult<()>;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Create the Command selected by the parsed arguments
    fn create_command(&self, args: &clap::ArgMatches) -> ZonalResult<Box<dyn Command>>;
}
