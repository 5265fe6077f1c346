//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::process;

use landtiler::assembler::AssemblyError;
use landtiler::config::ConfigFileError;
use landtiler::export::ExportError;
use landtiler::provider::FetchError;
use landtiler::GridError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Missing or conflicting settings
    Config(String),
    /// Config file could not be read or parsed
    ConfigFile(ConfigFileError),
    /// Region, resolution or tile count rejected
    Grid(GridError),
    /// HTTP client could not be created
    Client(FetchError),
    /// Assembly failed or was cancelled
    Assembly(AssemblyError),
    /// Output could not be written or input could not be read
    Export(ExportError),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::Grid(GridError::UnknownRegion { .. }) => {
                eprintln!();
                eprintln!("Run 'landtiler regions' to list presets, or pass --bbox instead.");
            }
            CliError::Grid(GridError::EmptyTile { .. })
            | CliError::Assembly(AssemblyError::Config(GridError::EmptyTile { .. })) => {
                eprintln!();
                eprintln!("Use fewer tiles or a finer --resolution; --auto-tiles picks a count that fits.");
            }
            CliError::Assembly(AssemblyError::TileFetch { .. }) => {
                eprintln!();
                eprintln!("Common fixes:");
                eprintln!("  1. Retry later if the service is overloaded");
                eprintln!("  2. Use more tiles (--tiles-x/--tiles-y or --auto-tiles) to shrink requests");
                eprintln!("  3. Use --on-failure skip --allow-partial to keep the tiles that succeeded");
            }
            CliError::Export(ExportError::PartialRaster { .. }) => {
                eprintln!();
                eprintln!("Pass --allow-partial to write the raster anyway.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::ConfigFile(e) => write!(f, "{}", e),
            CliError::Grid(e) => write!(f, "{}", e),
            CliError::Client(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Assembly(e) => write!(f, "{}", e),
            CliError::Export(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Grid(e) => Some(e),
            CliError::Client(e) => Some(e),
            CliError::Assembly(e) => Some(e),
            CliError::Export(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<GridError> for CliError {
    fn from(e: GridError) -> Self {
        CliError::Grid(e)
    }
}

impl From<AssemblyError> for CliError {
    fn from(e: AssemblyError) -> Self {
        CliError::Assembly(e)
    }
}

impl From<ExportError> for CliError {
    fn from(e: ExportError) -> Self {
        CliError::Export(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_passes_through_library_messages() {
        let err = CliError::from(GridError::InvalidResolution(0.0));
        assert_eq!(err.to_string(), "Invalid resolution: 0 (must be a positive number)");

        let err = CliError::Config("no endpoint URL".to_string());
        assert_eq!(err.to_string(), "Configuration error: no endpoint URL");
    }

    #[test]
    fn test_source_is_library_error() {
        use std::error::Error;

        let err = CliError::from(AssemblyError::Cancelled {
            completed: 1,
            total: 4,
        });
        assert!(err.source().is_some());
        assert!(CliError::LoggingInit("x".into()).source().is_none());
    }
}
