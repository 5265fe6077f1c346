//! User configuration
//!
//! Settings are read from an INI file, `~/.landtiler/config.ini` by default.
//! A missing file yields defaults; command-line flags override file values.
//!
//! ```ini
//! [source]
//! url = https://example.org/sample?bbox={lon_min},{lat_min},{lon_max},{lat_max}&scale={scale}
//! band = LC_Type1
//! timeout = 60
//!
//! [grid]
//! resolution = 5000
//! tiles_x = 20
//! tiles_y = 10
//!
//! [download]
//! max_attempts = 3
//! concurrency = 4
//! on_failure = skip
//!
//! [regions]
//! Alps = 5.0, 43.5, 16.5, 48.5
//! ```

mod file;
mod parser;
mod settings;

pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    ConfigFile, DownloadSettings, GridSettings, SourceSettings, DEFAULT_CLASS_VALUE,
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_MAX_BACKOFF_MS, DEFAULT_RESOLUTION_METERS,
    MAX_CONCURRENCY,
};
