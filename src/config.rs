use std::{env, ffi::OsString, path::PathBuf};

/// Environment variable naming the file that receives loader diagnostics.
pub const LOG_FILE_ENV: &str = "DD_TRACE_LOG_FILE";

/// Settings read from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Diagnostics destination; `None` means standard error.
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key))
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<OsString>) -> Self {
        let log_file = lookup(LOG_FILE_ENV)
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        Self { log_file }
    }
}
