//! Destination for loader diagnostics.

use crate::Config;
use std::{
    fs::{File, OpenOptions},
    io::{self, Write},
    path::Path,
};

/// Where hard-failure text goes: the configured log file, or standard error.
///
/// The sink is opened at most once per invocation and never explicitly
/// closed; process exit reclaims it.
#[derive(Debug)]
pub enum ErrorSink {
    File(File),
    Stderr,
}

impl ErrorSink {
    /// Opens `path` for appending, falling back to standard error when no
    /// path is given or the file cannot be opened.
    pub fn open(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return ErrorSink::Stderr;
        };
        match OpenOptions::new().append(true).create(true).open(path) {
            Ok(file) => ErrorSink::File(file),
            Err(_err) => {
                #[cfg(feature = "log")]
                log::debug!("cannot open log file [{}]: {}", path.display(), _err);
                ErrorSink::Stderr
            }
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::open(config.log_file.as_deref())
    }

    /// Appends `text` unchanged. A failed file write is retried on standard
    /// error so that a hard failure is never silent.
    pub fn report(&mut self, text: &str) {
        if let ErrorSink::File(file) = self {
            if file.write_all(text.as_bytes()).and_then(|()| file.flush()).is_ok() {
                return;
            }
            *self = ErrorSink::Stderr;
        }
        let _ = write_stderr(text);
    }
}

fn write_stderr(text: &str) -> io::Result<()> {
    let mut stderr = io::stderr().lock();
    stderr.write_all(text.as_bytes())?;
    stderr.flush()
}
