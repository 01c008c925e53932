use std::{fs, io, path::Path};

/// Result of a best-effort side operation.
///
/// Nothing in the pipeline branches on a failed outcome; it exists so the
/// failure can be traced and tested, and so the signature says the error is
/// dropped on purpose.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Nothing to do.
    #[default]
    Skipped,
    Failed(String),
}

impl Outcome {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done)
    }
}

impl From<io::Result<()>> for Outcome {
    fn from(res: io::Result<()>) -> Self {
        match res {
            Ok(()) => Outcome::Done,
            Err(err) => Outcome::Failed(err.to_string()),
        }
    }
}

/// Removes the file at `path`, ignoring failures.
pub fn remove_file(path: impl AsRef<Path>) -> Outcome {
    let path = path.as_ref();
    let outcome = Outcome::from(fs::remove_file(path));
    #[cfg(feature = "log")]
    log::debug!("remove [{}]: {:?}", path.display(), outcome);
    outcome
}

/// Removes the temporary launcher file, unless `path` is empty.
pub fn remove_launcher(path: impl AsRef<Path>) -> Outcome {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Outcome::Skipped;
    }
    remove_file(path)
}
