//! Positional argument handling.
//!
//! The trampoline is invoked as
//!
//! ```text
//! trampoline <temp_launcher_path> <target_library_path> [dep_path | "-"]* <symbol_name>
//! ```
//!
//! The last argument is always the symbol name, however many dependency
//! arguments precede it. A bare `-` marks the path that immediately follows it
//! for removal once it has been loaded.

use crate::{Error, Result};
use std::{ffi::OsString, path::PathBuf};

/// Minimum argument count, program name included.
pub const MIN_ARGS: usize = 4;

/// Target path that switches the trampoline into argument-echo mode.
pub const DUMMY_MIRROR_TARGET: &str = "__dummy_mirror_test";

/// Marker that sets the unlink flag of the next dependency path.
pub const UNLINK_MARKER: &str = "-";

/// A dependency library to load before the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    pub path: PathBuf,
    /// Remove the file at `path` once it has been opened.
    pub unlink_after_load: bool,
}

impl DependencySpec {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unlink_after_load: false,
        }
    }

    pub fn unlinked(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            unlink_after_load: true,
        }
    }
}

/// A validated trampoline invocation.
///
/// Paths are kept as the raw bytes the launcher passed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// File to remove before loading anything; empty means keep.
    pub launcher_temp_path: PathBuf,
    pub target_library_path: PathBuf,
    pub symbol_name: OsString,
    /// Dependencies in load order.
    pub dependency_specs: Vec<DependencySpec>,
}

impl InvocationRequest {
    /// Parses a raw argument vector, program name included.
    ///
    /// Fails with [`Error::InvalidArguments`] when fewer than [`MIN_ARGS`]
    /// arguments are supplied. A trailing `-` with no path after it is
    /// dropped; it never consumes the symbol name.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let argc = args.len();
        if argc < MIN_ARGS {
            return Err(Error::InvalidArguments { argc });
        }

        let symbol_name = args.pop().unwrap_or_default();
        let mut rest = args.into_iter().skip(1);
        let launcher_temp_path = PathBuf::from(rest.next().unwrap_or_default());
        let target_library_path = PathBuf::from(rest.next().unwrap_or_default());

        let mut dependency_specs = Vec::new();
        let mut unlink_next = false;
        for arg in rest {
            if arg == UNLINK_MARKER {
                unlink_next = true;
                continue;
            }
            dependency_specs.push(DependencySpec {
                path: PathBuf::from(arg),
                unlink_after_load: unlink_next,
            });
            unlink_next = false;
        }

        Ok(Self {
            launcher_temp_path,
            target_library_path,
            symbol_name,
            dependency_specs,
        })
    }

    /// Renders the request back into the argument vector a launcher passes
    /// to the trampoline.
    pub fn to_args(&self, program: &str) -> Vec<OsString> {
        let mut args = Vec::with_capacity(MIN_ARGS + self.dependency_specs.len() * 2);
        args.push(OsString::from(program));
        args.push(self.launcher_temp_path.clone().into_os_string());
        args.push(self.target_library_path.clone().into_os_string());
        for dep in &self.dependency_specs {
            if dep.unlink_after_load {
                args.push(OsString::from(UNLINK_MARKER));
            }
            args.push(dep.path.clone().into_os_string());
        }
        args.push(self.symbol_name.clone());
        args
    }

    /// Whether this invocation only echoes its target and symbol.
    #[inline]
    pub fn is_dummy_mirror(&self) -> bool {
        self.target_library_path.as_os_str() == DUMMY_MIRROR_TARGET
    }
}
