use core::fmt::Display;
use std::borrow::Cow;

/// Exit status when a dependency library fails to load.
pub const EXIT_DEPENDENCY_LOAD: i32 = 9;
/// Exit status when the target library fails to load.
pub const EXIT_TARGET_LOAD: i32 = 10;
/// Exit status when the entry point cannot be resolved in the target.
pub const EXIT_SYMBOL_RESOLUTION: i32 = 11;
/// Exit status when too few arguments were supplied.
pub const EXIT_INVALID_ARGUMENTS: i32 = 12;

/// Hard failures of the trampoline pipeline.
///
/// Each variant maps to a distinct process exit status so that the launcher
/// can branch on the status alone. Failures of best-effort side operations
/// (file removal, handle release) are not represented here; see
/// [`Outcome`](crate::Outcome).
#[derive(Debug)]
pub enum Error {
    /// Fewer than the minimum number of positional arguments were supplied.
    ///
    /// This is a usage error and carries no diagnostic text.
    InvalidArguments {
        /// Number of arguments received, program name included.
        argc: usize,
    },

    /// A dependency library could not be opened.
    DependencyLoad {
        /// Text reported by the platform loader.
        msg: Cow<'static, str>,
    },

    /// The target library could not be opened.
    TargetLoad {
        /// Text reported by the platform loader.
        msg: Cow<'static, str>,
    },

    /// The entry point was not found in the target library.
    SymbolResolution {
        /// Text reported by the platform loader.
        msg: Cow<'static, str>,
    },
}

impl Error {
    /// The process exit status for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::InvalidArguments { .. } => EXIT_INVALID_ARGUMENTS,
            Error::DependencyLoad { .. } => EXIT_DEPENDENCY_LOAD,
            Error::TargetLoad { .. } => EXIT_TARGET_LOAD,
            Error::SymbolResolution { .. } => EXIT_SYMBOL_RESOLUTION,
        }
    }

    /// The raw loader text to append to the error sink, if any.
    ///
    /// Usage errors are silent and return `None`.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Error::InvalidArguments { .. } => None,
            Error::DependencyLoad { msg }
            | Error::TargetLoad { msg }
            | Error::SymbolResolution { msg } => Some(msg),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArguments { argc } => {
                write!(f, "Invalid arguments: expected at least 4, got {argc}")
            }
            Error::DependencyLoad { msg } => write!(f, "Dependency load error: {msg}"),
            Error::TargetLoad { msg } => write!(f, "Target load error: {msg}"),
            Error::SymbolResolution { msg } => write!(f, "Symbol resolution error: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

/// Creates a dependency load error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn dependency_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::DependencyLoad { msg: msg.into() }
}

/// Creates a target load error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn target_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::TargetLoad { msg: msg.into() }
}

/// Creates a symbol resolution error with the specified message.
#[cold]
#[inline(never)]
pub(crate) fn symbol_error(msg: impl Into<Cow<'static, str>>) -> Error {
    Error::SymbolResolution { msg: msg.into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::InvalidArguments { argc: 2 }, 12)]
    #[case(dependency_error("libdep.so: cannot open"), 9)]
    #[case(target_error("libtarget.so: cannot open"), 10)]
    #[case(symbol_error("undefined symbol: do_init"), 11)]
    fn exit_codes_are_distinct(#[case] err: Error, #[case] code: i32) {
        assert_eq!(err.exit_code(), code);
    }

    #[rstest]
    fn usage_error_is_silent() {
        assert!(Error::InvalidArguments { argc: 3 }.diagnostic().is_none());
    }

    #[rstest]
    fn diagnostic_is_raw_loader_text() {
        let err = target_error("libtarget.so: cannot open shared object file");
        assert_eq!(
            err.diagnostic(),
            Some("libtarget.so: cannot open shared object file")
        );
        assert_eq!(
            err.to_string(),
            "Target load error: libtarget.so: cannot open shared object file"
        );
    }
}
