//! # dylib_trampoline
//! A minimal bridge between a short-lived launcher and an instrumentation
//! library.
//! ## Usage
//! The `trampoline` binary is invoked as
//! `trampoline <temp_launcher_path> <target_library_path> [dep_path | "-"]* <symbol_name>`.
//! It removes the launcher file, opens the dependencies in order with global
//! symbol visibility, opens the target, resolves `symbol_name` as a niladic
//! entry point, calls it, then closes the target followed by the
//! dependencies.
//!
//! Every hard failure has its own exit status: 9 for a dependency, 10 for the
//! target, 11 for the symbol and 12 for too few arguments.
//! ## Example
//! ```no_run
//! use dylib_trampoline::{DefaultLoader, InvocationRequest, Trampoline};
//!
//! let request = InvocationRequest::parse(["trampoline", "", "libtarget.so", "do_init"])?;
//! let trampoline = Trampoline::<DefaultLoader>::new();
//! let report = unsafe { trampoline.run(&request, &mut std::io::stdout()) }?;
//! assert_eq!(report.released.len(), 1);
//! # Ok::<(), dylib_trampoline::Error>(())
//! ```

mod cleanup;
mod config;
mod error;
mod handles;
pub mod loader;
pub mod os;
mod pipeline;
pub mod request;
mod sink;

pub use cleanup::{Outcome, remove_file, remove_launcher};
pub use config::{Config, LOG_FILE_ENV};
pub use error::{
    EXIT_DEPENDENCY_LOAD, EXIT_INVALID_ARGUMENTS, EXIT_SYMBOL_RESOLUTION, EXIT_TARGET_LOAD, Error,
};
pub use handles::HandleSet;
pub use loader::{
    DefaultLoader, DynamicLoader, EntryPoint, LoadRole, LoaderError, OpenFlags, Symbol,
};
pub use pipeline::{Report, Trampoline};
pub use request::{DependencySpec, InvocationRequest};
pub use sink::ErrorSink;

/// The result type used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
