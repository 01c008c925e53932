//! The load, resolve, invoke, release sequence.

use crate::{
    Outcome, Result,
    cleanup,
    error::{dependency_error, symbol_error, target_error},
    handles::HandleSet,
    loader::{DefaultLoader, DynamicLoader, LoadRole, OpenFlags, Symbol},
    request::{DependencySpec, InvocationRequest},
};
use core::marker::PhantomData;
use std::{
    ffi::OsStr,
    io::Write,
    path::{Path, PathBuf},
};

/// What a completed invocation did besides calling the entry point.
#[derive(Debug, Default)]
pub struct Report {
    /// Removal of the temporary launcher file.
    pub launcher: Outcome,
    /// Dependencies removed after loading, with the removal outcome.
    pub unlinked: Vec<(PathBuf, Outcome)>,
    /// One outcome per released handle, in release order.
    pub released: Vec<Outcome>,
    /// The invocation only echoed its arguments.
    pub mirrored: bool,
}

/// Runs one invocation against the loader `L`.
pub struct Trampoline<L: DynamicLoader = DefaultLoader> {
    _marker: PhantomData<L>,
}

impl<L: DynamicLoader> Default for Trampoline<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: DynamicLoader> Trampoline<L> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    /// Executes `request`.
    ///
    /// The launcher file is removed first, whatever happens afterwards. In
    /// dummy-mirror mode the target path and symbol name are written to
    /// `stdout` and nothing is loaded. Otherwise the first load or resolution
    /// failure is returned and the handles opened so far are left open.
    ///
    /// # Safety
    /// Loads the requested libraries and calls the requested entry point.
    pub unsafe fn run(
        &self,
        request: &InvocationRequest,
        stdout: &mut impl Write,
    ) -> Result<Report> {
        let mut report = Report {
            launcher: cleanup::remove_launcher(&request.launcher_temp_path),
            ..Report::default()
        };

        if request.is_dummy_mirror() {
            let _ = mirror(stdout, request);
            report.mirrored = true;
            return Ok(report);
        }

        let mut handles = HandleSet::new();
        report.unlinked =
            unsafe { self.load_dependencies(&request.dependency_specs, &mut handles)? };

        let target = unsafe { self.load_target(&request.target_library_path)? };
        let target = handles.set_target(target);
        let symbol = unsafe { self.resolve(target, &request.symbol_name)? };

        #[cfg(feature = "log")]
        log::debug!("invoke [{}] {:?}", request.symbol_name.display(), symbol);
        unsafe { symbol.call() };

        report.released = unsafe { handles.release::<L>() };
        Ok(report)
    }

    /// Opens every dependency in order with global visibility, removing the
    /// marked ones once they are open.
    ///
    /// # Safety
    /// Runs the dependencies' initialisers.
    pub unsafe fn load_dependencies(
        &self,
        specs: &[DependencySpec],
        handles: &mut HandleSet<L::Handle>,
    ) -> Result<Vec<(PathBuf, Outcome)>> {
        let mut unlinked = Vec::new();
        for spec in specs {
            let handle =
                unsafe { L::open(&spec.path, OpenFlags::TRAMPOLINE, LoadRole::Dependency) }
                    .map_err(|err| dependency_error(err.msg))?;
            #[cfg(feature = "log")]
            log::debug!("loaded dependency [{}]", spec.path.display());
            handles.push_dependency(handle);
            if spec.unlink_after_load {
                unlinked.push((spec.path.clone(), cleanup::remove_file(&spec.path)));
            }
        }
        Ok(unlinked)
    }

    /// Opens the target library with global visibility.
    ///
    /// # Safety
    /// Runs the target's initialisers.
    pub unsafe fn load_target(&self, path: &Path) -> Result<L::Handle> {
        let handle = unsafe { L::open(path, OpenFlags::TRAMPOLINE, LoadRole::Target) }
            .map_err(|err| target_error(err.msg))?;
        #[cfg(feature = "log")]
        log::debug!("loaded target [{}]", path.display());
        Ok(handle)
    }

    /// Resolves `name` in `target` after clearing stale loader errors.
    ///
    /// Symbol names must be valid UTF-8.
    ///
    /// # Safety
    /// `name` must be an entry point taking no arguments and returning
    /// nothing.
    pub unsafe fn resolve<'lib>(
        &self,
        target: &'lib L::Handle,
        name: &OsStr,
    ) -> Result<Symbol<'lib, L::Handle>> {
        let Some(name) = name.to_str() else {
            return Err(symbol_error(format!(
                "{}: symbol name is not valid UTF-8",
                name.display()
            )));
        };
        L::clear_error();
        let ptr = unsafe { L::resolve(target, name) }.map_err(|err| symbol_error(err.msg))?;
        Ok(unsafe { Symbol::from_raw(target, ptr) })
    }
}

/// Echoes the target path and symbol name, byte for byte.
fn mirror(stdout: &mut impl Write, request: &InvocationRequest) -> std::io::Result<()> {
    stdout.write_all(request.target_library_path.as_os_str().as_encoded_bytes())?;
    stdout.write_all(b" ")?;
    stdout.write_all(request.symbol_name.as_encoded_bytes())?;
    stdout.flush()
}
