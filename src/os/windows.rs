use crate::{
    Outcome,
    loader::{DynamicLoader, LoadRole, LoaderError, OpenFlags},
};
use core::{ffi::c_void, ptr::NonNull};
use std::{
    ffi::CString,
    path::{Path, PathBuf},
};
use windows_sys::Win32::{
    Foundation::{FreeLibrary, GetLastError, HMODULE, SetLastError},
    System::LibraryLoader::{GetProcAddress, LoadLibraryA},
};

/// An implementation of DynamicLoader trait on top of `LoadLibraryA`
pub struct DefaultLoader;

/// A module handle returned by `LoadLibraryA`, with the path it was opened
/// from for error messages.
#[derive(Debug)]
pub struct ModuleHandle(HMODULE, PathBuf);

fn c_string(s: &str) -> Result<CString, LoaderError> {
    CString::new(s).map_err(|_| LoaderError::new(format!("{s}: name contains a NUL byte")))
}

fn open_error(code: u32, path: &Path, role: LoadRole) -> LoaderError {
    let kind = match role {
        LoadRole::Dependency => "dependent shared library",
        LoadRole::Target => "shared library",
    };
    LoaderError::new(format!(
        "error: {code}, could not load {kind} {}\n",
        path.display()
    ))
}

fn symbol_error(code: u32, name: &str, handle: &ModuleHandle) -> LoaderError {
    LoaderError::new(format!(
        "error: {code} loading symbol: {name} from: {}\n",
        handle.1.display()
    ))
}

impl DynamicLoader for DefaultLoader {
    type Handle = ModuleHandle;

    // Windows binds lazily and exports are visible per module, so the flags
    // have no native counterpart.
    unsafe fn open(
        path: &Path,
        _flags: OpenFlags,
        role: LoadRole,
    ) -> Result<ModuleHandle, LoaderError> {
        // LoadLibraryA takes an ANSI string.
        let Some(utf8) = path.to_str() else {
            return Err(LoaderError::new(format!(
                "{}: path is not valid UTF-8",
                path.display()
            )));
        };
        let name = c_string(utf8)?;
        let module = unsafe { LoadLibraryA(name.as_ptr().cast()) };
        if module.is_null() {
            let code = unsafe { GetLastError() };
            return Err(open_error(code, path, role));
        }
        Ok(ModuleHandle(module, path.to_path_buf()))
    }

    fn clear_error() {
        unsafe { SetLastError(0) };
    }

    unsafe fn resolve(handle: &ModuleHandle, name: &str) -> Result<NonNull<c_void>, LoaderError> {
        let symbol = c_string(name)?;
        match unsafe { GetProcAddress(handle.0, symbol.as_ptr().cast()) } {
            Some(func) => {
                NonNull::new(func as *mut c_void).ok_or_else(|| symbol_error(0, name, handle))
            }
            None => {
                let code = unsafe { GetLastError() };
                Err(symbol_error(code, name, handle))
            }
        }
    }

    unsafe fn close(handle: ModuleHandle) -> Outcome {
        if unsafe { FreeLibrary(handle.0) } == 0 {
            let code = unsafe { GetLastError() };
            return Outcome::Failed(format!("FreeLibrary failed with error: {code}"));
        }
        Outcome::Done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const MISSING: &str = "this_location_is_definitely_non_existent.dll";

    #[rstest]
    #[case(LoadRole::Target, ", could not load shared library ")]
    #[case(LoadRole::Dependency, ", could not load dependent shared library ")]
    fn missing_library_reports_code(#[case] role: LoadRole, #[case] wording: &str) {
        let err = unsafe { DefaultLoader::open(Path::new(MISSING), OpenFlags::TRAMPOLINE, role) }
            .unwrap_err();
        assert!(err.msg.starts_with("error: "));
        assert!(err.msg.contains(wording));
        assert!(err.msg.ends_with(&format!("{MISSING}\n")));
    }

    #[rstest]
    fn resolve_in_kernel32() {
        let handle = unsafe {
            DefaultLoader::open(
                Path::new("kernel32.dll"),
                OpenFlags::TRAMPOLINE,
                LoadRole::Target,
            )
        }
        .unwrap();
        DefaultLoader::clear_error();
        assert!(unsafe { DefaultLoader::resolve(&handle, "GetCurrentProcessId") }.is_ok());
        let err = unsafe { DefaultLoader::resolve(&handle, "definitely_not_exported_here") }
            .unwrap_err();
        assert!(err.msg.contains(" loading symbol: definitely_not_exported_here from: kernel32.dll"));
        assert!(unsafe { DefaultLoader::close(handle) }.is_done());
    }
}
