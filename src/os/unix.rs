use crate::{
    Outcome,
    loader::{DynamicLoader, LoadRole, LoaderError, OpenFlags},
};
use core::{ffi::c_void, fmt::Display, ptr::NonNull};
use libc::{RTLD_GLOBAL, RTLD_LAZY, RTLD_LOCAL, RTLD_NOW, dlclose, dlerror, dlopen, dlsym};
use std::{
    ffi::{CStr, CString},
    os::unix::ffi::OsStrExt,
    path::Path,
};

/// An implementation of DynamicLoader trait on top of `dlopen`
pub struct DefaultLoader;

/// A handle returned by `dlopen`.
#[derive(Debug)]
pub struct DlHandle(NonNull<c_void>);

fn native_flags(flags: OpenFlags) -> i32 {
    let binding = if flags.contains(OpenFlags::LAZY) {
        RTLD_LAZY
    } else {
        RTLD_NOW
    };
    let visibility = if flags.contains(OpenFlags::GLOBAL) {
        RTLD_GLOBAL
    } else {
        RTLD_LOCAL
    };
    binding | visibility
}

/// Takes the pending `dlerror` text, if any.
fn take_dlerror() -> Option<String> {
    let err = unsafe { dlerror() };
    if err.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(err) }.to_string_lossy().into_owned())
}

/// Converts raw bytes to a C string; `shown` names the value in the error.
fn c_string(bytes: &[u8], shown: impl Display) -> Result<CString, LoaderError> {
    CString::new(bytes)
        .map_err(|_| LoaderError::new(format!("{shown}: name contains a NUL byte")))
}

impl DynamicLoader for DefaultLoader {
    type Handle = DlHandle;

    // dlerror already names the library, whatever its role.
    unsafe fn open(
        path: &Path,
        flags: OpenFlags,
        _role: LoadRole,
    ) -> Result<DlHandle, LoaderError> {
        let name = c_string(path.as_os_str().as_bytes(), path.display())?;
        let ptr = unsafe { dlopen(name.as_ptr(), native_flags(flags)) };
        match NonNull::new(ptr) {
            Some(ptr) => Ok(DlHandle(ptr)),
            None => Err(LoaderError::new(
                take_dlerror().unwrap_or_else(|| format!("{}: dlopen failed", path.display())),
            )),
        }
    }

    fn clear_error() {
        let _ = take_dlerror();
    }

    unsafe fn resolve(handle: &DlHandle, name: &str) -> Result<NonNull<c_void>, LoaderError> {
        let symbol = c_string(name.as_bytes(), name)?;
        let ptr = unsafe { dlsym(handle.0.as_ptr(), symbol.as_ptr()) };
        if let Some(err) = take_dlerror() {
            return Err(LoaderError::new(err));
        }
        NonNull::new(ptr)
            .ok_or_else(|| LoaderError::new(format!("{name}: symbol resolved to a null address")))
    }

    unsafe fn close(handle: DlHandle) -> Outcome {
        if unsafe { dlclose(handle.0.as_ptr()) } != 0 {
            return Outcome::Failed(take_dlerror().unwrap_or_else(|| "dlclose failed".into()));
        }
        Outcome::Done
    }
}
