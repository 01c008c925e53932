#![crate_type = "cdylib"]
#![crate_name = "fixture_target"]

use std::{
    env,
    ffi::{c_char, c_void},
    fs,
};

unsafe extern "C" {
    fn dlsym(handle: *mut c_void, symbol: *const c_char) -> *mut c_void;
}

#[cfg(target_os = "macos")]
const RTLD_DEFAULT: *mut c_void = -2isize as *mut c_void;
#[cfg(not(target_os = "macos"))]
const RTLD_DEFAULT: *mut c_void = core::ptr::null_mut();

/// Value exported by the dependency fixture, if it was loaded globally.
fn dep_value() -> Option<i32> {
    let sym = unsafe { dlsym(RTLD_DEFAULT, c"fixture_dep_value".as_ptr()) };
    if sym.is_null() {
        return None;
    }
    let f: extern "C" fn() -> i32 = unsafe { core::mem::transmute(sym) };
    Some(f())
}

/// Writes `do_init <dep value>` to the file named by `FIXTURE_OUT`.
#[unsafe(no_mangle)]
pub extern "C" fn do_init() {
    let Some(out) = env::var_os("FIXTURE_OUT") else {
        return;
    };
    let dep = dep_value().map_or_else(|| "missing".to_owned(), |v| v.to_string());
    let _ = fs::write(out, format!("do_init {dep}"));
}
