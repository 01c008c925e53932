#![crate_type = "cdylib"]
#![crate_name = "fixture_helper"]

#[unsafe(no_mangle)]
pub extern "C" fn fixture_helper_value() -> i32 {
    7
}
