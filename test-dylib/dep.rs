#![crate_type = "cdylib"]
#![crate_name = "fixture_dep"]

/// Looked up by the target through the global symbol scope.
#[unsafe(no_mangle)]
pub extern "C" fn fixture_dep_value() -> i32 {
    42
}
