use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

const DYLIB_FILE_NAME: [&str; 3] = ["dep.rs", "helper.rs", "target.rs"];
const DYLIB_DIR_PATH: &str = "test-dylib";

/// Builds the fixture libraries used by the integration tests. A failure is
/// only a warning: the tests that need the fixtures skip themselves.
fn compile_dylib(rustc: &str, target: &str, out_dir: &Path) {
    for name in DYLIB_FILE_NAME {
        let mut cmd = Command::new(rustc);
        cmd.arg("--edition")
            .arg("2024")
            .arg("--target")
            .arg(target)
            .arg(format!("{}/{}", DYLIB_DIR_PATH, name))
            .arg("--out-dir")
            .arg(out_dir);
        match cmd.status() {
            Ok(status) if status.success() => {}
            _ => {
                println!("cargo:warning=could not compile test fixture {name}");
                return;
            }
        }
    }
}

fn main() {
    println!("cargo:rerun-if-changed={DYLIB_DIR_PATH}");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap()).join(DYLIB_DIR_PATH);
    println!("cargo:rustc-env=TEST_ARTIFACTS={}", out_dir.display());

    // the fixtures rely on dlsym
    if env::var_os("CARGO_CFG_UNIX").is_none() {
        return;
    }
    if fs::create_dir_all(&out_dir).is_err() {
        return;
    }
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string());
    let target = env::var("TARGET").unwrap();
    compile_dylib(&rustc, &target, &out_dir);
}
