#![allow(dead_code)]

use dylib_trampoline::LOG_FILE_ENV;
use std::{
    env::consts::{DLL_PREFIX, DLL_SUFFIX},
    path::PathBuf,
    process::{Command, Output},
};

/// Path of a fixture library built by `build.rs`.
pub fn get_path(name: &str) -> PathBuf {
    PathBuf::from(env!("TEST_ARTIFACTS")).join(format!("{DLL_PREFIX}{name}{DLL_SUFFIX}"))
}

/// Fixture paths, or `None` when `build.rs` could not produce them.
pub fn fixtures(names: &[&str]) -> Option<Vec<PathBuf>> {
    let paths: Vec<PathBuf> = names.iter().map(|name| get_path(name)).collect();
    if let Some(missing) = paths.iter().find(|p| !p.exists()) {
        eprintln!("Skipping test: {} not found", missing.display());
        return None;
    }
    Some(paths)
}

/// The trampoline binary with a clean error-sink environment.
pub fn trampoline() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_trampoline"));
    cmd.env_remove(LOG_FILE_ENV);
    cmd
}

pub fn run<I, S>(cmd: &mut Command, args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    cmd.args(args).output().unwrap()
}
