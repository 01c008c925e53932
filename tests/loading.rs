#![cfg(unix)]
mod common;

use common::{fixtures, run, trampoline};
use dylib_trampoline::LOG_FILE_ENV;
use libloading::Library;
use rstest::rstest;
use std::fs;

#[rstest]
fn fixtures_export_entry_points() {
    let Some(paths) = fixtures(&["fixture_dep", "fixture_target"]) else {
        return;
    };
    let dep = unsafe { Library::new(&paths[0]) }.unwrap();
    let f = unsafe { dep.get::<extern "C" fn() -> i32>(b"fixture_dep_value") }.unwrap();
    assert_eq!(f(), 42);

    let target = unsafe { Library::new(&paths[1]) }.unwrap();
    assert!(unsafe { target.get::<extern "C" fn()>(b"do_init") }.is_ok());
}

#[rstest]
fn full_run_with_unlinked_dependency() {
    let Some(paths) = fixtures(&["fixture_dep", "fixture_helper", "fixture_target"]) else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let dep = dir.path().join(paths[0].file_name().unwrap());
    fs::copy(&paths[0], &dep).unwrap();
    let launcher = dir.path().join("launcher");
    fs::write(&launcher, b"").unwrap();
    let marker = dir.path().join("called");

    let out = run(
        trampoline().env("FIXTURE_OUT", &marker),
        [
            launcher.to_str().unwrap(),
            paths[2].to_str().unwrap(),
            "-",
            dep.to_str().unwrap(),
            paths[1].to_str().unwrap(),
            "do_init",
        ],
    );

    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    // the dependency was visible to the target through the global scope
    assert_eq!(fs::read_to_string(&marker).unwrap(), "do_init 42");
    assert!(!dep.exists());
    assert!(paths[1].exists());
    assert!(paths[2].exists());
    assert!(!launcher.exists());
}

#[rstest]
fn non_utf8_dependency_is_loaded_and_removed() {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let Some(paths) = fixtures(&["fixture_dep", "fixture_target"]) else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let dep = dir.path().join(OsStr::from_bytes(b"libdep\xff.so"));
    fs::copy(&paths[0], &dep).unwrap();
    let marker = dir.path().join("called");

    let out = run(
        trampoline().env("FIXTURE_OUT", &marker),
        [
            OsStr::new(""),
            paths[1].as_os_str(),
            OsStr::new("-"),
            dep.as_os_str(),
            OsStr::new("do_init"),
        ],
    );

    assert_eq!(out.status.code(), Some(0), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read_to_string(&marker).unwrap(), "do_init 42");
    assert!(!dep.exists());
}

#[rstest]
fn target_without_dependency() {
    let Some(paths) = fixtures(&["fixture_target"]) else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("called");

    let out = run(
        trampoline().env("FIXTURE_OUT", &marker),
        ["", paths[0].to_str().unwrap(), "do_init"],
    );

    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&marker).unwrap(), "do_init missing");
}

#[rstest]
fn missing_symbol() {
    let Some(paths) = fixtures(&["fixture_dep", "fixture_target"]) else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("trace.log");
    let marker = dir.path().join("called");

    let out = run(
        trampoline()
            .env(LOG_FILE_ENV, &log)
            .env("FIXTURE_OUT", &marker),
        [
            "",
            paths[1].to_str().unwrap(),
            paths[0].to_str().unwrap(),
            "definitely_not_exported",
        ],
    );

    assert_eq!(out.status.code(), Some(11));
    assert!(fs::read_to_string(&log).unwrap().contains("definitely_not_exported"));
    assert!(!marker.exists());
}

#[rstest]
fn dependency_failure_stops_before_target() {
    let Some(paths) = fixtures(&["fixture_dep", "fixture_target"]) else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("called");
    let missing = dir.path().join("missing.so");

    let out = run(
        trampoline().env("FIXTURE_OUT", &marker),
        [
            "",
            paths[1].to_str().unwrap(),
            paths[0].to_str().unwrap(),
            missing.to_str().unwrap(),
            "do_init",
        ],
    );

    assert_eq!(out.status.code(), Some(9));
    assert!(!marker.exists());
}
