#![forbid(unsafe_code)]
#![deny(warnings)]
#![warn(clippy::pedantic)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

// Full default workload: five ~1.5s spins, far longer in debug builds.
// Run with `cargo test --release --test e2e_binaries -- --ignored`.
#[test]
#[ignore = "runs the full workload"]
fn workload_is_silent_and_exits_zero() {
    let out = Command::new(env!("CARGO_BIN_EXE_hotleak"))
        .env_remove("RUST_LOG")
        .output()
        .expect("spawn");
    assert_eq!(out.status.code(), Some(0));
    assert!(out.stdout.is_empty());
    assert!(out.stderr.is_empty());
}

#[test]
fn parse_profile_without_reports() {
    let dir = tempfile::tempdir().expect("tmp");
    let p = |n: &str| dir.path().join(n);
    let out = Command::new(env!("CARGO_BIN_EXE_parse-profile"))
        .env_remove("RUST_LOG")
        .arg(p("memcheck.txt"))
        .arg(p("callgrind.out"))
        .arg(p("cachegrind.out"))
        .arg(p("pprof.txt"))
        .arg("hotleak")
        .output()
        .expect("spawn");
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("::group::Profiling results for hotleak"));
    assert!(stdout.contains("::notice::No performance or memory issues detected"));
    assert!(stdout.trim_end().ends_with("::endgroup::"));
}

#[test]
fn parse_profile_requires_all_inputs() {
    let out = Command::new(env!("CARGO_BIN_EXE_parse-profile"))
        .arg("only-one")
        .output()
        .expect("spawn");
    assert!(!out.status.success());
}

const MEMCHECK: &str = "\
==77== LEAK SUMMARY:
==77==    definitely lost: 4,000 bytes in 1 blocks
==77==    by 0x10917E: hotleak::lib_mem::leak_block (/workspace/src/lib_mem.rs:13)
";

const PPROF: &str = "\
     244  97.6%  97.6%      244  97.6% hot_loop (/workspace/src/lib_cpu.rs:17)
       6   2.4% 100.0%        6   2.4% __nanosleep (/usr/lib/libc.so.6:0)
";

fn parse_profile(dir: &Path, extra: &[&str]) -> Output {
    fs::write(dir.join("memcheck.txt"), MEMCHECK).expect("write memcheck");
    fs::write(dir.join("pprof.txt"), PPROF).expect("write pprof");
    Command::new(env!("CARGO_BIN_EXE_parse-profile"))
        .env_remove("RUST_LOG")
        .arg(dir.join("memcheck.txt"))
        .arg(dir.join("callgrind.out"))
        .arg(dir.join("cachegrind.out"))
        .arg(dir.join("pprof.txt"))
        .arg("hotleak")
        .args(extra)
        .output()
        .expect("spawn")
}

#[test]
fn parse_profile_text_output() {
    let dir = tempfile::tempdir().expect("tmp");
    let out = parse_profile(dir.path(), &[]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "::group::parse-profile arguments");
    assert!(lines[1].starts_with("  argv[0] = "));
    assert!(lines[2].starts_with("  argv[1] = ") && lines[2].contains("memcheck.txt"));
    assert!(lines.contains(&"::warning::Valgrind definitely lost: 4000 bytes in 1 blocks"));
    assert!(lines.contains(&"::warning file=src/lib_cpu.rs,line=17::CPU hotspot in hot_loop: 244 calls"));
    assert!(!stdout.contains("libc.so.6,line"));
    assert!(!stdout.contains("::notice::"));
}

#[test]
fn parse_profile_custom_prefix() {
    let dir = tempfile::tempdir().expect("tmp");
    let out = parse_profile(dir.path(), &["--workspace-prefix", "/usr/lib/"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("::warning file=libc.so.6,line=0::CPU hotspot in __nanosleep: 6 calls"));
    assert!(!stdout.contains("file=src/lib_cpu.rs"));
}

#[test]
fn parse_profile_json_output() {
    let dir = tempfile::tempdir().expect("tmp");
    let out = parse_profile(dir.path(), &["--format", "json"]);
    assert!(out.status.success());
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).expect("json");
    let items = v.as_array().expect("array");
    assert_eq!(items[0]["kind"], "leak");
    assert_eq!(items[0]["category"], "definitely lost");
    assert_eq!(items[0]["bytes"], 4000);
    assert!(items
        .iter()
        .any(|f| f["kind"] == "sampled_hotspot" && f["in_workspace"] == false));
}

#[test]
fn parse_profile_ignores_extra_arguments() {
    let dir = tempfile::tempdir().expect("tmp");
    let out = parse_profile(dir.path(), &["leftover", "another"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.contains("::group::Profiling results for hotleak"));
}

#[test]
fn parse_profile_unreadable_report() {
    let dir = tempfile::tempdir().expect("tmp");
    // exists, but reading a directory fails
    let memcheck = dir.path().join("memcheck.txt");
    fs::create_dir(&memcheck).expect("mkdir");
    let out = Command::new(env!("CARGO_BIN_EXE_parse-profile"))
        .env_remove("RUST_LOG")
        .arg(&memcheck)
        .arg(dir.path().join("callgrind.out"))
        .arg(dir.path().join("cachegrind.out"))
        .arg(dir.path().join("pprof.txt"))
        .arg("hotleak")
        .output()
        .expect("spawn");
    assert!(!out.status.success());
    let stdout = String::from_utf8(out.stdout).expect("utf8");
    assert!(stdout.starts_with("::error::read "));
}
