// e2e/cli_integration.rs: CLI integration tests
//
// Runs the `lzstream` binary as a black box with std::process::Command.
// Covers output path resolution, stdout mode, block spans, multiple inputs,
// strictness, and exit codes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn lzstream_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_lzstream"))
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(lzstream_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run lzstream")
}

fn sample(n: usize) -> Vec<u8> {
    "Hello, block!\n".repeat(n).into_bytes()
}

/// Write `data` compressed by the reference encoder to `dir/name`.
fn write_block(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, lz4_flex::block::compress(data)).unwrap();
    path
}

// ── 1. Default output path ───────────────────────────────────────────────────

#[test]
fn test_cli_strips_block_extension() {
    let dir = TempDir::new().unwrap();
    let data = sample(500);
    write_block(dir.path(), "notes.txt.lzb", &data);

    let out = run(dir.path(), &["notes.txt.lzb"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(dir.path().join("notes.txt")).unwrap(), data);
}

#[test]
fn test_cli_appends_out_suffix() {
    let dir = TempDir::new().unwrap();
    let data = sample(10);
    write_block(dir.path(), "raw.bin", &data);

    let out = run(dir.path(), &["raw.bin"]);
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("raw.bin.out")).unwrap(), data);
}

// ── 2. Explicit output and stdout ────────────────────────────────────────────

#[test]
fn test_cli_explicit_output_and_small_fill() {
    let dir = TempDir::new().unwrap();
    let data = sample(2000);
    write_block(dir.path(), "in.lzb", &data);

    let out = run(
        dir.path(),
        &["in.lzb", "-o", "decoded.txt", "--fill-size", "3", "--input-chunk", "1K"],
    );
    assert!(out.status.success());
    assert_eq!(fs::read(dir.path().join("decoded.txt")).unwrap(), data);
}

#[test]
fn test_cli_stdout_concatenates_inputs_in_order() {
    let dir = TempDir::new().unwrap();
    let a = sample(30);
    let b = b"second input".to_vec();
    write_block(dir.path(), "a.lzb", &a);
    write_block(dir.path(), "b.lzb", &b);

    let out = run(dir.path(), &["-c", "a.lzb", "b.lzb"]);
    assert!(out.status.success());
    let mut expected = a.clone();
    expected.extend_from_slice(&b);
    assert_eq!(out.stdout, expected);
}

// ── 3. Spans ─────────────────────────────────────────────────────────────────

#[test]
fn test_cli_offset_and_length() {
    let dir = TempDir::new().unwrap();
    let data = sample(100);
    let block = lz4_flex::block::compress(&data);
    let mut container = b"MAGIC!".to_vec();
    container.extend_from_slice(&block);
    container.extend_from_slice(b"trailing index bytes");
    fs::write(dir.path().join("pack.bin"), &container).unwrap();

    let len = block.len().to_string();
    let out = run(dir.path(), &["-c", "--offset", "6", "--length", &len, "pack.bin"]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, data);
}

// ── 4. Multiple inputs ───────────────────────────────────────────────────────

#[test]
fn test_cli_multiple_inputs_in_parallel() {
    let dir = TempDir::new().unwrap();
    let names: Vec<String> = (0..8).map(|i| format!("f{i}.lzb")).collect();
    for (i, name) in names.iter().enumerate() {
        write_block(dir.path(), name, &sample(i * 50 + 1));
    }
    let args: Vec<&str> = names.iter().map(String::as_str).collect();
    let out = run(dir.path(), &args);
    assert!(out.status.success());
    for i in 0..8 {
        let decoded = fs::read(dir.path().join(format!("f{i}"))).unwrap();
        assert_eq!(decoded, sample(i * 50 + 1), "input {i}");
    }
}

#[test]
fn test_cli_output_with_multiple_inputs_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_block(dir.path(), "a.lzb", b"a");
    write_block(dir.path(), "b.lzb", b"b");
    let out = run(dir.path(), &["-o", "x", "a.lzb", "b.lzb"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).starts_with("lzstream: "));
}

// ── 5. Errors and strictness ─────────────────────────────────────────────────

#[test]
fn test_cli_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["does-not-exist.lzb"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("does-not-exist.lzb"), "stderr: {stderr}");
}

#[test]
fn test_cli_corrupt_block_strict_vs_trusting() {
    let dir = TempDir::new().unwrap();
    // 'A' then a match 9 bytes back.
    fs::write(dir.path().join("bad.lzb"), [0x10u8, b'A', 0x09, 0x00]).unwrap();

    let out = run(dir.path(), &["-c", "bad.lzb"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("corrupt stream"));

    let out = run(dir.path(), &["-c", "--trust-input", "bad.lzb"]);
    assert!(out.status.success());
    assert_eq!(out.stdout, [b'A', 0, 0, 0, 0]);
}

#[test]
fn test_cli_requires_an_input() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &[]);
    assert!(!out.status.success());
}

#[test]
fn test_cli_version() {
    let dir = TempDir::new().unwrap();
    let out = run(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(lzstream::version_string()));
}
