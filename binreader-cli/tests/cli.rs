//! CLI integration tests for `binreader read` and `binreader info`

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn sample_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&0xCAFE_BABEu32.to_be_bytes()).unwrap();
    file.write_all(&300u16.to_le_bytes()).unwrap();
    file.write_all(&[0xFF]).unwrap();
    file.write_all(b"hello\0").unwrap();
    file.write_all(&[1, 2, 3]).unwrap();
    file.flush().unwrap();
    file
}

fn binreader() -> Command {
    Command::cargo_bin("binreader").unwrap()
}

const EXPECTED: &str = "0 u32 3405691582\n4 u16le 300\n6 i8 -1\n7 cstr \"hello\"\n13 bytes:8 [01 02 03]\n";

#[test]
fn test_read_fields() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .args(["u32", "u16le", "i8", "cstr", "bytes:8"])
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn test_async_read_matches_sync() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .arg("--async")
        .args(["u32", "u16le", "i8", "cstr", "bytes:8"])
        .assert()
        .success()
        .stdout(EXPECTED);
}

#[test]
fn test_offset_and_little_endian() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .args(["--offset", "4", "--little-endian", "u16", "skip:-2", "str:2"])
        .assert()
        .success()
        .stdout("4 u16 300\n6 skip:-2 -> 4\n4 str:2 \",\\u{1}\"\n");
}

#[test]
fn test_strict_mode_reports_range_error() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .args(["--strict", "--offset", "14", "u64"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Position out of range"));
}

#[test]
fn test_lenient_mode_clamps_seek() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .args(["--offset", "100", "bytes:4"])
        .assert()
        .success()
        .stdout("16 bytes:4 []\n");
}

#[test]
fn test_rejects_unknown_field() {
    let file = sample_file();
    binreader()
        .arg("read")
        .arg(file.path())
        .arg("u24")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field type 'u24'"));
}

#[test]
fn test_info_preview() {
    let file = sample_file();
    binreader()
        .arg("info")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Size: 16 B (16 bytes)"))
        .stdout(predicate::str::contains("00000000  ca fe ba be 2c 01 ff 68"))
        .stdout(predicate::str::contains("|....,..hello....|"));
}

#[test]
fn test_missing_file() {
    binreader()
        .args(["info", "/nonexistent/file.bin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}
