use cjson::prelude::*;
use std::{env, fs, path::PathBuf, process::Command};

fn converter() -> Command { Command::new(env!("CARGO_BIN_EXE_condensed_converter")) }

fn scratch(name: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("cjson-conv-{}-{}", std::process::id(), name));
    path
}

#[test]
fn json_converts_to_condensed_and_back() {
    let json_path = scratch("sample.json");
    fs::write(&json_path, "{\"a\": [1, 2], \"b\": true}").unwrap();

    let status = converter().arg(&json_path).status().unwrap();
    assert_eq!(status.code(), Some(0));

    let cjson_path = json_path.with_extension("cjson");
    let condensed = fs::read(&cjson_path).unwrap();
    let value = decode_full(&condensed).unwrap();
    assert_eq!(value.at("b").unwrap(), &Value::from(true));

    // Round the file back to text.
    let status = converter().arg(&cjson_path).status().unwrap();
    assert_eq!(status.code(), Some(0));
    let reread = fs::read_to_string(&json_path).unwrap();
    assert_eq!(from_text(&reread).unwrap(), value);

    fs::remove_file(&json_path).unwrap();
    fs::remove_file(&cjson_path).unwrap();
}

#[test]
fn usage_errors_exit_with_one() {
    let status = converter().status().unwrap();
    assert_eq!(status.code(), Some(1));

    let status = converter().args(["a", "b"]).status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn unreadable_files_exit_with_two() {
    let status = converter().arg(scratch("absent.json")).status().unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn corrupt_condensed_input_exits_with_two() {
    let path = scratch("broken.cjson");
    fs::write(&path, [0x00]).unwrap();

    let status = converter().arg(&path).status().unwrap();
    assert_eq!(status.code(), Some(2));

    fs::remove_file(&path).unwrap();
}
