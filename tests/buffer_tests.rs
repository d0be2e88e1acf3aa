//! Integration tests for read-only text buffers

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use guideline::buffer::Buffer;

#[test]
fn test_new_buffer() {
    let buffer = Buffer::new();

    assert_eq!(buffer.name, "untitled");
    assert_eq!(buffer.content, vec![String::new()]);
    assert!(buffer.path.is_none());
    assert_eq!(buffer.line_count(), 1);
}

#[test]
fn test_from_text() {
    let buffer = Buffer::from_text("notes.txt", "one\ntwo\nthree\n");

    assert_eq!(buffer.name, "notes.txt");
    assert_eq!(buffer.content, vec!["one", "two", "three"]);

    let empty = Buffer::from_text("empty", "");
    assert_eq!(empty.line_count(), 1);
}

#[test]
fn test_count_digits() {
    assert_eq!(Buffer::count_digits(0), 1);
    assert_eq!(Buffer::count_digits(9), 1);
    assert_eq!(Buffer::count_digits(10), 2);
    assert_eq!(Buffer::count_digits(99999), 5);
}

#[test]
fn test_line_number_width_reserves_four_digits() {
    assert_eq!(Buffer::new().line_number_width(), 5);

    let text = "x\n".repeat(12_345);
    assert_eq!(Buffer::from_text("big", &text).line_number_width(), 6);
}

#[tokio::test]
async fn test_from_path_async() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.rs");
    fs::write(&file_path, "fn main() {\n    println!(\"hi\");\n}\n").unwrap();

    let buffer = Buffer::from_path_async(file_path.clone()).await.unwrap();

    assert_eq!(buffer.name, "test.rs");
    assert_eq!(buffer.path, Some(file_path));
    assert_eq!(buffer.line_count(), 3);
    assert_eq!(buffer.content[1], "    println!(\"hi\");");
}

#[tokio::test]
async fn test_from_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("empty.txt");
    fs::write(&file_path, "").unwrap();

    let buffer = Buffer::from_path_async(file_path).await.unwrap();
    assert_eq!(buffer.content, vec![String::new()]);
}

#[test]
fn test_missing_file_is_an_error() {
    let result = tokio_test::block_on(Buffer::from_path_async(PathBuf::from(
        "/definitely/not/here.txt",
    )));
    assert!(result.is_err());
}
