//! # Text Buffer
//!
//! Read-only document shown by an editor view.
//!
//! Buffers hold the file content as lines and know how wide their line
//! number gutter is. Editing is not supported; views only scroll.

use std::path::{Path, PathBuf};

use tokio::io::AsyncBufReadExt;

/// Name given to buffers without a file name
const UNTITLED: &str = "untitled";

/// Gutter digits reserved even for short files, so the text column stays put
const MIN_GUTTER_DIGITS: usize = 4;

#[derive(Debug, Clone, PartialEq)]
pub struct Buffer {
    /// Lines of text; never empty
    pub content: Vec<String>,
    pub path: Option<PathBuf>,
    pub name: String,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    pub fn new() -> Self {
        Self::from_lines(UNTITLED, None, Vec::new())
    }

    /// Build a buffer from in-memory text
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::from_lines(name, None, text.lines().map(str::to_owned).collect())
    }

    /// Load a file, one entry per line
    pub async fn from_path_async(path: PathBuf) -> std::io::Result<Self> {
        let file = tokio::fs::File::open(&path).await?;
        let mut reader = tokio::io::BufReader::new(file).lines();

        let mut lines = Vec::new();
        while let Some(line) = reader.next_line().await? {
            lines.push(line);
        }

        Ok(Self::from_lines(file_name(&path), Some(path), lines))
    }

    fn from_lines(name: impl Into<String>, path: Option<PathBuf>, mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }

        Self {
            content: lines,
            path,
            name: name.into(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.content.len()
    }

    /// Count digits in a number
    pub fn count_digits(n: usize) -> usize {
        n.checked_ilog10().map_or(1, |log| log as usize + 1)
    }

    /// Width of the line number gutter, separator included
    pub fn line_number_width(&self) -> usize {
        Self::count_digits(self.line_count()).max(MIN_GUTTER_DIGITS) + 1
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(UNTITLED)
        .to_owned()
}
