//! Readers turning POLY and OFF files into [`Shell`]s.
//!
//! A file that cannot be parsed is rejected with a [`ParseError`]; parse
//! trouble never turns into defect codes and never into a "valid" verdict.

pub mod off;
pub mod poly;

use std::path::Path;

use crate::error::{ParseError, Result};
use crate::model::Shell;

/// Reads one shell from a file, dispatching on the extension.
///
/// # Errors
///
/// Returns an error for unreadable files, malformed content, or an
/// extension that is neither `.poly` nor `.off`.
pub fn read_shell(path: &Path) -> Result<Shell> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("poly") => Ok(poly::read(path)?),
        Some("off") => Ok(off::read(path)?),
        _ => Err(ParseError::UnknownFormat(path.display().to_string()).into()),
    }
}

/// Splits input into content lines, skipping blanks and `#` comments and
/// keeping 1-based line numbers for error reporting.
fn content_lines(input: &str) -> impl Iterator<Item = (usize, &str)> {
    input.lines().enumerate().filter_map(|(i, line)| {
        let line = match line.find('#') {
            Some(pos) => &line[..pos],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            None
        } else {
            Some((i + 1, line))
        }
    })
}

fn syntax(path: &str, line: usize, message: impl Into<String>) -> ParseError {
    ParseError::Syntax {
        path: path.to_string(),
        line,
        message: message.into(),
    }
}

fn unexpected_eof(path: &str, expected: &str) -> ParseError {
    ParseError::Syntax {
        path: path.to_string(),
        line: 0,
        message: format!("unexpected end of file, expected {expected}"),
    }
}
