//! OFF reader: header, vertex list, then faces as index lists (0-based).
//! OFF faces carry no hole rings.

use std::path::Path;

use crate::error::ParseError;
use crate::math::Point3;
use crate::model::{Polygon, Ring, Shell};

use super::{content_lines, syntax, unexpected_eof};

/// Reads a shell from an OFF file.
///
/// # Errors
///
/// Returns an error when the file cannot be read or parsed.
pub fn read(path: &Path) -> Result<Shell, ParseError> {
    let name = path.display().to_string();
    let input = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: name.clone(),
        source,
    })?;
    parse_str(&input, &name)
}

/// Parses OFF content. `path` is only used in error messages.
///
/// # Errors
///
/// Returns an error describing the first malformed line.
pub fn parse_str(input: &str, path: &str) -> Result<Shell, ParseError> {
    let mut lines = content_lines(input);

    let (line_no, first) = lines.next().ok_or_else(|| unexpected_eof(path, "OFF header"))?;
    let counts_line = if let Some(rest) = first.strip_prefix("OFF") {
        let rest = rest.trim();
        if rest.is_empty() {
            let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "counts"))?;
            (line_no, line)
        } else {
            // Counts on the header line.
            (line_no, rest)
        }
    } else {
        return Err(syntax(path, line_no, "missing OFF header"));
    };

    let (line_no, counts) = counts_line;
    let counts = parse_numbers(counts, path, line_no)?;
    if counts.len() < 2 {
        return Err(syntax(path, line_no, "counts line needs vertices and faces"));
    }
    let vertex_count = as_count(counts[0], path, line_no)?;
    let face_count = as_count(counts[1], path, line_no)?;

    let mut vertices = Vec::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "a vertex"))?;
        let fields = parse_numbers(line, path, line_no)?;
        if fields.len() < 3 {
            return Err(syntax(path, line_no, "vertex needs 3 coordinates"));
        }
        vertices.push(Point3::new(fields[0], fields[1], fields[2]));
    }

    let mut polygons = Vec::with_capacity(face_count);
    for _ in 0..face_count {
        let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "a face"))?;
        let fields = parse_numbers(line, path, line_no)?;
        if fields.is_empty() {
            return Err(syntax(path, line_no, "face needs a corner count"));
        }
        let corners = as_count(fields[0], path, line_no)?;
        if fields.len() < corners + 1 {
            return Err(syntax(
                path,
                line_no,
                format!("face announces {corners} corners but lists fewer"),
            ));
        }
        let mut points = Vec::with_capacity(corners);
        for field in &fields[1..=corners] {
            let index = as_count(*field, path, line_no)?;
            let point = vertices
                .get(index)
                .ok_or_else(|| syntax(path, line_no, format!("vertex index {index} out of range")))?;
            points.push(*point);
        }
        polygons.push(Polygon::new(Ring::implicit(points), vec![]));
    }

    Ok(Shell::new(polygons))
}

fn parse_numbers(line: &str, path: &str, line_no: usize) -> Result<Vec<f64>, ParseError> {
    line.split_whitespace()
        .map(|tok| {
            tok.parse::<f64>()
                .map_err(|_| syntax(path, line_no, format!("not a number: {tok:?}")))
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn as_count(value: f64, path: &str, line_no: usize) -> Result<usize, ParseError> {
    if value < 0.0 || value.fract().abs() > f64::EPSILON {
        return Err(syntax(path, line_no, format!("expected a count, got {value}")));
    }
    Ok(value as usize)
}
