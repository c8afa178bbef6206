//! TetGen-style POLY reader: a node list followed by a facet list. Each
//! facet holds one outer polygon and optional extra polygons read as hole
//! rings; facet hole points are skipped.

use std::collections::HashMap;
use std::path::Path;

use crate::error::ParseError;
use crate::math::Point3;
use crate::model::{Polygon, Ring, Shell};

use super::{content_lines, syntax, unexpected_eof};

/// Reads a shell from a POLY file.
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

/// Parses POLY content. `path` is only used in error messages.
///
/// # Errors
///
/// Returns an error describing the first malformed line.
pub fn parse_str(input: &str, path: &str) -> Result<Shell, ParseError> {
    let mut lines = content_lines(input);

    let (line_no, header) = lines.next().ok_or_else(|| unexpected_eof(path, "node header"))?;
    let header = parse_numbers(header, path, line_no)?;
    if header.len() < 2 {
        return Err(syntax(path, line_no, "node header needs a count and a dimension"));
    }
    let vertex_count = as_count(header[0], path, line_no)?;
    if (header[1] - 3.0).abs() > f64::EPSILON {
        return Err(syntax(path, line_no, "only dimension 3 is supported"));
    }

    let mut vertices: HashMap<i64, Point3> = HashMap::with_capacity(vertex_count);
    for _ in 0..vertex_count {
        let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "a vertex"))?;
        let fields = parse_numbers(line, path, line_no)?;
        if fields.len() < 4 {
            return Err(syntax(path, line_no, "vertex needs an index and 3 coordinates"));
        }
        #[allow(clippy::cast_possible_truncation)]
        let index = fields[0] as i64;
        vertices.insert(index, Point3::new(fields[1], fields[2], fields[3]));
    }

    let (line_no, header) = lines.next().ok_or_else(|| unexpected_eof(path, "facet header"))?;
    let header = parse_numbers(header, path, line_no)?;
    if header.is_empty() {
        return Err(syntax(path, line_no, "facet header needs a count"));
    }
    let facet_count = as_count(header[0], path, line_no)?;

    let mut polygons = Vec::with_capacity(facet_count);
    for _ in 0..facet_count {
        let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "a facet"))?;
        let counts = parse_numbers(line, path, line_no)?;
        if counts.is_empty() {
            return Err(syntax(path, line_no, "facet needs a polygon count"));
        }
        let ring_count = as_count(counts[0], path, line_no)?;
        let hole_point_count = if counts.len() > 1 {
            as_count(counts[1], path, line_no)?
        } else {
            0
        };
        if ring_count == 0 {
            return Err(syntax(path, line_no, "facet with no polygons"));
        }

        let mut rings = Vec::with_capacity(ring_count);
        for _ in 0..ring_count {
            let (line_no, line) = lines.next().ok_or_else(|| unexpected_eof(path, "a polygon"))?;
            rings.push(parse_ring(line, &vertices, path, line_no)?);
        }
        // Facet hole points locate holes for tetrahedralization; the rings
        // themselves already carry everything the validator needs.
        for _ in 0..hole_point_count {
            lines.next().ok_or_else(|| unexpected_eof(path, "a facet hole point"))?;
        }

        let mut rings = rings.into_iter();
        let outer = match rings.next() {
            Some(r) => r,
            None => return Err(syntax(path, line_no, "facet with no polygons")),
        };
        polygons.push(Polygon::new(outer, rings.collect()));
    }

    // Trailing hole and region sections are irrelevant here.
    Ok(Shell::new(polygons))
}

fn parse_ring(
    line: &str,
    vertices: &HashMap<i64, Point3>,
    path: &str,
    line_no: usize,
) -> Result<Ring, ParseError> {
    let fields = parse_numbers(line, path, line_no)?;
    if fields.is_empty() {
        return Err(syntax(path, line_no, "polygon needs a corner count"));
    }
    let corners = as_count(fields[0], path, line_no)?;
    if fields.len() < corners + 1 {
        return Err(syntax(
            path,
            line_no,
            format!("polygon announces {corners} corners but lists fewer"),
        ));
    }
    let mut points = Vec::with_capacity(corners);
    for field in &fields[1..=corners] {
        #[allow(clippy::cast_possible_truncation)]
        let index = *field as i64;
        let point = vertices
            .get(&index)
            .ok_or_else(|| syntax(path, line_no, format!("unknown vertex index {index}")))?;
        points.push(*point);
    }
    Ok(Ring::implicit(points))
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

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CUBE: &str = "\
# unit cube
8 3 0 0
1  0 0 0
2  1 0 0
3  1 1 0
4  0 1 0
5  0 0 1
6  1 0 1
7  1 1 1
8  0 1 1
6 0
1
4  1 4 3 2
1
4  5 6 7 8
1
4  1 2 6 5
1
4  3 4 8 7
1
4  1 5 8 4
1
4  2 3 7 6
";

    #[test]
    fn parses_cube() {
        let shell = parse_str(CUBE, "cube.poly").unwrap();
        assert_eq!(shell.polygons().len(), 6);
        assert_eq!(shell.polygons()[0].outer().points().len(), 4);
        assert!(shell.polygons()[0].holes().is_empty());
    }

    #[test]
    fn facet_with_two_rings_becomes_hole() {
        let input = "\
8 3 0 0
1  0 0 0
2  4 0 0
3  4 4 0
4  0 4 0
5  1 1 0
6  3 1 0
7  3 3 0
8  1 3 0
1 0
2 1
4  1 2 3 4
4  5 8 7 6
2.0 2.0 0.0
";
        let shell = parse_str(input, "hole.poly").unwrap();
        assert_eq!(shell.polygons().len(), 1);
        assert_eq!(shell.polygons()[0].holes().len(), 1);
    }

    #[test]
    fn zero_based_indices_accepted() {
        let input = "\
3 3 0 0
0  0 0 0
1  1 0 0
2  0 1 0
1 0
1
3  0 1 2
";
        let shell = parse_str(input, "tri.poly").unwrap();
        assert_eq!(shell.polygons().len(), 1);
        assert_eq!(shell.polygons()[0].outer().points().len(), 3);
    }

    #[test]
    fn unknown_vertex_index_is_an_error() {
        let input = "\
3 3 0 0
1  0 0 0
2  1 0 0
3  0 1 0
1 0
1
3  1 2 9
";
        let err = parse_str(input, "bad.poly").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("bad.poly"), "{text}");
        assert!(text.contains('9'), "{text}");
    }

    #[test]
    fn truncated_file_is_an_error() {
        let input = "\
8 3 0 0
1  0 0 0
";
        assert!(parse_str(input, "cut.poly").is_err());
    }

    #[test]
    fn garbage_token_reports_line_number() {
        let input = "\
3 3 0 0
1  0 0 zero
2  1 0 0
3  0 1 0
1 0
1
3  1 2 3
";
        let err = parse_str(input, "junk.poly").unwrap_err();
        assert!(err.to_string().contains("junk.poly:2"), "{err}");
    }
}
