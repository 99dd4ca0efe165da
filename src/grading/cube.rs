//! Reader for the `.cube` 3D LUT format.
//!
//! ```text
//! TITLE "Warm Film"
//! LUT_3D_SIZE 33
//! DOMAIN_MIN 0.0 0.0 0.0
//! DOMAIN_MAX 1.0 1.0 1.0
//! 0.0 0.0 0.0
//! ...
//! ```
//!
//! Data lines are stored red-fastest, then green, then blue.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use tracing::debug;

use crate::error::LutError;
use crate::grading::Lut3D;

/// Read a 3D LUT from a `.cube` file
pub fn read_cube<P: AsRef<Path>>(path: P) -> Result<Lut3D, LutError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LutError::NotFound { path: path.display().to_string() },
        _ => LutError::Io(e),
    })?;
    parse_cube(BufReader::new(file))
}

/// Parse a 3D LUT from any buffered reader
pub fn parse_cube<R: BufRead>(reader: R) -> Result<Lut3D, LutError> {
    let mut size: Option<usize> = None;
    let mut title: Option<String> = None;
    let mut domain_min = [0.0_f32; 3];
    let mut domain_max = [1.0_f32; 3];
    let mut data: Vec<[f32; 3]> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let keyword = line.split_whitespace().next().unwrap_or_default();
        match keyword {
            "TITLE" => {
                title = Some(line["TITLE".len()..].trim().trim_matches('"').to_string());
            }
            "LUT_3D_SIZE" => size = Some(parse_size(line)?),
            "LUT_1D_SIZE" => return Err(parse_error("expected 3D LUT, found 1D")),
            "DOMAIN_MIN" => domain_min = parse_triplet(line, 1)?,
            "DOMAIN_MAX" => domain_max = parse_triplet(line, 1)?,
            "LUT_3D_INPUT_RANGE" => {
                let [lo, hi] = parse_range(line)?;
                domain_min = [lo; 3];
                domain_max = [hi; 3];
            }
            _ if keyword.starts_with(|c: char| c.is_ascii_alphabetic()) => {
                debug!("Ignoring unsupported .cube keyword {}", keyword);
            }
            _ => data.push(parse_triplet(line, 0)?),
        }
    }

    let size = size.ok_or_else(|| parse_error("missing LUT_3D_SIZE"))?;
    let lut = Lut3D::from_data(data, size)?.with_domain(domain_min, domain_max)?;

    Ok(match title {
        Some(title) => lut.with_title(title),
        None => lut,
    })
}

fn parse_error(reason: impl Into<String>) -> LutError {
    LutError::ParseFailed { reason: reason.into() }
}

fn parse_size(line: &str) -> Result<usize, LutError> {
    line.split_whitespace()
        .nth(1)
        .ok_or_else(|| parse_error("invalid size line"))?
        .parse()
        .map_err(|_| parse_error(format!("invalid size value: {}", line)))
}

fn parse_range(line: &str) -> Result<[f32; 2], LutError> {
    let values: Vec<f32> = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<f32>())
        .collect::<Result<_, _>>()
        .map_err(|_| parse_error(format!("invalid range line: {}", line)))?;

    match values.as_slice() {
        [lo, hi] => Ok([*lo, *hi]),
        _ => Err(parse_error(format!("invalid range line: {}", line))),
    }
}

fn parse_triplet(line: &str, skip: usize) -> Result<[f32; 3], LutError> {
    let mut parts = line.split_whitespace().skip(skip);
    let mut out = [0.0_f32; 3];

    for value in out.iter_mut() {
        let token = parts
            .next()
            .ok_or_else(|| parse_error(format!("expected three values: {}", line)))?;
        *value = token
            .parse()
            .map_err(|_| parse_error(format!("invalid number '{}' in: {}", token, line)))?;
        if !value.is_finite() {
            return Err(parse_error(format!("non-finite value in: {}", line)));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    const IDENTITY_2: &str = r#"
# Test LUT
TITLE "Test Grade"
LUT_3D_SIZE 2
DOMAIN_MIN 0.0 0.0 0.0
DOMAIN_MAX 1.0 1.0 1.0

0.0 0.0 0.0
1.0 0.0 0.0
0.0 1.0 0.0
1.0 1.0 0.0
0.0 0.0 1.0
1.0 0.0 1.0
0.0 1.0 1.0
1.0 1.0 1.0
"#;

    #[test]
    fn test_parse_identity() {
        let lut = parse_cube(Cursor::new(IDENTITY_2)).unwrap();

        assert_eq!(lut.size(), 2);
        assert_eq!(lut.title(), Some("Test Grade"));
        let out = lut.apply([0.25, 0.5, 0.75]);
        for (a, b) in out.iter().zip([0.25, 0.5, 0.75]) {
            assert!((a - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_red_fastest_ordering() {
        // Red output only where the red input is high
        let cube = "LUT_3D_SIZE 2\n\
            0 0 0\n1 0 0\n0 0 0\n1 0 0\n0 0 0\n1 0 0\n0 0 0\n1 0 0\n";
        let lut = parse_cube(Cursor::new(cube)).unwrap();

        assert_eq!(lut.apply([1.0, 0.0, 0.0]), [1.0, 0.0, 0.0]);
        assert_eq!(lut.apply([0.0, 1.0, 1.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_missing_size() {
        let result = parse_cube(Cursor::new("0 0 0\n"));
        assert!(matches!(result, Err(LutError::ParseFailed { .. })));
    }

    #[test]
    fn test_wrong_entry_count() {
        let result = parse_cube(Cursor::new("LUT_3D_SIZE 2\n0 0 0\n1 1 1\n"));
        assert!(matches!(result, Err(LutError::ParseFailed { .. })));
    }

    #[test]
    fn test_rejects_1d() {
        let result = parse_cube(Cursor::new("LUT_1D_SIZE 2\n0 0 0\n1 1 1\n"));
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_garbage_numbers() {
        let mut cube = String::from("LUT_3D_SIZE 2\n");
        for _ in 0..7 {
            cube.push_str("0 0 0\n");
        }
        cube.push_str("0 zero 0\n");
        assert!(parse_cube(Cursor::new(cube)).is_err());
    }

    #[test]
    fn test_input_range_sets_domain() {
        let mut cube = String::from("LUT_3D_INPUT_RANGE 0.0 2.0\nLUT_3D_SIZE 2\n");
        for b in 0..2 {
            for g in 0..2 {
                for r in 0..2 {
                    cube.push_str(&format!("{} {} {}\n", r, g, b));
                }
            }
        }
        let lut = parse_cube(Cursor::new(cube)).unwrap();

        // 1.0 sits halfway through a 0..2 domain
        let out = lut.apply([1.0, 1.0, 1.0]);
        assert!((out[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        let result = read_cube(dir.path().join("absent.cube"));
        assert!(matches!(result, Err(LutError::NotFound { .. })));
    }
}
