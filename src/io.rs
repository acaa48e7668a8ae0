//! Loading of two-dimensional point sets from tab delimited text files.
//!
//! Every non-blank line holds exactly two numbers separated by a tab:
//! ```text
//! 3.275154	2.957587
//! -3.344465	2.603513
//! ```

use crate::error::{KMeansError, Result};
use crate::memory::Matrix;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const FIELDS_PER_LINE: usize = 2;

/// Read the point file at **path** into a `rows × 2` matrix.
pub fn load_points(path: impl AsRef<Path>) -> Result<Matrix<f64>> {
    let path = path.as_ref();
    let points = parse_points(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), rows = points.rows(), "loaded points");
    Ok(points)
}

/// Parse tab delimited points from **reader**. Line numbers in errors are 1-based.
pub fn parse_points<R: BufRead>(reader: R) -> Result<Matrix<f64>> {
    let mut data = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() != FIELDS_PER_LINE {
            return Err(KMeansError::Parse {
                line: idx + 1,
                reason: format!("expected {} tab separated fields, found {}", FIELDS_PER_LINE, fields.len()),
            });
        }
        for field in fields {
            let value = field.trim().parse::<f64>().map_err(|e| KMeansError::Parse {
                line: idx + 1,
                reason: format!("cannot convert {:?} to a number: {}", field, e),
            })?;
            data.push(value);
        }
    }
    if data.is_empty() {
        return Err(KMeansError::invalid_input("point file contains no points"));
    }
    let rows = data.len() / FIELDS_PER_LINE;
    Matrix::from_vec(data, rows, FIELDS_PER_LINE)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn parse_lines() {
        let points = parse_points(Cursor::new("1.5\t2\n-3\t4.25\r\n\n")).unwrap();
        assert_eq!((points.rows(), points.cols()), (2, 2));
        assert_eq!(points.as_slice(), &[1.5, 2.0, -3.0, 4.25]);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(parse_points(Cursor::new("1\t2\n3\n")), Err(KMeansError::Parse { line: 2, .. })));
        assert!(matches!(parse_points(Cursor::new("1\t2\t3\n")), Err(KMeansError::Parse { line: 1, .. })));
        assert!(matches!(parse_points(Cursor::new("1\tabc\n")), Err(KMeansError::Parse { line: 1, .. })));
        assert!(matches!(parse_points(Cursor::new("")), Err(KMeansError::InvalidInput { .. })));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "103.29\t209.6594").unwrap();
        writeln!(file, "125.93\t230.3988").unwrap();
        file.flush().unwrap();

        let points = load_points(file.path()).unwrap();
        assert_eq!(points.rows(), 2);
        assert_eq!(points.row(1), &[125.93, 230.3988]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let res = load_points(dir.path().join("does-not-exist.tsv"));
        assert!(matches!(res, Err(KMeansError::Io(_))));
    }
}
