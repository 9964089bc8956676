use std::fs::{self, File};
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use crate::error::{NjError, NjResult};
use crate::phylo::DistanceMatrix;

/// Reads one PHYLIP square distance matrix: the taxon count on the first
/// line, then one line per taxon holding the label followed by `n`
/// whitespace-separated distances. Blank lines are skipped.
pub fn from_reader<R: BufRead>(reader: R) -> NjResult<DistanceMatrix> {
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    let header = loop {
        let line = match lines.next() {
            Some(line) => line?,
            None => {
                return Err(NjError::PhylipFormat {
                    msg: "missing taxon count line",
                    line: line_no,
                })
            }
        };
        line_no += 1;
        if !line.trim().is_empty() {
            break line;
        }
    };
    let n: usize = header.trim().parse().map_err(|_| NjError::PhylipFormat {
        msg: "taxon count is not an integer",
        line: line_no,
    })?;

    let mut labels: Vec<Box<str>> = Vec::with_capacity(n);
    let mut data: Vec<f64> = Vec::with_capacity(n * n);

    for _ in 0..n {
        let row = loop {
            let line = match lines.next() {
                Some(line) => line?,
                None => {
                    return Err(NjError::PhylipFormat {
                        msg: "missing matrix row",
                        line: line_no,
                    })
                }
            };
            line_no += 1;
            if !line.trim().is_empty() {
                break line;
            }
        };

        let mut fields = row.split_whitespace();
        let label = fields.next().ok_or(NjError::PhylipFormat {
            msg: "missing taxon label",
            line: line_no,
        })?;
        labels.push(label.into());

        let mut row_len = 0usize;
        for field in fields {
            let value: f64 = field.parse().map_err(|_| NjError::PhylipFormat {
                msg: "invalid distance value",
                line: line_no,
            })?;
            data.push(value);
            row_len += 1;
        }
        if row_len != n {
            return Err(NjError::PhylipFormat {
                msg: "wrong number of distances in row",
                line: line_no,
            });
        }
    }

    DistanceMatrix::new(labels, data)
}

pub fn from_str(input: &str) -> NjResult<DistanceMatrix> {
    from_reader(Cursor::new(input))
}

pub fn from_path(path: impl AsRef<Path>) -> NjResult<DistanceMatrix> {
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}

/// Reads every file of a directory as a PHYLIP matrix, sorted by file name
/// so batch runs stay reproducible. Returns (file name, matrix) pairs.
pub fn read_dir(dir: impl AsRef<Path>) -> NjResult<Vec<(Box<str>, DistanceMatrix)>> {
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .collect();
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let name: Box<str> = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .into();
        out.push((name, from_path(&path)?));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_TAXA: &str = "3\n\
        A 0.00 0.25 0.50\n\
        B 0.25 0.00 0.75\n\
        C 0.50 0.75 0.00\n";

    #[test]
    fn parses_square_matrix() {
        let dm = from_str(THREE_TAXA).unwrap();
        assert_eq!(dm.n(), 3);
        assert_eq!(dm.labels()[0].as_ref(), "A");
        assert_eq!(dm.labels()[2].as_ref(), "C");
        assert!((dm.get(0, 1) - 0.25).abs() < 1e-12);
        assert!((dm.get(2, 1) - 0.75).abs() < 1e-12);
        assert_eq!(dm.get(1, 1), 0.0);
    }

    #[test]
    fn skips_blank_lines() {
        let input = "\n2\n\nA 0.0 1.5\n\nB 1.5 0.0\n";
        let dm = from_str(input).unwrap();
        assert_eq!(dm.n(), 2);
        assert!((dm.get(0, 1) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_count() {
        let err = from_str("three\nA 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            NjError::PhylipFormat {
                msg: "taxon count is not an integer",
                line: 1
            }
        ));
    }

    #[test]
    fn rejects_truncated_input() {
        let err = from_str("3\nA 0.00 0.25 0.50\n").unwrap_err();
        assert!(matches!(
            err,
            NjError::PhylipFormat {
                msg: "missing matrix row",
                ..
            }
        ));
    }

    #[test]
    fn rejects_short_row() {
        let err = from_str("2\nA 0.0 1.0\nB 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            NjError::PhylipFormat {
                msg: "wrong number of distances in row",
                line: 3
            }
        ));
    }

    #[test]
    fn rejects_bad_distance() {
        let err = from_str("2\nA 0.0 x\nB 1.0 0.0\n").unwrap_err();
        assert!(matches!(
            err,
            NjError::PhylipFormat {
                msg: "invalid distance value",
                line: 2
            }
        ));
    }

    #[test]
    fn rejects_asymmetric_matrix() {
        let input = "2\nA 0.0 1.0\nB 2.0 0.0\n";
        let err = from_str(input).unwrap_err();
        assert!(matches!(err, NjError::AsymmetricDistance { i: 0, j: 1, .. }));
    }

    #[test]
    fn reads_directory_sorted() {
        let dir = std::env::temp_dir().join("njtree_phylip_read_dir_test");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("b.phy"), "1\nSolo 0.0\n").unwrap();
        fs::write(dir.join("a.phy"), THREE_TAXA).unwrap();

        let inputs = read_dir(&dir).unwrap();
        fs::remove_dir_all(&dir).unwrap();

        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].0.as_ref(), "a.phy");
        assert_eq!(inputs[0].1.n(), 3);
        assert_eq!(inputs[1].0.as_ref(), "b.phy");
        assert_eq!(inputs[1].1.n(), 1);
    }
}
