use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::model::{Sample, SampleSet};

/// Token index of the `z` column.
pub const Z_FIELD: usize = 1;
/// Token index of the `v` column.
pub const V_FIELD: usize = 2;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// What went wrong on a single line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseIssue {
    #[error("expected a value at field {index}, but the line has only {found} field(s)")]
    MissingField { index: usize, found: usize },

    #[error("field {index} ('{token}') is not a number")]
    InvalidFloat { index: usize, token: String },
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("sample file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(
        "failed to read line {line}{}",
        path.as_ref().map(|p| format!(" of {}", p.display())).unwrap_or_default()
    )]
    Read {
        /// Set by [`load_file`]; `None` for bare readers.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {issue}: '{content}'")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Raw line text without the line terminator.
        content: String,
        issue: ParseIssue,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sample file from disk.
///
/// Layout: one sample per line, whitespace separated. Lines starting with
/// `#` are comments. Field 1 is `z`, field 2 is `v`; every other field is
/// ignored.
///
/// ```text
/// # t z z_dot
/// 0.0000000000 0.1000000000 0.0000000000
/// 6.2831853072 0.0981234567 0.0123456789
/// ```
pub fn load_file(path: &Path) -> Result<SampleSet, LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    parse_samples(BufReader::new(file)).map_err(|e| match e {
        LoadError::Read { line, source, .. } => LoadError::Read {
            path: Some(path.to_path_buf()),
            line,
            source,
        },
        other => other,
    })
}

/// Parse samples from any buffered reader. Stops at the first bad line.
pub fn parse_samples<R: BufRead>(reader: R) -> Result<SampleSet, LoadError> {
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| LoadError::Read {
            path: None,
            line: idx + 1,
            source,
        })?;

        if is_comment(&line) {
            continue;
        }

        let sample = parse_line(&line).map_err(|issue| LoadError::Parse {
            line: idx + 1,
            content: line.clone(),
            issue,
        })?;
        samples.push(sample);
    }

    Ok(SampleSet::from_samples(samples))
}

/// First character only; indented `#` is not a comment.
pub fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

/// Extract `(z, v)` from one non-comment line.
pub fn parse_line(line: &str) -> Result<Sample, ParseIssue> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let z = parse_field(&tokens, Z_FIELD)?;
    let v = parse_field(&tokens, V_FIELD)?;
    Ok(Sample::new(z, v))
}

fn parse_field(tokens: &[&str], index: usize) -> Result<f64, ParseIssue> {
    let token = tokens.get(index).ok_or(ParseIssue::MissingField {
        index,
        found: tokens.len(),
    })?;
    token.parse::<f64>().map_err(|_| ParseIssue::InvalidFloat {
        index,
        token: token.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn parse(text: &str) -> Result<SampleSet, LoadError> {
        parse_samples(Cursor::new(text))
    }

    #[test]
    fn reads_header_and_three_samples() {
        let set = parse("# header\n0 0.0 1.0\n1 0.5 0.9\n2 1.0 0.0\n").unwrap();
        assert_eq!(set.z(), vec![0.0, 0.5, 1.0]);
        assert_eq!(set.v(), vec![1.0, 0.9, 0.0]);
    }

    #[test]
    fn ignores_leading_and_trailing_fields() {
        let sample = parse_line("0 1.5 -0.25 extra").unwrap();
        assert_eq!(sample, Sample::new(1.5, -0.25));
    }

    #[test]
    fn splits_on_runs_of_whitespace() {
        let sample = parse_line("  7\t\t2.5    3e-2  ").unwrap();
        assert_eq!(sample, Sample::new(2.5, 0.03));
    }

    #[test]
    fn comments_never_contribute() {
        let set = parse("#0 1 2\n# 0 abc\n#\n3 4.0 5.0").unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.samples()[0], Sample::new(4.0, 5.0));
    }

    #[test]
    fn sample_count_matches_non_comment_lines() {
        let text = "# a\n0 1 2\n# b\n1 2 3\n2 3 4\n# c\n";
        let non_comment = text.lines().filter(|l| !l.starts_with('#')).count();
        assert_eq!(parse(text).unwrap().len(), non_comment);
    }

    #[test]
    fn only_comments_or_empty_yields_empty_set() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("# one\n# two\n").unwrap().is_empty());
    }

    #[test]
    fn indented_hash_is_not_a_comment() {
        let err = parse(" # not a comment\n").unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 1, .. }));
    }

    #[test]
    fn non_numeric_z_fails() {
        match parse("0 abc 1.0").unwrap_err() {
            LoadError::Parse {
                line,
                content,
                issue,
            } => {
                assert_eq!(line, 1);
                assert_eq!(content, "0 abc 1.0");
                assert_eq!(
                    issue,
                    ParseIssue::InvalidFloat {
                        index: 1,
                        token: "abc".into()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_v_fails_with_line_number() {
        match parse("# h\n0 1 2\n0 1.0\n").unwrap_err() {
            LoadError::Parse { line, issue, .. } => {
                assert_eq!(line, 3);
                assert_eq!(issue, ParseIssue::MissingField { index: 2, found: 2 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn blank_line_fails() {
        let err = parse("0 1 2\n\n1 2 3\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                line: 2,
                issue: ParseIssue::MissingField { index: 1, found: 0 },
                ..
            }
        ));
    }

    #[test]
    fn error_message_names_line_and_content() {
        let msg = parse("0 1.0").unwrap_err().to_string();
        assert!(msg.contains("line 1"));
        assert!(msg.contains("'0 1.0'"));
    }

    #[test]
    fn parsing_twice_is_identical() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# t z v\n0 0.1 0.2\n1 -0.3 0.4\n2 0.5 -0.6").unwrap();
        let a = load_file(file.path()).unwrap();
        let b = load_file(file.path()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("portrait.txt")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }

    #[test]
    fn read_error_carries_path_and_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"0 1 2\n\xff\xfe 1 2\n").unwrap();
        match load_file(file.path()).unwrap_err() {
            LoadError::Read { path, line, .. } => {
                assert_eq!(path.as_deref(), Some(file.path()));
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn read_error_from_bare_reader_names_the_line() {
        let err = parse_samples(Cursor::new(&b"# ok\n0 1 2\n\xff 1 2\n"[..])).unwrap_err();
        assert!(matches!(err, LoadError::Read { path: None, line: 3, .. }));
        assert_eq!(err.to_string(), "failed to read line 3");
    }
}
