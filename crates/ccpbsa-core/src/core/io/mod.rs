//! Parsers for the text output of the wrapped external tools.
//!
//! Every file read back by the aggregation stage has a fixed name and a fixed
//! schema (a labelled line within a known trailing window, or a whitespace
//! table whose last row carries the result). Each parser here encodes one
//! such schema and returns a typed error when the output does not match,
//! instead of silently tolerating truncated logs.

pub mod area_xvg;
pub mod energy_log;
pub mod entropy_log;
pub mod solvation_log;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ScrapeError {
    #[error("No '{label}' line within the last {window} line(s) of {file}")]
    MissingLabel {
        label: &'static str,
        window: usize,
        file: &'static str,
    },

    #[error("{file} is empty or has no data rows")]
    Empty { file: &'static str },

    #[error("Malformed value '{value}' in {file}: {message}")]
    MalformedValue {
        file: &'static str,
        value: String,
        message: &'static str,
    },

    #[error("{file} data row has {found} column(s), expected at least {expected}")]
    MissingColumn {
        file: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Extract the numeric value between `label` and a trailing `kJ` unit marker,
/// tolerating an optional `=` or `:` delimiter after the label.
fn labelled_kilojoules(
    line: &str,
    label: &'static str,
    file: &'static str,
) -> Result<f64, ScrapeError> {
    let after = &line[line.find(label).expect("caller checked label") + label.len()..];
    let numeric = after.split("kJ").next().unwrap_or(after);
    let numeric = numeric.trim().trim_start_matches(['=', ':']).trim();
    numeric
        .parse::<f64>()
        .map_err(|_| ScrapeError::MalformedValue {
            file,
            value: numeric.to_string(),
            message: "expected a floating point energy before the kJ unit",
        })
}

/// The trailing `n` non-empty lines of `text`, oldest first.
fn tail_lines(text: &str, n: usize) -> Vec<&str> {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].to_vec()
}
