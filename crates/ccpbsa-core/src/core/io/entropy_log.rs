use super::ScrapeError;

const FILE: &str = "entropy.log";
const UNIT: &str = " J/mol K";
const MARKER: &str = "is ";

/// Parse the Schlitter entropy estimate from the eigen-decomposition tool's
/// output. The value sits between `is ` and ` J/mol K` on the reporting line
/// (normally the first line of the log) and is returned in J/(mol·K); the
/// aggregator converts it into the −TS term.
pub fn parse_entropy(text: &str) -> Result<f64, ScrapeError> {
    let line = text
        .lines()
        .find(|l| l.contains(UNIT) && l.contains(MARKER))
        .ok_or(ScrapeError::MissingLabel {
            label: "J/mol K",
            window: 1,
            file: FILE,
        })?;

    let start = line.find(MARKER).expect("checked above") + MARKER.len();
    let end = line.find(UNIT).expect("checked above");
    if end <= start {
        return Err(ScrapeError::MalformedValue {
            file: FILE,
            value: line.to_string(),
            message: "unit marker precedes the value",
        });
    }
    let value = line[start..end].trim();
    value
        .parse::<f64>()
        .map_err(|_| ScrapeError::MalformedValue {
            file: FILE,
            value: value.to_string(),
            message: "expected a floating point entropy",
        })
}
