use super::ScrapeError;

const FILE: &str = "energy log";

/// Parse the captured output of a `gmx energy` run (`lj.log`, `coulomb.log`).
///
/// The tool prints a summary table whose final row is the requested term sum;
/// the energy average is the second whitespace-separated column of that row.
pub fn parse_final_energy(text: &str) -> Result<f64, ScrapeError> {
    let last = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .next_back()
        .ok_or(ScrapeError::Empty { file: FILE })?;

    let fields: Vec<&str> = last.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(ScrapeError::MissingColumn {
            file: FILE,
            expected: 2,
            found: fields.len(),
        });
    }
    fields[1]
        .parse::<f64>()
        .map_err(|_| ScrapeError::MalformedValue {
            file: FILE,
            value: fields[1].to_string(),
            message: "expected the averaged energy in column 2",
        })
}
