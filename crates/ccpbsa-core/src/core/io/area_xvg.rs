use super::ScrapeError;

const FILE: &str = "area.xvg";

/// Total solvent-accessible surface area: column 2 of the final data row of
/// the SASA tool's `.xvg` table (column 1 is the time/frame axis).
pub fn parse_total_area(text: &str) -> Result<f64, ScrapeError> {
    let row = last_data_row(text)?;
    column(&row, 1)
}

/// Interaction surface for a two-chain complex. The per-group output columns
/// are total (complex), chain A, chain B; the buried interaction area is
/// `areaA + areaB - areaComplex`.
pub fn parse_interaction_area(text: &str) -> Result<f64, ScrapeError> {
    let row = last_data_row(text)?;
    let complex = column(&row, 1)?;
    let chain_a = column(&row, 2)?;
    let chain_b = column(&row, 3)?;
    Ok(chain_a + chain_b - complex)
}

/// Fields of the last non-comment row. `.xvg` metadata lines start with `#`
/// or `@`.
fn last_data_row(text: &str) -> Result<Vec<String>, ScrapeError> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('@'))
        .next_back()
        .map(|l| l.split_whitespace().map(str::to_string).collect())
        .ok_or(ScrapeError::Empty { file: FILE })
}

fn column(row: &[String], idx: usize) -> Result<f64, ScrapeError> {
    let value = row.get(idx).ok_or(ScrapeError::MissingColumn {
        file: FILE,
        expected: idx + 1,
        found: row.len(),
    })?;
    value
        .parse::<f64>()
        .map_err(|_| ScrapeError::MalformedValue {
            file: FILE,
            value: value.clone(),
            message: "expected a floating point area",
        })
}
