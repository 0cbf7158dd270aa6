use super::term::EnergyTerm;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Unknown variant key '{0}'")]
    UnknownKey(String),

    #[error("Table has no '{label}' column")]
    UnknownTerm { label: &'static str },

    #[error("Cell [{key}, {label}] has not been populated")]
    MissingCell { key: String, label: &'static str },

    #[error("Table has no rows")]
    Empty,

    #[error("CSV header column '{0}' is not a known energy term")]
    UnknownColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A variant-by-term energy table.
///
/// Row 0 is always the wildtype/reference entry. Cells start out unpopulated
/// (`None`) so that a value never written by an evaluator cannot be mistaken
/// for a real zero-valued energy; arithmetic on an unpopulated cell is a
/// [`TableError::MissingCell`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyTable {
    terms: Vec<EnergyTerm>,
    keys: Vec<String>,
    cells: Vec<Vec<Option<f64>>>,
}

impl EnergyTable {
    pub fn new<K, S>(terms: &[EnergyTerm], keys: K) -> Self
    where
        K: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let cells = vec![vec![None; terms.len()]; keys.len()];
        Self {
            terms: terms.to_vec(),
            keys,
            cells,
        }
    }

    pub fn terms(&self) -> &[EnergyTerm] {
        &self.terms
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// The wildtype/reference row key (row 0).
    pub fn reference_key(&self) -> Result<&str, TableError> {
        self.keys.first().map(String::as_str).ok_or(TableError::Empty)
    }

    fn row_index(&self, key: &str) -> Result<usize, TableError> {
        self.keys
            .iter()
            .position(|k| k == key)
            .ok_or_else(|| TableError::UnknownKey(key.to_string()))
    }

    fn term_index(&self, term: EnergyTerm) -> Result<usize, TableError> {
        self.terms
            .iter()
            .position(|t| *t == term)
            .ok_or(TableError::UnknownTerm {
                label: term.label(),
            })
    }

    pub fn set(&mut self, key: &str, term: EnergyTerm, value: f64) -> Result<(), TableError> {
        let row = self.row_index(key)?;
        let col = self.term_index(term)?;
        self.cells[row][col] = Some(value);
        Ok(())
    }

    /// The populated value of a cell; unpopulated cells are an error.
    pub fn get(&self, key: &str, term: EnergyTerm) -> Result<f64, TableError> {
        let row = self.row_index(key)?;
        let col = self.term_index(term)?;
        self.cells[row][col].ok_or(TableError::MissingCell {
            key: key.to_string(),
            label: term.label(),
        })
    }

    /// The raw cell state, `None` when no evaluator has written it.
    pub fn cell(&self, key: &str, term: EnergyTerm) -> Option<f64> {
        let row = self.row_index(key).ok()?;
        let col = self.term_index(term).ok()?;
        self.cells[row][col]
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut out = csv::Writer::from_writer(writer);
        let mut header = vec![String::new()];
        header.extend(self.terms.iter().map(|t| t.label().to_string()));
        out.write_record(&header)?;

        for (key, row) in self.keys.iter().zip(&self.cells) {
            let mut record = vec![key.clone()];
            record.extend(row.iter().map(|cell| match cell {
                Some(v) => format!("{v}"),
                None => String::new(),
            }));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }

    /// Read a table back from CSV (used for the GXG baseline table). The
    /// first header cell is the unnamed key column; every other header cell
    /// must be a known term label. Empty cells stay unpopulated.
    pub fn read_csv(path: &Path) -> Result<Self, TableError> {
        let file = std::fs::File::open(path)?;
        Self::read_from(file)
    }

    pub fn read_from<R: io::Read>(reader: R) -> Result<Self, TableError> {
        let mut input = csv::Reader::from_reader(reader);
        let headers = input.headers()?.clone();
        let terms: Vec<EnergyTerm> = headers
            .iter()
            .skip(1)
            .map(|label| {
                EnergyTerm::from_label(label)
                    .ok_or_else(|| TableError::UnknownColumn(label.to_string()))
            })
            .collect::<Result<_, _>>()?;

        let mut keys = Vec::new();
        let mut cells = Vec::new();
        for record in input.records() {
            let record = record?;
            keys.push(record.get(0).unwrap_or_default().to_string());
            let row: Vec<Option<f64>> = (1..headers.len())
                .map(|i| {
                    record
                        .get(i)
                        .filter(|s| !s.trim().is_empty())
                        .and_then(|s| s.trim().parse::<f64>().ok())
                })
                .collect();
            cells.push(row);
        }

        Ok(Self { terms, keys, cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EnergyTable {
        EnergyTable::new(&EnergyTerm::STABILITY, ["1stn", "A20G", "B_H10I"])
    }

    #[test]
    fn row_zero_is_the_reference() {
        assert_eq!(table().reference_key().unwrap(), "1stn");
    }

    #[test]
    fn cells_start_unpopulated_and_error_on_get() {
        let t = table();
        assert_eq!(t.cell("A20G", EnergyTerm::Solvation), None);
        assert!(matches!(
            t.get("A20G", EnergyTerm::Solvation),
            Err(TableError::MissingCell { .. })
        ));
    }

    #[test]
    fn set_then_get_returns_the_value() {
        let mut t = table();
        t.set("A20G", EnergyTerm::LennardJones, -119.9).unwrap();
        assert_eq!(t.get("A20G", EnergyTerm::LennardJones).unwrap(), -119.9);
    }

    #[test]
    fn unknown_key_and_term_are_typed_errors() {
        let mut t = table();
        assert!(matches!(
            t.set("Z99Z", EnergyTerm::Solvation, 1.0),
            Err(TableError::UnknownKey(_))
        ));
        assert!(matches!(
            t.get("A20G", EnergyTerm::Pka),
            Err(TableError::UnknownTerm { label: "PKA" })
        ));
    }

    #[test]
    fn csv_roundtrip_preserves_values_and_gaps() {
        let mut t = table();
        t.set("1stn", EnergyTerm::Solvation, -300.5).unwrap();
        t.set("A20G", EnergyTerm::EntropyTs, -12.25).unwrap();

        let mut buf = Vec::new();
        t.write_to(&mut buf).unwrap();
        let back = EnergyTable::read_from(buf.as_slice()).unwrap();

        assert_eq!(back.keys(), t.keys());
        assert_eq!(back.get("1stn", EnergyTerm::Solvation).unwrap(), -300.5);
        assert_eq!(back.cell("A20G", EnergyTerm::Solvation), None);
        assert_eq!(back.get("A20G", EnergyTerm::EntropyTs).unwrap(), -12.25);
    }

    #[test]
    fn unknown_csv_column_is_rejected() {
        let csv = ",SOLV,GIBBS\nwt,1.0,2.0\n";
        assert!(matches!(
            EnergyTable::read_from(csv.as_bytes()),
            Err(TableError::UnknownColumn(c)) if c == "GIBBS"
        ));
    }
}
