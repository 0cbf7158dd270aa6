use super::table::{EnergyTable, TableError};
use super::term::EnergyTerm;
use crate::core::models::mutation::Mutation;
use serde::Deserialize;
use std::io;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeltaError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("No mutation record for table row '{0}'")]
    UnknownVariant(String),

    #[error("GXG baseline table has no row for motif '{0}'")]
    MissingBaseline(String),
}

/// Linear scaling coefficients for the final ΔΔG. One coefficient per energy
/// term plus a constant offset (binding mode only):
/// α scales the electrostatic terms (solvation and Coulomb), β the
/// Lennard-Jones term, γ the surface term, τ the entropy term.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Coefficients {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    #[serde(default)]
    pub tau: f64,
    #[serde(default)]
    pub c: f64,
}

impl Coefficients {
    fn for_term(&self, term: EnergyTerm) -> f64 {
        match term {
            EnergyTerm::Solvation | EnergyTerm::Coulomb => self.alpha,
            EnergyTerm::LennardJones => self.beta,
            EnergyTerm::SurfaceArea | EnergyTerm::InteractionSurface => self.gamma,
            EnergyTerm::EntropyTs => self.tau,
            EnergyTerm::Pka => 1.0,
        }
    }
}

/// A derived per-mutant table: the weighted CALC column followed by the
/// per-term contributions. Pure output of the calculators below.
#[derive(Debug, Clone, PartialEq)]
pub struct DeltaTable {
    terms: Vec<EnergyTerm>,
    rows: Vec<DeltaRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRow {
    pub key: String,
    pub calc: f64,
    pub terms: Vec<f64>,
}

impl DeltaTable {
    pub fn terms(&self) -> &[EnergyTerm] {
        &self.terms
    }

    pub fn rows(&self) -> &[DeltaRow] {
        &self.rows
    }

    pub fn row(&self, key: &str) -> Option<&DeltaRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn term(&self, key: &str, term: EnergyTerm) -> Option<f64> {
        let col = self.terms.iter().position(|t| *t == term)?;
        self.row(key).map(|r| r.terms[col])
    }

    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut out = csv::Writer::from_writer(writer);
        let mut header = vec![String::new(), "CALC".to_string()];
        header.extend(self.terms.iter().map(|t| t.label().to_string()));
        out.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.key.clone(), format!("{}", row.calc)];
            record.extend(row.terms.iter().map(|v| format!("{v}")));
            out.write_record(&record)?;
        }
        out.flush()?;
        Ok(())
    }
}

/// Raw per-term differences against the reference row (`dG.csv`). No
/// coefficients are applied; this table is informational.
pub fn reference_differences(g: &EnergyTable) -> Result<EnergyTable, DeltaError> {
    let reference = g.reference_key()?.to_string();
    let mutants: Vec<String> = g.keys().iter().skip(1).cloned().collect();
    let mut dg = EnergyTable::new(g.terms(), mutants.clone());

    for key in &mutants {
        for term in g.terms().to_vec() {
            let diff = g.get(key, term)? - g.get(&reference, term)?;
            dg.set(key, term, diff)?;
        }
    }
    Ok(dg)
}

/// The stability ΔΔG (`ddG.csv`): for each mutant and term,
/// `coeff * (G_mut - G_wt - GXG(target) + GXG(original))`, where the GXG rows
/// isolate the mutated residue's intrinsic contribution in the unfolded
/// state. CALC is the sum of the weighted terms.
pub fn stability_ddg(
    g: &EnergyTable,
    gxg: &EnergyTable,
    mutations: &[Mutation],
    coefficients: &Coefficients,
) -> Result<DeltaTable, DeltaError> {
    let reference = g.reference_key()?.to_string();
    let terms = g.terms().to_vec();
    let mut rows = Vec::new();

    for key in g.keys().iter().skip(1) {
        let mutation = mutations
            .iter()
            .find(|m| m.spec == *key)
            .ok_or_else(|| DeltaError::UnknownVariant(key.clone()))?;
        let (motif_wt, motif_mut) = mutation.gxg_motifs();
        baseline_row_exists(gxg, &motif_wt)?;
        baseline_row_exists(gxg, &motif_mut)?;

        let mut row = DeltaRow {
            key: key.clone(),
            calc: 0.0,
            terms: Vec::with_capacity(terms.len()),
        };
        for &term in &terms {
            let value = coefficients.for_term(term)
                * (g.get(key, term)? - g.get(&reference, term)? - gxg.get(&motif_mut, term)?
                    + gxg.get(&motif_wt, term)?);
            row.calc += value;
            row.terms.push(value);
        }
        rows.push(row);
    }

    Ok(DeltaTable { terms, rows })
}

/// The binding ΔΔG: weighted differences against the reference complex, plus
/// the constant offset `c` folded into CALC. No tripeptide baseline applies
/// because both states share the folded structure.
pub fn binding_ddg(
    g: &EnergyTable,
    coefficients: &Coefficients,
) -> Result<DeltaTable, DeltaError> {
    let reference = g.reference_key()?.to_string();
    let terms = g.terms().to_vec();
    let mut rows = Vec::new();

    for key in g.keys().iter().skip(1) {
        let mut row = DeltaRow {
            key: key.clone(),
            calc: coefficients.c,
            terms: Vec::with_capacity(terms.len()),
        };
        for &term in &terms {
            let value =
                coefficients.for_term(term) * (g.get(key, term)? - g.get(&reference, term)?);
            row.calc += value;
            row.terms.push(value);
        }
        rows.push(row);
    }

    Ok(DeltaTable { terms, rows })
}

fn baseline_row_exists(gxg: &EnergyTable, motif: &str) -> Result<(), DeltaError> {
    if gxg.keys().iter().any(|k| k == motif) {
        Ok(())
    } else {
        Err(DeltaError::MissingBaseline(motif.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::AminoAcid;

    fn filled(terms: &[EnergyTerm], entries: &[(&str, &[f64])]) -> EnergyTable {
        let mut t = EnergyTable::new(terms, entries.iter().map(|(k, _)| k.to_string()));
        for (key, values) in entries {
            for (term, value) in terms.iter().zip(values.iter()) {
                t.set(key, *term, *value).unwrap();
            }
        }
        t
    }

    fn gxg_baseline() -> EnergyTable {
        let keys: Vec<String> = AminoAcid::ALL.iter().map(|aa| aa.gxg_motif()).collect();
        let mut t = EnergyTable::new(&EnergyTerm::STABILITY, keys.clone());
        for (i, key) in keys.iter().enumerate() {
            for (j, term) in EnergyTerm::STABILITY.iter().enumerate() {
                t.set(key, *term, (i + j) as f64).unwrap();
            }
        }
        t
    }

    fn coeffs() -> Coefficients {
        Coefficients {
            alpha: 0.5,
            beta: 1.0,
            gamma: 2.0,
            tau: 0.1,
            c: 0.0,
        }
    }

    #[test]
    fn reference_differences_subtract_row_zero() {
        let g = filled(
            &EnergyTerm::STABILITY,
            &[
                ("wt", &[10.0, 20.0, 30.0, 40.0, 50.0]),
                ("A20G", &[11.0, 22.0, 33.0, 44.0, 55.0]),
            ],
        );
        let dg = reference_differences(&g).unwrap();
        assert_eq!(dg.keys(), ["A20G".to_string()]);
        assert_eq!(dg.get("A20G", EnergyTerm::Solvation).unwrap(), 1.0);
        assert_eq!(dg.get("A20G", EnergyTerm::EntropyTs).unwrap(), 5.0);
    }

    #[test]
    fn stability_ddg_applies_baseline_and_coefficients() {
        let g = filled(
            &EnergyTerm::STABILITY,
            &[
                ("wt", &[10.0, 20.0, 30.0, 40.0, 50.0]),
                ("A20G", &[12.0, 24.0, 36.0, 48.0, 60.0]),
            ],
        );
        let gxg = gxg_baseline();
        let mutations = vec![Mutation::parse("A20G").unwrap()];
        let ddg = stability_ddg(&g, &gxg, &mutations, &coeffs()).unwrap();

        // GAG is baseline row 0, GGG row 5; SOLV column offset j=0.
        // SOLV: 0.5 * (12 - 10 - gxg[GGG] + gxg[GAG]) = 0.5 * (2 - 5 + 0)
        let solv = ddg.term("A20G", EnergyTerm::Solvation).unwrap();
        assert!((solv - 0.5 * (2.0 - 5.0)).abs() < 1e-12);

        let row = ddg.row("A20G").unwrap();
        let sum: f64 = row.terms.iter().sum();
        assert!((row.calc - sum).abs() < 1e-12);
    }

    #[test]
    fn stability_ddg_requires_a_mutation_record_per_row() {
        let g = filled(
            &EnergyTerm::STABILITY,
            &[
                ("wt", &[0.0; 5]),
                ("A20G", &[0.0; 5]),
            ],
        );
        let err = stability_ddg(&g, &gxg_baseline(), &[], &coeffs()).unwrap_err();
        assert!(matches!(err, DeltaError::UnknownVariant(k) if k == "A20G"));
    }

    #[test]
    fn binding_ddg_adds_the_constant_offset() {
        let g = filled(
            &EnergyTerm::BINDING,
            &[
                ("wt", &[10.0, 20.0, 30.0, 5.0, 0.0]),
                ("A20G", &[12.0, 24.0, 33.0, 6.0, 0.0]),
            ],
        );
        let c = Coefficients {
            alpha: 1.0,
            beta: 1.0,
            gamma: 1.0,
            tau: 0.0,
            c: 7.5,
        };
        let ddg = binding_ddg(&g, &c).unwrap();
        let row = ddg.row("A20G").unwrap();
        // 2 + 4 + 3 + 1 + 0 weighted by ones, plus c.
        assert!((row.calc - (10.0 + 7.5)).abs() < 1e-12);
    }

    #[test]
    fn recomputation_is_byte_identical() {
        let g = filled(
            &EnergyTerm::STABILITY,
            &[
                ("wt", &[10.0, 20.0, 30.0, 40.0, 50.0]),
                ("A20G", &[12.3, 21.7, 33.1, 41.9, 55.5]),
            ],
        );
        let gxg = gxg_baseline();
        let mutations = vec![Mutation::parse("A20G").unwrap()];

        let mut first = Vec::new();
        stability_ddg(&g, &gxg, &mutations, &coeffs())
            .unwrap()
            .write_to(&mut first)
            .unwrap();
        let mut second = Vec::new();
        stability_ddg(&g, &gxg, &mutations, &coeffs())
            .unwrap()
            .write_to(&mut second)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unpopulated_cells_surface_as_missing_cell() {
        let mut g = EnergyTable::new(&EnergyTerm::STABILITY, ["wt", "A20G"]);
        g.set("wt", EnergyTerm::Solvation, 1.0).unwrap();
        let err = reference_differences(&g).unwrap_err();
        assert!(matches!(
            err,
            DeltaError::Table(TableError::MissingCell { .. })
        ));
    }
}
