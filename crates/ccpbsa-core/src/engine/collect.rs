use crate::core::energy::table::EnergyTable;
use crate::core::energy::term::EnergyTerm;
use crate::core::io::{ScrapeError, area_xvg, energy_log, entropy_log, solvation_log};
use crate::engine::config::{RunMode, RunSettings};
use crate::engine::error::EngineError;
use crate::engine::workspace::{WorkDir, Workspace};
use std::fs;
use std::path::Path;
use tracing::{debug, instrument};

/// Temperature at which the entropy estimate is converted into −TS.
pub const STANDARD_TEMPERATURE_K: f64 = 298.15;

/// Read every energy log the pipeline stages left behind and aggregate them
/// into one variant-by-term table of ensemble-averaged free energy
/// contributions.
///
/// A missing log is an [`EngineError::DataIncomplete`], never a zero: a table
/// cell only carries a value that was actually computed.
#[instrument(skip_all, fields(variants = workspace.variants().len(), ensemble = ensemble_size))]
pub fn collect(
    workspace: &Workspace,
    settings: &RunSettings,
    ensemble_size: usize,
) -> Result<EnergyTable, EngineError> {
    match settings.mode {
        RunMode::Stability => collect_stability(workspace, ensemble_size),
        RunMode::Binding => collect_binding(workspace, settings, ensemble_size),
    }
}

fn collect_stability(
    workspace: &Workspace,
    n: usize,
) -> Result<EnergyTable, EngineError> {
    let mut table = EnergyTable::new(&EnergyTerm::STABILITY, workspace.variant_keys());

    for variant in workspace.variants() {
        debug!(variant = %variant.variant, "Aggregating stability energies");
        let key = variant.variant.as_str();

        let lj = conformer_mean(workspace, variant, n, "lj.log", energy_log::parse_final_energy)?;
        table.set(key, EnergyTerm::LennardJones, lj)?;

        let solv = conformer_mean(
            workspace,
            variant,
            n,
            "solvation.log",
            solvation_log::parse_solvation,
        )?;
        table.set(key, EnergyTerm::Solvation, solv)?;

        let coul = conformer_mean(
            workspace,
            variant,
            n,
            "solvation.log",
            solvation_log::parse_coulomb,
        )?;
        table.set(key, EnergyTerm::Coulomb, coul)?;

        let sas = conformer_mean(workspace, variant, n, "area.xvg", area_xvg::parse_total_area)?;
        table.set(key, EnergyTerm::SurfaceArea, sas)?;

        let entropy = scrape(&variant.file("entropy.log"), entropy_log::parse_entropy)?;
        table.set(
            key,
            EnergyTerm::EntropyTs,
            -STANDARD_TEMPERATURE_K * entropy / 1000.0,
        )?;
    }

    Ok(table)
}

fn collect_binding(
    workspace: &Workspace,
    settings: &RunSettings,
    n: usize,
) -> Result<EnergyTable, EngineError> {
    let mut table = EnergyTable::new(&EnergyTerm::BINDING, workspace.variant_keys());

    for variant in workspace.variants() {
        debug!(variant = %variant.variant, "Aggregating binding energies");
        let key = variant.variant.as_str();

        let lj = interaction_mean(
            workspace,
            variant,
            settings,
            n,
            "lj.log",
            energy_log::parse_final_energy,
        )?;
        table.set(key, EnergyTerm::LennardJones, lj)?;

        let solv = interaction_mean(
            workspace,
            variant,
            settings,
            n,
            "solvation.log",
            solvation_log::parse_solvation,
        )?;
        table.set(key, EnergyTerm::Solvation, solv)?;

        let coul = interaction_mean(
            workspace,
            variant,
            settings,
            n,
            "solvation.log",
            solvation_log::parse_coulomb,
        )?;
        table.set(key, EnergyTerm::Coulomb, coul)?;

        let ppis = conformer_mean(
            workspace,
            variant,
            n,
            "area.xvg",
            area_xvg::parse_interaction_area,
        )?;
        table.set(key, EnergyTerm::InteractionSurface, ppis)?;

        // No protonation-state model is wired in; the correction term is an
        // explicit zero, not an absent cell.
        table.set(key, EnergyTerm::Pka, 0.0)?;
    }

    Ok(table)
}

/// Ensemble average of one scraped value over a variant's conformers.
fn conformer_mean(
    workspace: &Workspace,
    variant: &WorkDir,
    n: usize,
    file: &str,
    parse: impl Fn(&str) -> Result<f64, ScrapeError>,
) -> Result<f64, EngineError> {
    let values = conformer_values(workspace, variant, n, file, parse)?;
    Ok(mean(&values))
}

/// Ensemble average of the interaction contribution: per conformer, the
/// whole-complex value minus the sum of the isolated-chain values.
fn interaction_mean(
    workspace: &Workspace,
    variant: &WorkDir,
    settings: &RunSettings,
    n: usize,
    file: &str,
    parse: impl Fn(&str) -> Result<f64, ScrapeError>,
) -> Result<f64, EngineError> {
    let complex = conformer_values(workspace, variant, n, file, &parse)?;
    let mut interactions = complex;
    for chain in &settings.chains {
        let chain_file = format!("chain_{chain}_{file}");
        let values = conformer_values(workspace, variant, n, &chain_file, &parse)?;
        for (total, chain_value) in interactions.iter_mut().zip(values) {
            *total -= chain_value;
        }
    }
    Ok(mean(&interactions))
}

fn conformer_values(
    workspace: &Workspace,
    variant: &WorkDir,
    n: usize,
    file: &str,
    parse: impl Fn(&str) -> Result<f64, ScrapeError>,
) -> Result<Vec<f64>, EngineError> {
    let mut values = Vec::with_capacity(n);
    for index in 1..=n {
        let path = workspace.conformer(variant, index).file(file);
        if !path.exists() {
            return Err(EngineError::DataIncomplete {
                what: format!("'{file}' logs for variant '{}'", variant.variant),
                expected: n,
                found: index - 1,
            });
        }
        values.push(scrape(&path, &parse)?);
    }
    Ok(values)
}

fn scrape(
    path: &Path,
    parse: impl Fn(&str) -> Result<f64, ScrapeError>,
) -> Result<f64, EngineError> {
    if !path.exists() {
        return Err(EngineError::DataIncomplete {
            what: format!("'{}'", path.display()),
            expected: 1,
            found: 0,
        });
    }
    let text = fs::read_to_string(path)?;
    parse(&text).map_err(|source| EngineError::Scrape {
        path: path.to_path_buf(),
        source,
    })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
