use super::{DDG_TABLE, DG_TABLE, G_TABLE, PipelineContext};
use crate::core::energy::delta::{self, DeltaTable};
use crate::core::energy::table::EnergyTable;
use crate::core::models::mutation::Mutation;
use crate::engine::error::EngineError;
use crate::engine::stages::{area, electrostatics, ensemble, entropy, minimize, mutate, singlepoint};
use crate::engine::{collect, workspace::Workspace};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Everything a finished stability run produces: the ensemble-averaged
/// energies per variant, the raw differences against the wildtype, and the
/// final weighted ΔΔG of folding.
#[derive(Debug, Clone)]
pub struct StabilityOutcome {
    pub workspace_root: PathBuf,
    pub g: EnergyTable,
    pub dg: EnergyTable,
    pub ddg: DeltaTable,
}

/// The full stability pipeline for one wildtype structure and its point
/// mutants.
///
/// The GXG baseline table is an input, not a byproduct: it depends only on
/// the force field and flag configuration, so it is generated once by the
/// [`gxg`](super::gxg) workflow and reused across runs.
#[instrument(skip_all, name = "stability_workflow", fields(mutations = mutations.len()))]
pub fn run(
    context: &PipelineContext<'_>,
    parent: &Path,
    reference_key: &str,
    structure: &Path,
    mutations: &[Mutation],
    gxg: &EnergyTable,
) -> Result<StabilityOutcome, EngineError> {
    // === Phase 1: Structure preparation ===
    info!(reference = reference_key, "Preparing wildtype and mutant structures");
    let mut workspace = Workspace::create(parent, reference_key, structure)?;
    mutate::run(context.runner, &mut workspace, mutations, context.reporter)?;

    // === Phase 2: Relax every variant, then sample its ensemble ===
    minimize::run(
        context.runner,
        workspace.variants(),
        context.flags,
        context.settings,
        context.reporter,
    )?;
    minimize::export_structures(context.runner, workspace.variants(), context.reporter)?;
    let conformers = ensemble::run(context.runner, &workspace, context.flags, context.reporter)?;

    // === Phase 3: Per-conformer energies ===
    minimize::run(
        context.runner,
        &conformers,
        context.flags,
        context.settings,
        context.reporter,
    )?;
    singlepoint::run(
        context.runner,
        &conformers,
        context.flags,
        context.settings,
        context.reporter,
    )?;
    electrostatics::run(context.runner, &conformers, context.settings, context.reporter)?;
    area::run(context.runner, &conformers, context.settings, context.reporter)?;
    entropy::run(context.runner, &workspace, context.flags, context.reporter)?;

    // === Phase 4: Aggregate and derive the free-energy differences ===
    let n = context.flags.ensemble_size()?;
    let g = collect::collect(&workspace, context.settings, n)?;
    let dg = delta::reference_differences(&g)?;
    let ddg = delta::stability_ddg(&g, gxg, mutations, &context.coefficients)?;

    g.write_csv(&workspace.root().join(G_TABLE))?;
    dg.write_csv(&workspace.root().join(DG_TABLE))?;
    ddg.write_csv(&workspace.root().join(DDG_TABLE))?;
    info!(root = %workspace.root().display(), "Stability run complete");

    Ok(StabilityOutcome {
        workspace_root: workspace.root().to_path_buf(),
        g,
        dg,
        ddg,
    })
}
