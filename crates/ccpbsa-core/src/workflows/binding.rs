use super::{DDG_TABLE, DG_TABLE, G_TABLE, PipelineContext};
use crate::core::energy::delta::{self, DeltaTable};
use crate::core::energy::table::EnergyTable;
use crate::core::models::mutation::Mutation;
use crate::engine::error::EngineError;
use crate::engine::stages::{area, electrostatics, ensemble, minimize, mutate, singlepoint};
use crate::engine::{collect, workspace::Workspace};
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// Results of a binding-affinity run: interaction energies per variant, raw
/// differences against the wildtype complex, and the weighted ΔΔG of binding.
#[derive(Debug, Clone)]
pub struct BindingOutcome {
    pub workspace_root: PathBuf,
    pub g: EnergyTable,
    pub dg: EnergyTable,
    pub ddg: DeltaTable,
}

/// The full binding pipeline for one complex and its point mutants.
///
/// The stage order matches the stability workflow, with two differences: the
/// per-chain decomposition rides along through minimization, single-point
/// evaluation and electrostatics, and there is no entropy stage because the
/// entropic contribution cancels between the weighted terms and the constant
/// offset of the binding model.
#[instrument(skip_all, name = "binding_workflow", fields(mutations = mutations.len()))]
pub fn run(
    context: &PipelineContext<'_>,
    parent: &Path,
    reference_key: &str,
    structure: &Path,
    mutations: &[Mutation],
) -> Result<BindingOutcome, EngineError> {
    // === Phase 1: Structure preparation ===
    info!(reference = reference_key, "Preparing wildtype and mutant complexes");
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

    // === Phase 3: Per-conformer energies, complex and isolated chains ===
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

    // === Phase 4: Aggregate and derive the free-energy differences ===
    let n = context.flags.ensemble_size()?;
    let g = collect::collect(&workspace, context.settings, n)?;
    let dg = delta::reference_differences(&g)?;
    let ddg = delta::binding_ddg(&g, &context.coefficients)?;

    g.write_csv(&workspace.root().join(G_TABLE))?;
    dg.write_csv(&workspace.root().join(DG_TABLE))?;
    ddg.write_csv(&workspace.root().join(DDG_TABLE))?;
    info!(root = %workspace.root().display(), "Binding run complete");

    Ok(BindingOutcome {
        workspace_root: workspace.root().to_path_buf(),
        g,
        dg,
        ddg,
    })
}
