use super::{GXG_TABLE, PipelineContext};
use crate::core::energy::table::EnergyTable;
use crate::core::models::residue::AminoAcid;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::stages::{area, electrostatics, ensemble, entropy, minimize, singlepoint};
use crate::engine::{collect, workspace::Workspace};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

/// The finished tripeptide baseline: one row of ensemble-averaged stability
/// terms per G-X-G motif, persisted as `GXG.csv`.
#[derive(Debug, Clone)]
pub struct GxgOutcome {
    pub workspace_root: PathBuf,
    pub table: EnergyTable,
}

/// Generate the GXG baseline table: fabricate the twenty G-X-G tripeptides
/// and push each through the same ensemble pipeline the stability workflow
/// applies to full proteins.
///
/// The baseline depends only on the force field and flag configuration, so
/// one run of this workflow serves every stability run that shares them.
#[instrument(skip_all, name = "gxg_workflow")]
pub fn run(context: &PipelineContext<'_>, parent: &Path) -> Result<GxgOutcome, EngineError> {
    // === Phase 1: Fabricate the tripeptides ===
    let mut workspace = Workspace::open(&parent.join("GXG"))?;
    fabricate_tripeptides(context.runner, &mut workspace, context.reporter)?;

    // === Phase 2: Relax every tripeptide, then sample its ensemble ===
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

    // === Phase 4: Aggregate ===
    let n = context.flags.ensemble_size()?;
    let table = collect::collect(&workspace, context.settings, n)?;
    table.write_csv(&workspace.root().join(GXG_TABLE))?;
    info!(root = %workspace.root().display(), "GXG baseline complete");

    Ok(GxgOutcome {
        workspace_root: workspace.root().to_path_buf(),
        table,
    })
}

/// Build one G-X-G structure per amino acid with the external editor's
/// peptide fabrication command. Idempotent the same way structure
/// preparation is: existing structures are left alone.
fn fabricate_tripeptides(
    runner: &dyn ToolRunner,
    workspace: &mut Workspace,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "fabricate tripeptides",
        total: AminoAcid::ALL.len() as u64,
    });

    for acid in AminoAcid::ALL {
        let motif = acid.gxg_motif();
        let dir = workspace.add_variant(&motif)?.clone();
        if dir.structure_file().exists() {
            reporter.report(Progress::StageAdvance);
            continue;
        }

        info!(%motif, "Fabricating tripeptide");
        let script = format!(
            "from pymol import cmd\n\
             cmd.fab(\"{motif}\", \"{motif}\")\n\
             cmd.save(r\"{motif}.pdb\")\n"
        );
        fs::write(dir.file("fab.py"), script)?;
        let invocation = Invocation::new("pymol", &dir.path).args(["-qc", "fab.py"]);
        runner.run(&invocation)?;
        reporter.report(Progress::StageAdvance);
    }

    reporter.report(Progress::StageFinish);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::flags::ToolFlags;
    use crate::core::energy::delta::Coefficients;
    use crate::core::energy::term::EnergyTerm;
    use crate::engine::config::{RunMode, RunSettingsBuilder};
    use crate::engine::runner::ToolOutput;

    const FLAGS: &str = "\
DIST FLAGS
DISCO FLAGS
-n=1
PDB2GMX FLAGS
EDITCONF FLAGS
GROMPP FLAGS
MDRUN FLAGS
";

    struct FakeTools;

    impl ToolRunner for FakeTools {
        fn run(&self, invocation: &Invocation) -> Result<ToolOutput, EngineError> {
            let cwd = invocation.cwd();
            match invocation.program() {
                "pymol" => {
                    let script = std::fs::read_to_string(cwd.join("fab.py")).unwrap();
                    let key = script
                        .lines()
                        .find_map(|l| l.strip_prefix("cmd.save(r\"")?.strip_suffix(".pdb\")"))
                        .unwrap();
                    std::fs::write(cwd.join(format!("{key}.pdb")), "ATOM\n").unwrap();
                }
                "disco" => {
                    std::fs::write(cwd.join("1.pdb"), "ATOM\n").unwrap();
                }
                "gropbe" => {
                    return Ok(ToolOutput {
                        stdout: "Coulombic energy = -42.0 kJ/mol\nSolvation Energy = -21.0 kJ/mol\n"
                            .to_string(),
                        stderr: String::new(),
                    });
                }
                "gmx" => {
                    let args = invocation.arg_list();
                    match args[1].as_str() {
                        "grompp" => {
                            let target = args
                                .iter()
                                .position(|a| a == "-o")
                                .and_then(|i| args.get(i + 1))
                                .map(String::as_str)
                                .unwrap_or("topol.tpr");
                            std::fs::write(cwd.join(target), "tpr\n").unwrap();
                        }
                        "mdrun" => {
                            std::fs::write(cwd.join("confout.gro"), "gro\n").unwrap();
                            std::fs::write(cwd.join("traj.trr"), "trr\n").unwrap();
                        }
                        "energy" => {
                            return Ok(ToolOutput {
                                stdout: "Energy Average\nPotential -10.0 -- 0.0\n".to_string(),
                                stderr: String::new(),
                            });
                        }
                        "sasa" => {
                            std::fs::write(cwd.join("area.xvg"), "0.000 33.0\n").unwrap();
                        }
                        "trjcat" => {
                            std::fs::write(cwd.join("trajout.xtc"), "xtc\n").unwrap();
                        }
                        "covar" => {
                            std::fs::write(cwd.join("eigenvec.trr"), "vec\n").unwrap();
                        }
                        "anaeig" => {
                            return Ok(ToolOutput {
                                stdout: "The Entropy due to the Quasi Harmonic approximation is 100.0 J/mol K\n"
                                    .to_string(),
                                stderr: String::new(),
                            });
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
            Ok(ToolOutput::default())
        }
    }

    #[test]
    fn baseline_covers_all_twenty_motifs() {
        let tmp = tempfile::tempdir().unwrap();
        let flags = ToolFlags::parse(FLAGS).unwrap();
        let settings = RunSettingsBuilder::new()
            .mode(RunMode::Stability)
            .minimization_mdp(tmp.path().join("min.mdp"))
            .singlepoint_mdp(tmp.path().join("energy.mdp"))
            .interaction_table(tmp.path().join("table.xvg"))
            .pb_params(tmp.path().join("pb.txt"))
            .build()
            .unwrap();
        std::fs::write(&settings.files.pb_params, "epsilon=80\n").unwrap();

        let reporter = crate::engine::progress::ProgressReporter::new();
        let context = PipelineContext {
            runner: &FakeTools,
            flags: &flags,
            settings: &settings,
            coefficients: Coefficients {
                alpha: 1.0,
                beta: 1.0,
                gamma: 1.0,
                tau: 1.0,
                c: 0.0,
            },
            reporter: &reporter,
        };

        let outcome = run(&context, tmp.path()).unwrap();
        assert_eq!(outcome.table.keys().len(), 20);
        assert_eq!(outcome.table.get("GAG", EnergyTerm::Coulomb).unwrap(), -42.0);
        assert_eq!(outcome.table.get("GWG", EnergyTerm::SurfaceArea).unwrap(), 33.0);
        assert!(outcome.workspace_root.join(GXG_TABLE).exists());

        // The persisted table reloads as a usable baseline.
        let reloaded = EnergyTable::read_csv(&outcome.workspace_root.join(GXG_TABLE)).unwrap();
        assert_eq!(reloaded.keys().len(), 20);
    }
}
