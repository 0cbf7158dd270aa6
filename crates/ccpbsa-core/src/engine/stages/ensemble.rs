use crate::core::config::flags::{FlagSection, ToolFlags};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::workspace::{WorkDir, Workspace};
use std::fs;
use tracing::info;

/// Ensemble generation: run the CONCOORD pair (`dist`, then `disco`) in every
/// variant directory and move each sampled conformer into its own numbered
/// subdirectory.
///
/// Returns the expanded directory list, one entry per `(variant, conformer)`
/// pair, which replaces the coarser variant-level list for all later stages.
/// If the sampler produced fewer structures than the configured ensemble
/// size, the shortfall is an [`EngineError::DataIncomplete`] rather than a
/// silently smaller ensemble.
pub fn run(
    runner: &dyn ToolRunner,
    workspace: &Workspace,
    flags: &ToolFlags,
    reporter: &ProgressReporter,
) -> Result<Vec<WorkDir>, EngineError> {
    let n = flags.ensemble_size()?;
    reporter.report(Progress::StageStart {
        name: "ensemble",
        total: workspace.variants().len() as u64,
    });

    let mut conformers = Vec::with_capacity(workspace.variants().len() * n);
    for variant in workspace.variants() {
        info!(variant = %variant.variant, ensemble = n, "Sampling conformer ensemble");
        let prefix = variant.prefix();

        let dist = Invocation::new("dist", &variant.path)
            .args([
                "-p".to_string(),
                format!("{prefix}.pdb"),
                "-op".to_string(),
                format!("{prefix}_dist.pdb"),
                "-og".to_string(),
                format!("{prefix}_dist.gro"),
                "-od".to_string(),
                format!("{prefix}_dist.dat"),
            ])
            .args(flags.args(FlagSection::Dist).to_vec())
            .stdin_bytes(b"1\n1".to_vec());
        runner.run(&dist)?;

        let disco = Invocation::new("disco", &variant.path)
            .args([
                "-d".to_string(),
                format!("{prefix}_dist.dat"),
                "-p".to_string(),
                format!("{prefix}_dist.pdb"),
                "-op".to_string(),
                String::new(),
                "-or".to_string(),
                format!("{prefix}_disco.rms"),
                "-of".to_string(),
                format!("{prefix}_disco_Bfac.pdb"),
            ])
            .args(flags.args(FlagSection::Disco).to_vec());
        runner.run(&disco)?;

        for index in 1..=n {
            let conformer = workspace.conformer(variant, index);
            fs::create_dir_all(&conformer.path)?;

            let sampled = variant.file(&format!("{index}.pdb"));
            let target = conformer.structure_file();
            if sampled.exists() {
                fs::rename(&sampled, &target)?;
            } else if !target.exists() {
                return Err(EngineError::DataIncomplete {
                    what: format!("sampled conformers for variant '{}'", variant.variant),
                    expected: n,
                    found: index - 1,
                });
            }
            conformers.push(conformer);
        }
        reporter.report(Progress::StageAdvance);
    }

    reporter.report(Progress::StageFinish);
    Ok(conformers)
}
