use crate::engine::config::{RunMode, RunSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::workspace::WorkDir;
use rayon::prelude::*;
use std::fs;
use tracing::debug;

/// Poisson-Boltzmann electrostatics: run the PB solver on each single-point
/// run input and collect its report into `solvation.log`, from which both the
/// polar solvation energy and the solver's Coulomb energy are scraped later.
///
/// The solver takes one parameter file; the run input is named inside it, so
/// a per-structure copy of the base parameters is written with the `in(tpr,…)`
/// line injected at the top. Group selection goes through stdin: the whole
/// complex (every chain group) for the main evaluation, the single group of
/// an isolated chain for the binding-mode decomposition.
pub fn run(
    runner: &dyn ToolRunner,
    dirs: &[WorkDir],
    settings: &RunSettings,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "electrostatics",
        total: dirs.len() as u64,
    });

    let base_params = fs::read_to_string(&settings.files.pb_params)?;

    dirs.par_iter().try_for_each(|dir| {
        if !dir.file("sp.tpr").exists() {
            return Err(EngineError::Precondition {
                stage: "electrostatics",
                requires: "single-point energies",
            });
        }

        let complex_groups = (0..settings.chains.len())
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(",");
        solve(runner, dir, &base_params, "", &complex_groups)?;

        if settings.mode == RunMode::Binding {
            for chain in &settings.chains {
                solve(runner, dir, &base_params, &format!("chain_{chain}_"), "0")?;
            }
        }
        reporter.report(Progress::StageAdvance);
        Ok(())
    })?;

    reporter.report(Progress::StageFinish);
    Ok(())
}

fn solve(
    runner: &dyn ToolRunner,
    dir: &WorkDir,
    base_params: &str,
    prefix: &str,
    groups: &str,
) -> Result<(), EngineError> {
    debug!(dir = %dir.path.display(), prefix, "Solving PB electrostatics");
    let tpr = dir.file(&format!("{prefix}sp.tpr"));
    let params_file = format!("{prefix}gropbe.txt");
    fs::write(
        dir.file(&params_file),
        format!("in(tpr,{})\n{base_params}", tpr.display()),
    )?;

    let invocation = Invocation::new("gropbe", &dir.path)
        .arg(params_file)
        .stdin_bytes(groups.as_bytes().to_vec());
    let output = runner.run(&invocation)?;
    output.append_to(&dir.file(&format!("{prefix}solvation.log")))?;
    Ok(())
}
