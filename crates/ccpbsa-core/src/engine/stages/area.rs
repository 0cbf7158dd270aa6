use crate::engine::config::{RunMode, RunSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::workspace::WorkDir;
use rayon::prelude::*;

use super::minimize::FIRST_CHAIN_GROUP;

/// Solvent-accessible surface area over the minimized structure, written to
/// `area.xvg`. Stability runs need only the total; binding runs additionally
/// request the per-chain groups from the chain index so the interaction area
/// (buried surface) can be derived from one output file.
pub fn run(
    runner: &dyn ToolRunner,
    dirs: &[WorkDir],
    settings: &RunSettings,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "surface area",
        total: dirs.len() as u64,
    });

    dirs.par_iter().try_for_each(|dir| {
        if !dir.file("confout.gro").exists() {
            return Err(EngineError::Precondition {
                stage: "surface area",
                requires: "minimize",
            });
        }

        let mut invocation = Invocation::gmx("sasa", &dir.path)
            .args(["-s", "confout.gro", "-o", "area.xvg"])
            .stdin_bytes(b"0".to_vec());
        if settings.mode == RunMode::Binding {
            invocation = invocation.args(["-n", "index.ndx", "-output"]).args(
                (0..settings.chains.len()).map(|cn| (FIRST_CHAIN_GROUP + cn).to_string()),
            );
        }
        runner.run(&invocation)?;
        reporter.report(Progress::StageAdvance);
        Ok(())
    })?;

    reporter.report(Progress::StageFinish);
    Ok(())
}
