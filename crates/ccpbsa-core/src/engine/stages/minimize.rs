use crate::core::config::flags::{FlagSection, ToolFlags};
use crate::engine::config::{RunMode, RunSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::topology::TopologyPatch;
use crate::engine::workspace::WorkDir;
use rayon::prelude::*;
use tracing::{debug, info};

/// Energy minimization: the fixed four-step GROMACS chain (topology build →
/// box setup → run-input compilation → minimization run) in every working
/// directory, with each step's extra flags drawn from the corresponding flag
/// section.
///
/// In binding mode each directory additionally gets a chain index, per-chain
/// coordinate extraction and an independent re-minimization of every chain
/// under the topology patch guard, yielding the per-chain reference energies
/// for the interaction decomposition.
///
/// Directories are independent, so the loop is a flat parallel map; the
/// worker count is whatever the caller configured on the global rayon pool.
pub fn run(
    runner: &dyn ToolRunner,
    dirs: &[WorkDir],
    flags: &ToolFlags,
    settings: &RunSettings,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "minimize",
        total: dirs.len() as u64,
    });

    dirs.par_iter().try_for_each(|dir| {
        minimize_dir(runner, dir, flags, settings)?;
        if settings.mode == RunMode::Binding {
            minimize_chains(runner, dir, flags, settings)?;
        }
        reporter.report(Progress::StageAdvance);
        Ok::<(), EngineError>(())
    })?;

    reporter.report(Progress::StageFinish);
    Ok(())
}

/// Re-export each minimized structure (`confout.gro`) as a PDB file under the
/// directory's own prefix, so ensemble generation starts from relaxed
/// coordinates instead of the raw input geometry.
pub fn export_structures(
    runner: &dyn ToolRunner,
    dirs: &[WorkDir],
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "export structures",
        total: dirs.len() as u64,
    });

    for dir in dirs {
        let invocation = Invocation::gmx("trjconv", &dir.path)
            .args([
                "-s".to_string(),
                "confout.gro".to_string(),
                "-o".to_string(),
                format!("{}.pdb", dir.prefix()),
            ])
            .stdin_bytes(b"0".to_vec());
        runner.run(&invocation)?;
        reporter.report(Progress::StageAdvance);
    }

    reporter.report(Progress::StageFinish);
    Ok(())
}

fn minimize_dir(
    runner: &dyn ToolRunner,
    dir: &WorkDir,
    flags: &ToolFlags,
    settings: &RunSettings,
) -> Result<(), EngineError> {
    debug!(dir = %dir.path.display(), "Minimizing structure");
    let mdp = settings.files.minimization_mdp.display().to_string();
    let table = settings.files.interaction_table.display().to_string();

    let steps = [
        Invocation::gmx("pdb2gmx", &dir.path)
            .args(["-f".to_string(), format!("{}.pdb", dir.prefix())])
            .args(flags.args(FlagSection::Pdb2gmx).to_vec()),
        Invocation::gmx("editconf", &dir.path).args(flags.args(FlagSection::Editconf).to_vec()),
        Invocation::gmx("grompp", &dir.path)
            .args(["-f", mdp.as_str()])
            .args(flags.args(FlagSection::Grompp).to_vec()),
        Invocation::gmx("mdrun", &dir.path)
            .args(["-tablep", table.as_str(), "-table", table.as_str()])
            .args(flags.args(FlagSection::Mdrun).to_vec()),
    ];

    for step in &steps {
        runner.run(step)?;
    }
    Ok(())
}

/// Build the chain index and re-minimize each chain alone. The chain groups
/// appended by `make_ndx` follow its ten default groups, hence the offset.
pub(super) const FIRST_CHAIN_GROUP: usize = 10;

fn minimize_chains(
    runner: &dyn ToolRunner,
    dir: &WorkDir,
    flags: &ToolFlags,
    settings: &RunSettings,
) -> Result<(), EngineError> {
    let chains = &settings.chains;
    let mdp = settings.files.minimization_mdp.display().to_string();
    let table = settings.files.interaction_table.display().to_string();

    let mut selection = String::new();
    for chain in chains {
        selection.push_str(&format!("chain {chain}\n"));
    }
    selection.push_str("q\n");
    let make_ndx = Invocation::gmx("make_ndx", &dir.path)
        .args(["-f", "topol.tpr"])
        .stdin_bytes(selection.into_bytes());
    runner.run(&make_ndx)?;

    for (cn, chain) in chains.iter().enumerate() {
        info!(dir = %dir.path.display(), %chain, "Re-minimizing isolated chain");
        let chain_gro = format!("chain_{chain}.gro");
        let chain_tpr = format!("chain_{chain}.tpr");

        let extract = Invocation::gmx("trjconv", &dir.path)
            .args([
                "-f".to_string(),
                "confout.gro".to_string(),
                "-n".to_string(),
                "index.ndx".to_string(),
                "-o".to_string(),
                chain_gro.clone(),
            ])
            .stdin_bytes((FIRST_CHAIN_GROUP + cn).to_string().into_bytes());
        runner.run(&extract)?;

        let patch = TopologyPatch::isolate_chain(&dir.file("topol.top"), chains.len(), cn)?;

        let grompp = Invocation::gmx("grompp", &dir.path)
            .args(["-f", mdp.as_str()])
            .args(flags.args(FlagSection::Grompp).to_vec())
            .args([
                "-c".to_string(),
                chain_gro,
                "-o".to_string(),
                chain_tpr.clone(),
            ]);
        let mdrun = Invocation::gmx("mdrun", &dir.path)
            .args(["-tablep", table.as_str(), "-table", table.as_str()])
            .args(flags.args(FlagSection::Mdrun).to_vec())
            .args([
                "-s".to_string(),
                chain_tpr,
                "-deffnm".to_string(),
                format!("chain_{chain}_confout"),
            ]);

        let result = runner.run(&grompp).and_then(|_| runner.run(&mdrun));
        // Restore before propagating so a failed chain run cannot leave the
        // shared topology patched.
        patch.restore()?;
        result?;
    }

    Ok(())
}
