use crate::core::config::flags::{FlagSection, ToolFlags};
use crate::engine::config::{RunMode, RunSettings};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::topology::TopologyPatch;
use crate::engine::workspace::WorkDir;
use rayon::prelude::*;
use tracing::debug;

/// Energy-term selections on the `gmx energy` menu for a minimized protein
/// topology: short-range Coulomb plus its 1-4 correction, and the same pair
/// for Lennard-Jones.
const COULOMB_TERMS: &[u8] = b"6 8";
const LJ_TERMS: &[u8] = b"5 7";

/// Single-point energy evaluation: recompile the run input from the minimized
/// coordinates, rerun `mdrun` over them without integration, and extract the
/// Coulomb and Lennard-Jones averages into `coulomb.log` and `lj.log`.
///
/// In binding mode the same evaluation is repeated for each isolated chain
/// (using the structures produced by the per-chain minimization), writing
/// `chain_<c>_coulomb.log` and `chain_<c>_lj.log` alongside.
pub fn run(
    runner: &dyn ToolRunner,
    dirs: &[WorkDir],
    flags: &ToolFlags,
    settings: &RunSettings,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    reporter.report(Progress::StageStart {
        name: "single-point energies",
        total: dirs.len() as u64,
    });

    dirs.par_iter().try_for_each(|dir| {
        if !dir.file("confout.gro").exists() {
            return Err(EngineError::Precondition {
                stage: "single-point energies",
                requires: "minimize",
            });
        }

        evaluate(runner, dir, flags, settings, "confout.gro", "")?;
        if settings.mode == RunMode::Binding {
            for (cn, chain) in settings.chains.iter().enumerate() {
                let patch =
                    TopologyPatch::isolate_chain(&dir.file("topol.top"), settings.chains.len(), cn)?;
                let result = evaluate(
                    runner,
                    dir,
                    flags,
                    settings,
                    &format!("chain_{chain}_confout.gro"),
                    &format!("chain_{chain}_"),
                );
                patch.restore()?;
                result?;
            }
        }
        reporter.report(Progress::StageAdvance);
        Ok(())
    })?;

    reporter.report(Progress::StageFinish);
    Ok(())
}

/// One rerun over `coordinates`, with every produced file carrying `prefix`
/// so whole-complex and per-chain evaluations can share a directory.
fn evaluate(
    runner: &dyn ToolRunner,
    dir: &WorkDir,
    flags: &ToolFlags,
    settings: &RunSettings,
    coordinates: &str,
    prefix: &str,
) -> Result<(), EngineError> {
    debug!(dir = %dir.path.display(), coordinates, "Evaluating single-point energies");
    let mdp = settings.files.singlepoint_mdp.display().to_string();
    let table = settings.files.interaction_table.display().to_string();
    let tpr = format!("{prefix}sp.tpr");

    let grompp = Invocation::gmx("grompp", &dir.path)
        .args(["-f", mdp.as_str()])
        .args(flags.args(FlagSection::Grompp).to_vec())
        .args([
            "-c".to_string(),
            coordinates.to_string(),
            "-o".to_string(),
            tpr.clone(),
        ]);
    runner.run(&grompp)?;

    let mdrun = Invocation::gmx("mdrun", &dir.path)
        .args(["-tablep", table.as_str(), "-table", table.as_str()])
        .args(flags.args(FlagSection::Mdrun).to_vec())
        .args([
            "-s".to_string(),
            tpr,
            "-rerun".to_string(),
            coordinates.to_string(),
            "-deffnm".to_string(),
            format!("{prefix}sp"),
        ]);
    runner.run(&mdrun)?;

    extract(runner, dir, prefix, COULOMB_TERMS, "coulomb.log")?;
    extract(runner, dir, prefix, LJ_TERMS, "lj.log")?;
    Ok(())
}

fn extract(
    runner: &dyn ToolRunner,
    dir: &WorkDir,
    prefix: &str,
    terms: &[u8],
    log: &str,
) -> Result<(), EngineError> {
    let energy = Invocation::gmx("energy", &dir.path)
        .args([
            "-f".to_string(),
            format!("{prefix}sp.edr"),
            "-sum".to_string(),
            "yes".to_string(),
        ])
        .stdin_bytes(terms.to_vec());
    let output = runner.run(&energy)?;
    output.append_to(&dir.file(&format!("{prefix}{log}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::RunSettingsBuilder;
    use crate::engine::runner::ToolOutput;
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct RecordingRunner {
        calls: Mutex<Vec<Invocation>>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<ToolOutput, EngineError> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(ToolOutput {
                stdout: "Energy Average\nTotal 42.0\n".to_string(),
                stderr: String::new(),
            })
        }
    }

    fn flags() -> ToolFlags {
        ToolFlags::parse(
            "DIST FLAGS\nDISCO FLAGS\n-n=2\nPDB2GMX FLAGS\nEDITCONF FLAGS\nGROMPP FLAGS\nMDRUN FLAGS\n",
        )
        .unwrap()
    }

    fn settings(mode: RunMode) -> RunSettings {
        let mut builder = RunSettingsBuilder::new()
            .mode(mode)
            .minimization_mdp(PathBuf::from("/aux/min.mdp"))
            .singlepoint_mdp(PathBuf::from("/aux/energy.mdp"))
            .interaction_table(PathBuf::from("/aux/table.xvg"))
            .pb_params(PathBuf::from("/aux/pb.txt"));
        if mode == RunMode::Binding {
            builder = builder.chains(vec!['A', 'B']);
        }
        builder.build().unwrap()
    }

    fn minimized_dir(tmp: &tempfile::TempDir) -> WorkDir {
        std::fs::write(tmp.path().join("confout.gro"), "gro\n").unwrap();
        WorkDir {
            variant: "wt".to_string(),
            conformer: Some(1),
            path: tmp.path().to_path_buf(),
        }
    }

    #[test]
    fn missing_minimized_coordinates_is_a_precondition_error() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = WorkDir {
            variant: "wt".to_string(),
            conformer: Some(1),
            path: tmp.path().to_path_buf(),
        };
        let err = run(
            &RecordingRunner::new(),
            &[dir],
            &flags(),
            &settings(RunMode::Stability),
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Precondition {
                requires: "minimize",
                ..
            }
        ));
    }

    #[test]
    fn rerun_writes_both_energy_logs() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = minimized_dir(&tmp);
        let runner = RecordingRunner::new();
        run(
            &runner,
            &[dir],
            &flags(),
            &settings(RunMode::Stability),
            &ProgressReporter::new(),
        )
        .unwrap();

        assert!(tmp.path().join("coulomb.log").exists());
        assert!(tmp.path().join("lj.log").exists());

        let calls = runner.calls.lock().unwrap();
        let energy_calls: Vec<&Invocation> =
            calls.iter().filter(|c| c.arg_list()[1] == "energy").collect();
        assert_eq!(energy_calls.len(), 2);
        assert_eq!(energy_calls[0].stdin_data(), Some(b"6 8".as_slice()));
        assert_eq!(energy_calls[1].stdin_data(), Some(b"5 7".as_slice()));
    }

    #[test]
    fn binding_mode_evaluates_each_chain_and_restores_the_topology() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = minimized_dir(&tmp);
        let topology = "[ molecules ]\nProtein_chain_A 1\nProtein_chain_B 1\n";
        std::fs::write(tmp.path().join("topol.top"), topology).unwrap();
        std::fs::write(tmp.path().join("chain_A_confout.gro"), "gro\n").unwrap();
        std::fs::write(tmp.path().join("chain_B_confout.gro"), "gro\n").unwrap();

        let runner = RecordingRunner::new();
        run(
            &runner,
            &[dir],
            &flags(),
            &settings(RunMode::Binding),
            &ProgressReporter::new(),
        )
        .unwrap();

        for chain in ['A', 'B'] {
            assert!(tmp.path().join(format!("chain_{chain}_coulomb.log")).exists());
            assert!(tmp.path().join(format!("chain_{chain}_lj.log")).exists());
        }
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("topol.top")).unwrap(),
            topology
        );
        // Complex + two chains, 4 invocations each.
        assert_eq!(runner.calls.lock().unwrap().len(), 12);
    }
}
