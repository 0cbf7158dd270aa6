use crate::core::config::flags::ToolFlags;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::runner::{Invocation, ToolRunner};
use crate::engine::workspace::Workspace;
use tracing::info;

/// Configurational entropy over each variant's conformer ensemble: the
/// per-conformer minimization trajectories are concatenated into one pseudo
/// trajectory, a covariance analysis runs over it without fitting, and the
/// quasi-harmonic entropy estimate lands in `entropy.log`.
///
/// Every conformer must have left a trajectory behind; a missing one means
/// the ensemble is not fully minimized and aborts the stage rather than
/// skewing the covariance with fewer frames than configured.
pub fn run(
    runner: &dyn ToolRunner,
    workspace: &Workspace,
    flags: &ToolFlags,
    reporter: &ProgressReporter,
) -> Result<(), EngineError> {
    let n = flags.ensemble_size()?;
    reporter.report(Progress::StageStart {
        name: "entropy",
        total: workspace.variants().len() as u64,
    });

    for variant in workspace.variants() {
        info!(variant = %variant.variant, "Estimating configurational entropy");

        let mut trajectories = Vec::with_capacity(n);
        for index in 1..=n {
            let relative = format!("{index}/traj.trr");
            if !variant.file(&relative).exists() {
                return Err(EngineError::DataIncomplete {
                    what: format!(
                        "minimization trajectories for variant '{}'",
                        variant.variant
                    ),
                    expected: n,
                    found: index - 1,
                });
            }
            trajectories.push(relative);
        }

        let trjcat = Invocation::gmx("trjcat", &variant.path)
            .args(["-cat", "yes", "-o", "trajout.xtc", "-f"])
            .args(trajectories);
        runner.run(&trjcat)?;

        let covar = Invocation::gmx("covar", &variant.path)
            .args([
                "-f",
                "trajout.xtc",
                "-s",
                "1/confout.gro",
                "-nofit",
                "-nopbc",
            ])
            .stdin_bytes(b"0".to_vec());
        runner.run(&covar)?;

        let anaeig = Invocation::gmx("anaeig", &variant.path)
            .args(["-v", "eigenvec.trr", "-entropy"]);
        let output = runner.run(&anaeig)?;
        output.append_to(&variant.file("entropy.log"))?;

        reporter.report(Progress::StageAdvance);
    }

    reporter.report(Progress::StageFinish);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::runner::ToolOutput;
    use std::sync::Mutex;

    const FLAGS: &str = "\
DIST FLAGS
DISCO FLAGS
-n=3
PDB2GMX FLAGS
EDITCONF FLAGS
GROMPP FLAGS
MDRUN FLAGS
";

    struct RecordingRunner {
        calls: Mutex<Vec<Invocation>>,
    }

    impl ToolRunner for RecordingRunner {
        fn run(&self, invocation: &Invocation) -> Result<ToolOutput, EngineError> {
            self.calls.lock().unwrap().push(invocation.clone());
            Ok(ToolOutput {
                stdout: "The Entropy due to the Quasi Harmonic approximation is 1823.4 J/mol K\n"
                    .to_string(),
                stderr: String::new(),
            })
        }
    }

    fn workspace_with_trajectories(n: usize) -> (tempfile::TempDir, Workspace) {
        let tmp = tempfile::tempdir().unwrap();
        let mut ws = Workspace::open(tmp.path()).unwrap();
        let variant = ws.add_variant("wt").unwrap().clone();
        for i in 1..=n {
            let conformer = variant.path.join(i.to_string());
            std::fs::create_dir_all(&conformer).unwrap();
            std::fs::write(conformer.join("traj.trr"), "trr\n").unwrap();
        }
        (tmp, ws)
    }

    #[test]
    fn concatenates_every_conformer_trajectory_in_order() {
        let (_tmp, ws) = workspace_with_trajectories(3);
        let flags = ToolFlags::parse(FLAGS).unwrap();
        let runner = RecordingRunner {
            calls: Mutex::new(Vec::new()),
        };
        run(&runner, &ws, &flags, &ProgressReporter::new()).unwrap();

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        let trjcat_args = calls[0].arg_list();
        let f_at = trjcat_args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(
            &trjcat_args[f_at + 1..],
            ["1/traj.trr", "2/traj.trr", "3/traj.trr"]
        );
        assert!(ws.variants()[0].file("entropy.log").exists());
    }

    #[test]
    fn missing_trajectory_is_a_data_incomplete_error() {
        let (_tmp, ws) = workspace_with_trajectories(2);
        let flags = ToolFlags::parse(FLAGS).unwrap();
        let err = run(
            &RecordingRunner {
                calls: Mutex::new(Vec::new()),
            },
            &ws,
            &flags,
            &ProgressReporter::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            EngineError::DataIncomplete {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn covariance_runs_without_fitting() {
        let (_tmp, ws) = workspace_with_trajectories(3);
        let flags = ToolFlags::parse(FLAGS).unwrap();
        let runner = RecordingRunner {
            calls: Mutex::new(Vec::new()),
        };
        run(&runner, &ws, &flags, &ProgressReporter::new()).unwrap();

        let calls = runner.calls.lock().unwrap();
        let covar_args = calls[1].arg_list();
        assert!(covar_args.contains(&"-nofit".to_string()));
        assert!(covar_args.contains(&"-nopbc".to_string()));
        assert_eq!(calls[2].arg_list()[1], "anaeig");
    }
}
