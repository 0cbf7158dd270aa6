use super::error::EngineError;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

const STDERR_TAIL_LINES: usize = 10;

/// A fully assembled external tool invocation.
///
/// The working directory is always explicit; no stage ever changes the
/// process-wide current directory, so invocations from parallel workers
/// cannot corrupt each other's relative paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
    cwd: PathBuf,
    stdin: Option<Vec<u8>>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            stdin: None,
        }
    }

    /// A GROMACS subcommand, invoked as `gmx -quiet <subcommand> …`.
    pub fn gmx(subcommand: &str, cwd: &Path) -> Self {
        Self::new("gmx", cwd).arg("-quiet").arg(subcommand)
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Bytes fed to the tool's stdin, used to answer interactive menu
    /// prompts (group selections and the like).
    pub fn stdin_bytes(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.stdin = Some(bytes.into());
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn stdin_data(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }
}

/// Captured output of a completed invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// Append both streams to a log file, creating it if needed. Several
    /// invocations may share one log per structure; aggregation later reads
    /// only the trailing window of each log.
    pub fn append_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(self.stdout.as_bytes())?;
        file.write_all(self.stderr.as_bytes())?;
        Ok(())
    }
}

/// The seam between the pipeline and the external binaries. Stages only ever
/// see this trait, so tests can substitute a mock that fabricates tool
/// output without any of the wrapped programs installed.
pub trait ToolRunner: Send + Sync {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, EngineError>;
}

/// Production runner backed by `std::process::Command`. Blocks until the
/// subprocess exits; a non-zero exit status is an [`EngineError::ExternalTool`]
/// carrying the tail of stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<ToolOutput, EngineError> {
        debug!(
            program = invocation.program(),
            args = ?invocation.arg_list(),
            cwd = %invocation.cwd().display(),
            "Invoking external tool"
        );

        let mut command = Command::new(invocation.program());
        command
            .args(invocation.arg_list())
            .current_dir(invocation.cwd())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if invocation.stdin_data().is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });

        let mut child = command.spawn().map_err(|e| EngineError::ToolLaunch {
            tool: invocation.program().to_string(),
            message: e.to_string(),
        })?;

        if let Some(bytes) = invocation.stdin_data() {
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(bytes)?;
            }
        }

        let output = child.wait_with_output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(EngineError::ExternalTool {
                tool: invocation.program().to_string(),
                status: output.status.code(),
                dir: invocation.cwd().to_path_buf(),
                stderr_tail: tail(&stderr, STDERR_TAIL_LINES),
            });
        }

        Ok(ToolOutput { stdout, stderr })
    }
}

fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gmx_invocations_carry_the_quiet_flag() {
        let inv = Invocation::gmx("energy", Path::new("/tmp"))
            .args(["-f", "sp.edr"])
            .stdin_bytes(b"6 8".to_vec());
        assert_eq!(inv.program(), "gmx");
        assert_eq!(inv.arg_list(), ["-quiet", "energy", "-f", "sp.edr"]);
        assert_eq!(inv.stdin_data(), Some(b"6 8".as_slice()));
    }

    #[test]
    fn system_runner_captures_stdout() {
        let inv = Invocation::new("echo", Path::new(".")).arg("hello");
        let out = SystemRunner.run(&inv).unwrap();
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let inv = Invocation::new("definitely-not-a-real-tool-xyz", Path::new("."));
        assert!(matches!(
            SystemRunner.run(&inv),
            Err(EngineError::ToolLaunch { .. })
        ));
    }

    #[test]
    fn nonzero_exit_reports_the_status() {
        let inv = Invocation::new("sh", Path::new("."))
            .args(["-c", "echo boom >&2; exit 3"]);
        match SystemRunner.run(&inv) {
            Err(EngineError::ExternalTool {
                status, stderr_tail, ..
            }) => {
                assert_eq!(status, Some(3));
                assert!(stderr_tail.contains("boom"));
            }
            other => panic!("expected ExternalTool error, got {other:?}"),
        }
    }

    #[test]
    fn append_to_accumulates_across_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        let first = ToolOutput {
            stdout: "one\n".to_string(),
            stderr: String::new(),
        };
        let second = ToolOutput {
            stdout: "two\n".to_string(),
            stderr: "warn\n".to_string(),
        };
        first.append_to(&log).unwrap();
        second.append_to(&log).unwrap();
        let content = std::fs::read_to_string(&log).unwrap();
        assert_eq!(content, "one\ntwo\nwarn\n");
    }
}
