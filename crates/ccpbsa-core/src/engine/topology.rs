use super::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// A scoped edit of a GROMACS topology file that isolates one chain.
///
/// The last `chain_count` lines of `topol.top` list one molecule per chain;
/// commenting out all but one lets `grompp`/`mdrun` evaluate that chain
/// alone. The patch is written through a temporary file in the same
/// directory followed by an atomic rename, and the original content is
/// restored when the guard is dropped, whether or not the per-chain run
/// succeeded.
#[derive(Debug)]
pub struct TopologyPatch {
    path: PathBuf,
    original: String,
    restored: bool,
}

impl TopologyPatch {
    /// Patch `topology` so that only chain `keep` (0-based among the last
    /// `chain_count` molecule lines) stays active.
    pub fn isolate_chain(
        topology: &Path,
        chain_count: usize,
        keep: usize,
    ) -> Result<Self, EngineError> {
        if keep >= chain_count {
            return Err(EngineError::Topology {
                path: topology.to_path_buf(),
                message: format!("chain index {keep} out of range for {chain_count} chain(s)"),
            });
        }

        let original = fs::read_to_string(topology)?;
        let lines: Vec<&str> = original.lines().collect();
        if lines.len() < chain_count {
            return Err(EngineError::Topology {
                path: topology.to_path_buf(),
                message: format!(
                    "file has {} line(s), cannot hold {} molecule entries",
                    lines.len(),
                    chain_count
                ),
            });
        }

        let first_molecule = lines.len() - chain_count;
        let patched: Vec<String> = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if i >= first_molecule && i != first_molecule + keep {
                    format!(";{line}")
                } else {
                    (*line).to_string()
                }
            })
            .collect();

        write_atomic(topology, &(patched.join("\n") + "\n"))?;

        Ok(Self {
            path: topology.to_path_buf(),
            original,
            restored: false,
        })
    }

    /// Put the original content back. Preferred over relying on `Drop` so
    /// restore failures surface as errors.
    pub fn restore(mut self) -> Result<(), EngineError> {
        write_atomic(&self.path, &self.original)?;
        self.restored = true;
        Ok(())
    }
}

impl Drop for TopologyPatch {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = write_atomic(&self.path, &self.original) {
            warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to restore topology file after an aborted chain run"
            );
        }
    }
}

/// Write `content` to `path` via a temporary file and atomic rename, so a
/// crash mid-write can never leave a half-patched topology behind.
fn write_atomic(path: &Path, content: &str) -> Result<(), EngineError> {
    let dir = path.parent().ok_or_else(|| EngineError::Topology {
        path: path.to_path_buf(),
        message: "file has no parent directory".to_string(),
    })?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, content.as_bytes())?;
    tmp.persist(path).map_err(|e| EngineError::Topology {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(())
}
