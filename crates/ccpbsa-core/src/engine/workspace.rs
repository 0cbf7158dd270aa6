use super::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One filesystem-backed unit of pipeline state: either a variant directory
/// (pre-ensemble) or one numbered conformer subdirectory of a variant.
///
/// Every stage receives these entries by value and resolves files against
/// `path`; there is no ambient working directory anywhere in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkDir {
    /// Key of the variant this directory belongs to (the raw mutation spec,
    /// the wildtype name, or a GXG motif).
    pub variant: String,
    /// Conformer index (1-based), absent before ensemble expansion.
    pub conformer: Option<usize>,
    pub path: PathBuf,
}

impl WorkDir {
    /// The file-name prefix the external tools use in this directory: the
    /// variant key before ensemble expansion, the conformer number after.
    pub fn prefix(&self) -> String {
        match self.conformer {
            Some(i) => i.to_string(),
            None => self.variant.clone(),
        }
    }

    /// The structure file this directory was seeded with.
    pub fn structure_file(&self) -> PathBuf {
        self.path.join(format!("{}.pdb", self.prefix()))
    }

    pub fn file(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

/// The on-disk tree for one run: a root directory holding one subdirectory
/// per variant (wildtype first), each of which later gains numbered conformer
/// subdirectories. Directories are created eagerly and never deleted.
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    variants: Vec<WorkDir>,
}

impl Workspace {
    /// Open (creating if necessary) a workspace root with no variants yet.
    pub fn open(root: &Path) -> Result<Self, EngineError> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            variants: Vec::new(),
        })
    }

    /// Create the standard layout for a run: a root named after the wildtype
    /// structure, with the wildtype itself as variant 0 and its structure
    /// file copied in as `<name>/<name>.pdb`.
    pub fn create(parent: &Path, reference_key: &str, structure: &Path) -> Result<Self, EngineError> {
        let mut ws = Self::open(&parent.join(reference_key))?;
        let reference = ws.add_variant(reference_key)?.clone();
        let target = reference.structure_file();
        if !target.exists() {
            fs::copy(structure, &target)?;
        }
        Ok(ws)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The wildtype/reference entry (variant 0).
    pub fn reference(&self) -> Result<&WorkDir, EngineError> {
        self.variants.first().ok_or(EngineError::DataIncomplete {
            what: "workspace variants".to_string(),
            expected: 1,
            found: 0,
        })
    }

    pub fn variants(&self) -> &[WorkDir] {
        &self.variants
    }

    pub fn variant_keys(&self) -> Vec<String> {
        self.variants.iter().map(|v| v.variant.clone()).collect()
    }

    /// Register (and create on disk) a variant directory. Idempotent: adding
    /// a key that is already present returns the existing entry without
    /// duplicating it in the list or touching its contents.
    pub fn add_variant(&mut self, key: &str) -> Result<&WorkDir, EngineError> {
        if let Some(idx) = self.variants.iter().position(|v| v.variant == key) {
            debug!(key, "Variant directory already registered; reusing it");
            return Ok(&self.variants[idx]);
        }
        let path = self.root.join(key);
        fs::create_dir_all(&path)?;
        self.variants.push(WorkDir {
            variant: key.to_string(),
            conformer: None,
            path,
        });
        Ok(self.variants.last().expect("just pushed"))
    }

    /// The conformer directory for `(variant, index)`; does not touch disk.
    pub fn conformer(&self, variant: &WorkDir, index: usize) -> WorkDir {
        WorkDir {
            variant: variant.variant.clone(),
            conformer: Some(index),
            path: variant.path.join(index.to_string()),
        }
    }

    /// All `(variant, conformer)` directories for an ensemble of size `n`,
    /// grouped by variant in registration order.
    pub fn conformers(&self, n: usize) -> Vec<WorkDir> {
        self.variants
            .iter()
            .flat_map(|v| (1..=n).map(|i| self.conformer(v, i)))
            .collect()
    }
}
