use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SettingsError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Binding mode requires at least two chains, got {0}")]
    NotEnoughChains(usize),
}

/// Which free-energy difference the pipeline estimates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Folding stability (ΔΔG of folding), with the GXG tripeptide baseline.
    Stability,
    /// Binding affinity of a multi-chain complex, with per-chain energy
    /// decomposition.
    Binding,
}

/// Auxiliary input files handed verbatim to the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryFiles {
    /// Minimization parameter file (`grompp -f` during minimization).
    pub minimization_mdp: PathBuf,
    /// Single-point parameter file (`grompp -f` for the rerun).
    pub singlepoint_mdp: PathBuf,
    /// Interaction table for `mdrun -table`/`-tablep`.
    pub interaction_table: PathBuf,
    /// Base parameter file for the Poisson–Boltzmann solver; the run-input
    /// line is injected per structure.
    pub pb_params: PathBuf,
}

/// Validated settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub mode: RunMode,
    /// Chain identifiers of the complex, in topology order. A single unnamed
    /// chain is represented as `['A']`.
    pub chains: Vec<char>,
    pub files: AuxiliaryFiles,
}

#[derive(Default)]
pub struct RunSettingsBuilder {
    mode: Option<RunMode>,
    chains: Option<Vec<char>>,
    minimization_mdp: Option<PathBuf>,
    singlepoint_mdp: Option<PathBuf>,
    interaction_table: Option<PathBuf>,
    pb_params: Option<PathBuf>,
}

impl RunSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: RunMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn chains(mut self, chains: Vec<char>) -> Self {
        self.chains = Some(chains);
        self
    }

    pub fn minimization_mdp(mut self, path: PathBuf) -> Self {
        self.minimization_mdp = Some(path);
        self
    }

    pub fn singlepoint_mdp(mut self, path: PathBuf) -> Self {
        self.singlepoint_mdp = Some(path);
        self
    }

    pub fn interaction_table(mut self, path: PathBuf) -> Self {
        self.interaction_table = Some(path);
        self
    }

    pub fn pb_params(mut self, path: PathBuf) -> Self {
        self.pb_params = Some(path);
        self
    }

    pub fn build(self) -> Result<RunSettings, SettingsError> {
        let mode = self.mode.ok_or(SettingsError::MissingParameter("mode"))?;
        let chains = self.chains.unwrap_or_else(|| vec!['A']);
        if mode == RunMode::Binding && chains.len() < 2 {
            return Err(SettingsError::NotEnoughChains(chains.len()));
        }

        Ok(RunSettings {
            mode,
            chains,
            files: AuxiliaryFiles {
                minimization_mdp: self
                    .minimization_mdp
                    .ok_or(SettingsError::MissingParameter("minimization_mdp"))?,
                singlepoint_mdp: self
                    .singlepoint_mdp
                    .ok_or(SettingsError::MissingParameter("singlepoint_mdp"))?,
                interaction_table: self
                    .interaction_table
                    .ok_or(SettingsError::MissingParameter("interaction_table"))?,
                pb_params: self
                    .pb_params
                    .ok_or(SettingsError::MissingParameter("pb_params"))?,
            },
        })
    }
}
