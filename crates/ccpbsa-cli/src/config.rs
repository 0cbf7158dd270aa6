use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use ccpbsa::core::energy::delta::Coefficients;
use ccpbsa::engine::config::{RunMode, RunSettings, RunSettingsBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The run configuration file. Relative paths are resolved against the
/// directory the file itself lives in, so a run directory can be copied or
/// mounted elsewhere without touching the file.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct RunConfig {
    pub mode: FileMode,
    /// Wildtype structure (monomer or complex) in PDB format.
    pub structure: PathBuf,
    /// Mutation list, one instruction per line.
    pub mutations: PathBuf,
    /// Flag file with one section per wrapped tool.
    pub flags: PathBuf,
    /// Chain identifiers of the complex; defaults to a single chain.
    #[serde(default)]
    pub chains: Option<Vec<char>>,
    /// GXG baseline table; required in stability mode.
    #[serde(default)]
    pub gxg_table: Option<PathBuf>,
    /// Parent directory for the run workspace; defaults to the config dir.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    pub files: FileAuxiliary,
    pub coefficients: Coefficients,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileMode {
    Stability,
    Binding,
}

impl From<FileMode> for RunMode {
    fn from(mode: FileMode) -> Self {
        match mode {
            FileMode::Stability => RunMode::Stability,
            FileMode::Binding => RunMode::Binding,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileAuxiliary {
    pub minimization_mdp: PathBuf,
    pub singlepoint_mdp: PathBuf,
    pub interaction_table: PathBuf,
    pub pb_params: PathBuf,
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let mut config: RunConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(base);
        debug!(?config, "Loaded run configuration");
        Ok(config)
    }

    /// Apply command-line overrides on top of the file values.
    pub fn merge_with_cli(mut self, args: &RunArgs) -> Self {
        if let Some(structure) = &args.structure {
            self.structure = structure.clone();
        }
        if let Some(mutations) = &args.mutations {
            self.mutations = mutations.clone();
        }
        if let Some(gxg_table) = &args.gxg_table {
            self.gxg_table = Some(gxg_table.clone());
        }
        if let Some(output_dir) = &args.output_dir {
            self.output_dir = Some(output_dir.clone());
        }
        self
    }

    /// Build the validated engine settings out of this configuration.
    pub fn settings(&self) -> Result<RunSettings> {
        let mut builder = RunSettingsBuilder::new()
            .mode(self.mode.into())
            .minimization_mdp(self.files.minimization_mdp.clone())
            .singlepoint_mdp(self.files.singlepoint_mdp.clone())
            .interaction_table(self.files.interaction_table.clone())
            .pb_params(self.files.pb_params.clone());
        if let Some(chains) = &self.chains {
            builder = builder.chains(chains.clone());
        }
        Ok(builder.build()?)
    }

    /// The directory the workspace is created under.
    pub fn workspace_parent(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// The workspace/reference name, taken from the structure's file stem.
    pub fn reference_key(&self) -> Result<String> {
        self.structure
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CliError::Argument(format!(
                    "structure path '{}' has no file name",
                    self.structure.display()
                ))
            })
    }

    fn resolve_paths(&mut self, base: &Path) {
        for path in [
            &mut self.structure,
            &mut self.mutations,
            &mut self.flags,
            &mut self.files.minimization_mdp,
            &mut self.files.singlepoint_mdp,
            &mut self.files.interaction_table,
            &mut self.files.pb_params,
        ] {
            if path.is_relative() {
                *path = base.join(path.as_path());
            }
        }
        if let Some(gxg) = &mut self.gxg_table {
            if gxg.is_relative() {
                *gxg = base.join(gxg.as_path());
            }
        }
        if let Some(out) = &mut self.output_dir {
            if out.is_relative() {
                *out = base.join(out.as_path());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
mode = "stability"
structure = "1stn.pdb"
mutations = "mutations.txt"
flags = "flags.txt"
gxg-table = "GXG/GXG.csv"

[files]
minimization-mdp = "min.mdp"
singlepoint-mdp = "energy.mdp"
interaction-table = "table.xvg"
pb-params = "gropbe.txt"

[coefficients]
alpha = 0.224
beta = 0.217
gamma = 0.0166
tau = 0.0287
"#;

    fn write_config(content: &str) -> (tempfile::TempDir, RunConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.toml");
        std::fs::write(&path, content).unwrap();
        let config = RunConfig::from_file(&path).unwrap();
        (tmp, config)
    }

    #[test]
    fn relative_paths_resolve_against_the_config_directory() {
        let (tmp, config) = write_config(CONFIG);
        assert_eq!(config.structure, tmp.path().join("1stn.pdb"));
        assert_eq!(config.gxg_table, Some(tmp.path().join("GXG/GXG.csv")));
        assert_eq!(
            config.files.interaction_table,
            tmp.path().join("table.xvg")
        );
    }

    #[test]
    fn settings_default_to_a_single_chain() {
        let (_tmp, config) = write_config(CONFIG);
        let settings = config.settings().unwrap();
        assert_eq!(settings.mode, RunMode::Stability);
        assert_eq!(settings.chains, vec!['A']);
    }

    #[test]
    fn binding_without_chains_is_a_settings_error() {
        let binding = CONFIG.replace("mode = \"stability\"", "mode = \"binding\"");
        let (_tmp, config) = write_config(&binding);
        assert!(config.settings().is_err());
    }

    #[test]
    fn cli_overrides_take_precedence() {
        let (_tmp, config) = write_config(CONFIG);
        let args = RunArgs {
            config: PathBuf::from("run.toml"),
            structure: Some(PathBuf::from("/elsewhere/2lzm.pdb")),
            mutations: None,
            gxg_table: None,
            output_dir: Some(PathBuf::from("/scratch")),
        };
        let merged = config.merge_with_cli(&args);
        assert_eq!(merged.structure, PathBuf::from("/elsewhere/2lzm.pdb"));
        assert_eq!(merged.workspace_parent(), PathBuf::from("/scratch"));
        assert_eq!(merged.reference_key().unwrap(), "2lzm");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("run.toml");
        std::fs::write(&path, format!("{CONFIG}\nunknown-key = 1\n")).unwrap();
        assert!(matches!(
            RunConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }
}
