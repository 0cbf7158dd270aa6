use std::collections::HashMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlagsError {
    #[error("Flag file is missing the '{0}' section")]
    MissingSection(&'static str),

    #[error("The '{disco}' section has no '-n' flag (ensemble size)", disco = FlagSection::Disco.header())]
    MissingEnsembleSize,

    #[error("Ensemble size '{0}' is not a positive integer")]
    InvalidEnsembleSize(String),

    #[error("Failed to read flag file '{path}': {message}")]
    Io { path: String, message: String },
}

/// The flag-file sections, one per external tool invocation that accepts
/// user-supplied options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagSection {
    /// CONCOORD `dist` (distance-bound generation).
    Dist,
    /// CONCOORD `disco` (conformer sampling). Its `-n` value is the canonical
    /// ensemble size for the whole pipeline.
    Disco,
    /// GROMACS `pdb2gmx` (topology generation).
    Pdb2gmx,
    /// GROMACS `editconf` (box setup).
    Editconf,
    /// GROMACS `grompp` (run-input compilation).
    Grompp,
    /// GROMACS `mdrun` (minimization / rerun).
    Mdrun,
}

impl FlagSection {
    pub const ALL: [FlagSection; 6] = [
        FlagSection::Dist,
        FlagSection::Disco,
        FlagSection::Pdb2gmx,
        FlagSection::Editconf,
        FlagSection::Grompp,
        FlagSection::Mdrun,
    ];

    /// The exact header line that introduces this section in the flag file.
    pub fn header(&self) -> &'static str {
        match self {
            FlagSection::Dist => "DIST FLAGS",
            FlagSection::Disco => "DISCO FLAGS",
            FlagSection::Pdb2gmx => "PDB2GMX FLAGS",
            FlagSection::Editconf => "EDITCONF FLAGS",
            FlagSection::Grompp => "GROMPP FLAGS",
            FlagSection::Mdrun => "MDRUN FLAGS",
        }
    }
}

/// Parsed flag configuration: one ordered argument list per external tool.
///
/// The file format is a flat list of section headers with `key=value` lines
/// between them. Values are not kept as associations; each line is flattened
/// into tokens (`-n=200` becomes `-n` `200`) so the list can be appended
/// directly to a tool's argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFlags {
    sections: HashMap<FlagSection, Vec<String>>,
}

impl ToolFlags {
    pub fn load(path: &Path) -> Result<Self, FlagsError> {
        let content = fs::read_to_string(path).map_err(|e| FlagsError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse the flag-file text. `;` starts an inline comment; blank lines
    /// are ignored. Every expected section header must be present, even if
    /// its argument list is empty; a missing header is a configuration error
    /// because downstream invocations depend on specific flags existing.
    pub fn parse(content: &str) -> Result<Self, FlagsError> {
        let mut sections: HashMap<FlagSection, Vec<String>> = HashMap::new();
        let mut current: Option<FlagSection> = None;

        for raw in content.lines() {
            let line = match raw.find(';') {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            if let Some(section) = FlagSection::ALL
                .iter()
                .find(|s| s.header() == line)
                .copied()
            {
                sections.entry(section).or_default();
                current = Some(section);
                continue;
            }

            let Some(section) = current else {
                // Content before the first header has no tool to belong to.
                continue;
            };
            let tokens = sections.entry(section).or_default();
            for part in line.split('=') {
                tokens.extend(part.split_whitespace().map(str::to_string));
            }
        }

        for section in FlagSection::ALL {
            if !sections.contains_key(&section) {
                return Err(FlagsError::MissingSection(section.header()));
            }
        }

        Ok(Self { sections })
    }

    pub fn args(&self, section: FlagSection) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The number of conformers `disco` is asked to sample: the token
    /// following `-n` in the DISCO section. This value defines the ensemble
    /// size assumed by every later stage.
    pub fn ensemble_size(&self) -> Result<usize, FlagsError> {
        let args = self.args(FlagSection::Disco);
        let value = args
            .iter()
            .position(|t| t == "-n")
            .and_then(|idx| args.get(idx + 1))
            .ok_or(FlagsError::MissingEnsembleSize)?;
        let n: usize = value
            .parse()
            .map_err(|_| FlagsError::InvalidEnsembleSize(value.clone()))?;
        if n == 0 {
            return Err(FlagsError::InvalidEnsembleSize(value.clone()));
        }
        Ok(n)
    }
}
