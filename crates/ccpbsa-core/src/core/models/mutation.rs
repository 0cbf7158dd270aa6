use super::residue::{AminoAcid, ResidueCodeError};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error("Empty mutation instruction")]
    Empty,

    #[error("Mutation '{0}' has no residue position")]
    MissingPosition(String),

    #[error("Mutation '{spec}' position is not a positive integer: {value}")]
    InvalidPosition { spec: String, value: String },

    #[error("Mutation '{spec}': {source}")]
    Residue {
        spec: String,
        source: ResidueCodeError,
    },

    #[error("Failed to read mutation list '{path}': {message}")]
    Io { path: String, message: String },
}

/// One point-mutation instruction.
///
/// The raw spec string (e.g. `A20G` or `B_H10I`) doubles as the unique variant
/// key throughout the pipeline: it names the variant's working directory and
/// its row in every energy table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mutation {
    pub spec: String,
    pub chain: Option<char>,
    pub original: AminoAcid,
    pub position: u32,
    pub target: AminoAcid,
}

impl Mutation {
    /// Parse a single instruction of the form
    /// `[chain_]OriginalOneLetter Position NewOneLetter` (no spaces), e.g.
    /// `A20G` for a monomer or `B_H10I` for chain B of a dimer.
    pub fn parse(spec: &str) -> Result<Self, MutationError> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err(MutationError::Empty);
        }

        let (chain, body) = match spec.split_once('_') {
            Some((prefix, rest)) => (prefix.chars().next(), rest),
            None => (None, spec),
        };

        let digits: String = body.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            return Err(MutationError::MissingPosition(spec.to_string()));
        }
        let position: u32 = digits
            .parse()
            .map_err(|_| MutationError::InvalidPosition {
                spec: spec.to_string(),
                value: digits.clone(),
            })?;
        if position == 0 {
            return Err(MutationError::InvalidPosition {
                spec: spec.to_string(),
                value: digits,
            });
        }

        let original_char = body
            .chars()
            .next()
            .ok_or_else(|| MutationError::MissingPosition(spec.to_string()))?;
        let target_char = spec
            .chars()
            .next_back()
            .ok_or_else(|| MutationError::MissingPosition(spec.to_string()))?;

        let residue = |c: char| {
            AminoAcid::from_one_letter(c).map_err(|source| MutationError::Residue {
                spec: spec.to_string(),
                source,
            })
        };

        Ok(Mutation {
            spec: spec.to_string(),
            chain,
            original: residue(original_char)?,
            position,
            target: residue(target_char)?,
        })
    }

    /// Baseline motifs for the stability calculation: `(G{original}G,
    /// G{target}G)`.
    pub fn gxg_motifs(&self) -> (String, String) {
        (self.original.gxg_motif(), self.target.gxg_motif())
    }
}

/// Parse a mutation list file, one instruction per line. Blank lines are
/// skipped; everything else must parse.
pub fn parse_mutation_list(path: &Path) -> Result<Vec<Mutation>, MutationError> {
    let content = fs::read_to_string(path).map_err(|e| MutationError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    parse_mutation_lines(&content)
}

pub fn parse_mutation_lines(content: &str) -> Result<Vec<Mutation>, MutationError> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Mutation::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monomer_spec_parses_without_chain() {
        let m = Mutation::parse("A20G").unwrap();
        assert_eq!(m.chain, None);
        assert_eq!(m.original, AminoAcid::Alanine);
        assert_eq!(m.position, 20);
        assert_eq!(m.target, AminoAcid::Glycine);
        assert_eq!(m.spec, "A20G");
    }

    #[test]
    fn chain_prefix_is_split_on_underscore() {
        let m = Mutation::parse("B_H10I").unwrap();
        assert_eq!(m.chain, Some('B'));
        assert_eq!(m.original, AminoAcid::Histidine);
        assert_eq!(m.position, 10);
        assert_eq!(m.target, AminoAcid::Isoleucine);
    }

    #[test]
    fn multi_digit_positions_are_collected() {
        let m = Mutation::parse("W131F").unwrap();
        assert_eq!(m.position, 131);
    }

    #[test]
    fn unknown_residue_code_is_a_typed_error() {
        let err = Mutation::parse("A20X").unwrap_err();
        assert!(matches!(err, MutationError::Residue { .. }));
    }

    #[test]
    fn missing_position_is_rejected() {
        assert_eq!(
            Mutation::parse("AG"),
            Err(MutationError::MissingPosition("AG".to_string()))
        );
    }

    #[test]
    fn zero_position_is_rejected() {
        assert!(matches!(
            Mutation::parse("A0G"),
            Err(MutationError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn list_parsing_skips_blank_lines() {
        let muts = parse_mutation_lines("A20G\n\nB_H10I\n").unwrap();
        assert_eq!(muts.len(), 2);
        assert_eq!(muts[1].spec, "B_H10I");
    }

    #[test]
    fn gxg_motifs_come_from_original_and_target() {
        let m = Mutation::parse("A20G").unwrap();
        assert_eq!(m.gxg_motifs(), ("GAG".to_string(), "GGG".to_string()));
    }
}
