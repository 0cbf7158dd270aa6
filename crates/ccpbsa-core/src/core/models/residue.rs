use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ResidueCodeError {
    #[error("Unknown one-letter amino acid code '{0}'")]
    UnknownOneLetter(char),

    #[error("Unknown three-letter amino acid code '{0}'")]
    UnknownThreeLetter(String),
}

/// The 20 standard proteinogenic amino acids.
///
/// Mutation instructions arrive in one-letter code, while the external
/// structure editor expects three-letter residue names, so both encodings are
/// carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Charged ---
    Arginine,
    Lysine,
    Histidine,
    AsparticAcid,
    GlutamicAcid,
}

impl AminoAcid {
    /// All 20 residues in one-letter alphabetical order (ACDEFGHIKLMNPQRSTVWY),
    /// the order the GXG baseline table is generated in.
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Alanine,
        AminoAcid::Cysteine,
        AminoAcid::AsparticAcid,
        AminoAcid::GlutamicAcid,
        AminoAcid::Phenylalanine,
        AminoAcid::Glycine,
        AminoAcid::Histidine,
        AminoAcid::Isoleucine,
        AminoAcid::Lysine,
        AminoAcid::Leucine,
        AminoAcid::Methionine,
        AminoAcid::Asparagine,
        AminoAcid::Proline,
        AminoAcid::Glutamine,
        AminoAcid::Arginine,
        AminoAcid::Serine,
        AminoAcid::Threonine,
        AminoAcid::Valine,
        AminoAcid::Tryptophan,
        AminoAcid::Tyrosine,
    ];

    pub fn from_one_letter(c: char) -> Result<Self, ResidueCodeError> {
        match c.to_ascii_uppercase() {
            'A' => Ok(AminoAcid::Alanine),
            'C' => Ok(AminoAcid::Cysteine),
            'D' => Ok(AminoAcid::AsparticAcid),
            'E' => Ok(AminoAcid::GlutamicAcid),
            'F' => Ok(AminoAcid::Phenylalanine),
            'G' => Ok(AminoAcid::Glycine),
            'H' => Ok(AminoAcid::Histidine),
            'I' => Ok(AminoAcid::Isoleucine),
            'K' => Ok(AminoAcid::Lysine),
            'L' => Ok(AminoAcid::Leucine),
            'M' => Ok(AminoAcid::Methionine),
            'N' => Ok(AminoAcid::Asparagine),
            'P' => Ok(AminoAcid::Proline),
            'Q' => Ok(AminoAcid::Glutamine),
            'R' => Ok(AminoAcid::Arginine),
            'S' => Ok(AminoAcid::Serine),
            'T' => Ok(AminoAcid::Threonine),
            'V' => Ok(AminoAcid::Valine),
            'W' => Ok(AminoAcid::Tryptophan),
            'Y' => Ok(AminoAcid::Tyrosine),
            other => Err(ResidueCodeError::UnknownOneLetter(other)),
        }
    }

    pub fn from_three_letter(s: &str) -> Result<Self, ResidueCodeError> {
        match s.to_ascii_uppercase().as_str() {
            "ALA" => Ok(AminoAcid::Alanine),
            "CYS" => Ok(AminoAcid::Cysteine),
            "ASP" => Ok(AminoAcid::AsparticAcid),
            "GLU" => Ok(AminoAcid::GlutamicAcid),
            "PHE" => Ok(AminoAcid::Phenylalanine),
            "GLY" => Ok(AminoAcid::Glycine),
            "HIS" => Ok(AminoAcid::Histidine),
            "ILE" => Ok(AminoAcid::Isoleucine),
            "LYS" => Ok(AminoAcid::Lysine),
            "LEU" => Ok(AminoAcid::Leucine),
            "MET" => Ok(AminoAcid::Methionine),
            "ASN" => Ok(AminoAcid::Asparagine),
            "PRO" => Ok(AminoAcid::Proline),
            "GLN" => Ok(AminoAcid::Glutamine),
            "ARG" => Ok(AminoAcid::Arginine),
            "SER" => Ok(AminoAcid::Serine),
            "THR" => Ok(AminoAcid::Threonine),
            "VAL" => Ok(AminoAcid::Valine),
            "TRP" => Ok(AminoAcid::Tryptophan),
            "TYR" => Ok(AminoAcid::Tyrosine),
            other => Err(ResidueCodeError::UnknownThreeLetter(other.to_string())),
        }
    }

    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Alanine => 'A',
            AminoAcid::Cysteine => 'C',
            AminoAcid::AsparticAcid => 'D',
            AminoAcid::GlutamicAcid => 'E',
            AminoAcid::Phenylalanine => 'F',
            AminoAcid::Glycine => 'G',
            AminoAcid::Histidine => 'H',
            AminoAcid::Isoleucine => 'I',
            AminoAcid::Lysine => 'K',
            AminoAcid::Leucine => 'L',
            AminoAcid::Methionine => 'M',
            AminoAcid::Asparagine => 'N',
            AminoAcid::Proline => 'P',
            AminoAcid::Glutamine => 'Q',
            AminoAcid::Arginine => 'R',
            AminoAcid::Serine => 'S',
            AminoAcid::Threonine => 'T',
            AminoAcid::Valine => 'V',
            AminoAcid::Tryptophan => 'W',
            AminoAcid::Tyrosine => 'Y',
        }
    }

    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Alanine => "ALA",
            AminoAcid::Cysteine => "CYS",
            AminoAcid::AsparticAcid => "ASP",
            AminoAcid::GlutamicAcid => "GLU",
            AminoAcid::Phenylalanine => "PHE",
            AminoAcid::Glycine => "GLY",
            AminoAcid::Histidine => "HIS",
            AminoAcid::Isoleucine => "ILE",
            AminoAcid::Lysine => "LYS",
            AminoAcid::Leucine => "LEU",
            AminoAcid::Methionine => "MET",
            AminoAcid::Asparagine => "ASN",
            AminoAcid::Proline => "PRO",
            AminoAcid::Glutamine => "GLN",
            AminoAcid::Arginine => "ARG",
            AminoAcid::Serine => "SER",
            AminoAcid::Threonine => "THR",
            AminoAcid::Valine => "VAL",
            AminoAcid::Tryptophan => "TRP",
            AminoAcid::Tyrosine => "TYR",
        }
    }

    /// The Gly-X-Gly tripeptide motif used to key the baseline table.
    pub fn gxg_motif(&self) -> String {
        format!("G{}G", self.one_letter())
    }
}
