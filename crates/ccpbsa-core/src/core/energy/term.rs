/// One column of an energy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnergyTerm {
    /// Poisson–Boltzmann reaction-field solvation energy.
    Solvation,
    /// Coulombic energy.
    Coulomb,
    /// Lennard-Jones energy (1-4 plus short-range).
    LennardJones,
    /// Solvent-accessible surface area.
    SurfaceArea,
    /// Conformational entropy as −TS.
    EntropyTs,
    /// Protein–protein interaction surface (binding mode).
    InteractionSurface,
    /// Protonation-state correction (binding mode).
    Pka,
}

impl EnergyTerm {
    /// Columns of a stability run, in persisted order.
    pub const STABILITY: [EnergyTerm; 5] = [
        EnergyTerm::Solvation,
        EnergyTerm::Coulomb,
        EnergyTerm::LennardJones,
        EnergyTerm::SurfaceArea,
        EnergyTerm::EntropyTs,
    ];

    /// Columns of a binding-affinity run, in persisted order.
    pub const BINDING: [EnergyTerm; 5] = [
        EnergyTerm::Solvation,
        EnergyTerm::Coulomb,
        EnergyTerm::LennardJones,
        EnergyTerm::InteractionSurface,
        EnergyTerm::Pka,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EnergyTerm::Solvation => "SOLV",
            EnergyTerm::Coulomb => "COUL",
            EnergyTerm::LennardJones => "LJ",
            EnergyTerm::SurfaceArea => "SAS",
            EnergyTerm::EntropyTs => "-TS",
            EnergyTerm::InteractionSurface => "PPIS",
            EnergyTerm::Pka => "PKA",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SOLV" => Some(EnergyTerm::Solvation),
            "COUL" => Some(EnergyTerm::Coulomb),
            "LJ" => Some(EnergyTerm::LennardJones),
            "SAS" => Some(EnergyTerm::SurfaceArea),
            "-TS" => Some(EnergyTerm::EntropyTs),
            "PPIS" => Some(EnergyTerm::InteractionSurface),
            "PKA" => Some(EnergyTerm::Pka),
            _ => None,
        }
    }
}
