//! # CC/PBSA Core Library
//!
//! An orchestration library for CC/PBSA, a fast method for estimating folding
//! and binding free energy differences (ΔΔG) between a wildtype protein and a
//! list of point mutants. The physics itself (CONCOORD ensemble generation,
//! GROMACS minimization and single-point energies, Poisson–Boltzmann
//! solvation, Schlitter entropy) is computed by external command-line tools;
//! this library sequences those tools, manages their directory-backed
//! intermediate state, scrapes their text output into energy tables, and
//! derives the final free-energy differences.
//!
//! ## Architectural Philosophy
//!
//! The library is split into three layers with a strict dependency direction:
//!
//! - **[`core`]: The Foundation.** Stateless data models (amino acids,
//!   mutation records, the flag configuration), pure parsers for the external
//!   tools' text formats, and the energy-table arithmetic.
//!
//! - **[`engine`]: The Logic Core.** The stateful orchestration layer: the
//!   tool-invocation seam, the workspace of variant and conformer
//!   directories, the individual pipeline stages, and the result aggregator.
//!
//! - **[`workflows`]: The Public API.** Complete runs (stability, binding
//!   affinity, GXG baseline generation) that tie the stages together and emit
//!   the persisted CSV tables.

pub mod core;
pub mod engine;
pub mod workflows;
