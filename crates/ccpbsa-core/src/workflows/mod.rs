//! Complete pipeline runs, assembled from the engine stages.
//!
//! Each workflow is a free function over a [`PipelineContext`] that strings
//! the stages together in a fixed order, aggregates the scraped energies and
//! persists the resulting tables next to the structures that produced them.

pub mod binding;
pub mod gxg;
pub mod stability;

use crate::core::config::flags::ToolFlags;
use crate::core::energy::delta::Coefficients;
use crate::engine::config::RunSettings;
use crate::engine::progress::ProgressReporter;
use crate::engine::runner::ToolRunner;

/// Everything a workflow needs besides its own inputs: the tool seam, the
/// parsed flag file, the validated run settings, the ΔΔG coefficients and
/// the progress sink.
pub struct PipelineContext<'a> {
    pub runner: &'a dyn ToolRunner,
    pub flags: &'a ToolFlags,
    pub settings: &'a RunSettings,
    pub coefficients: Coefficients,
    pub reporter: &'a ProgressReporter<'a>,
}

/// File names of the persisted result tables.
pub const G_TABLE: &str = "G.csv";
pub const DG_TABLE: &str = "dG.csv";
pub const DDG_TABLE: &str = "ddG.csv";
pub const GXG_TABLE: &str = "GXG.csv";
