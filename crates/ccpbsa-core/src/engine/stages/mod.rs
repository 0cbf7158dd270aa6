//! The individual pipeline stages, one module per external tool family.
//!
//! Every stage is a free function over explicit [`WorkDir`](super::workspace::WorkDir)
//! entries and a [`ToolRunner`](super::runner::ToolRunner); stages never share
//! ambient state, so the order in which a workflow strings them together is
//! the only sequencing that exists.

pub mod area;
pub mod electrostatics;
pub mod ensemble;
pub mod entropy;
pub mod minimize;
pub mod mutate;
pub mod singlepoint;
