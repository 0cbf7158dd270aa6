pub mod collect;
pub mod config;
pub mod error;
pub mod progress;
pub mod runner;
pub mod stages;
pub mod topology;
pub mod workspace;
