pub mod config;
pub mod energy;
pub mod io;
pub mod models;
