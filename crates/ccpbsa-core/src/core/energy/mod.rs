pub mod delta;
pub mod table;
pub mod term;
