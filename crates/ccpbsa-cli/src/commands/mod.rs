pub mod gxg;
pub mod run;
