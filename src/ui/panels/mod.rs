// EMS Log Filter - ui/panels/mod.rs

pub mod filters;
pub mod keys;
