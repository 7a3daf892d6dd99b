// EMS Log Filter - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file reading and
// external process launching.
// Must NOT depend on: app, ui.

pub mod config;
pub mod editor;
pub mod fs;
