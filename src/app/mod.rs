// EMS Log Filter - app/mod.rs
//
// Application layer: orchestration, state management, selection memory.
// Dependencies: core and platform layers.
// Must NOT depend on: ui.

pub mod headless;
pub mod load;
pub mod memory;
pub mod state;
pub mod workflow;
