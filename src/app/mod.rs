// sls-logs - app/mod.rs
//
// Application layer: orchestration, selection, streaming, installation.
// Dependencies: core, platform.
// Must NOT depend on: ui.

pub mod install;
pub mod run;
pub mod select;
pub mod state;
pub mod stream;
