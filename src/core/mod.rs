// sls-logs - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library, walkdir and glob (for the on-disk
// definition source).
// Must NOT depend on: ui, platform, app, or terminal crates.

pub mod command;
pub mod definition;
pub mod discovery;
pub mod model;
pub mod relay;
pub mod resolver;
