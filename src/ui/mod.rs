// sls-logs - ui/mod.rs
//
// UI layer: terminal presentation only.
// Dependencies: app (sink and prompt traits), core (read-only models),
// colored, console.
// Must NOT depend on: platform.

pub mod printer;
pub mod prompt;
pub mod theme;
