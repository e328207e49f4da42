//! # Folio CLI Architecture
//!
//! The binary is thin: the CLI lives in `src/cli/`, while this file only
//! invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/folioapp/`: UI-agnostic content library (models, commands,
//!   query engine, storage)
//! - `crates/folio/`: this CLI, depending on `folioapp`
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/folio/src/cli/)                   │
//! │  - clap argument parsing (setup.rs)                  │
//! │  - logging + store wiring (commands.rs)              │
//! │  - per-entity dispatch (handlers.rs)                 │
//! │  - text rendering (render.rs, styles.rs)             │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  API Layer (crates/folioapp/src/api.rs)              │
//! │  - Resolves selectors to UUIDs                       │
//! │  - Applies configured sorts and page sizes           │
//! └──────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌──────────────────────────────────────────────────────┐
//! │  Command Layer (crates/folioapp/src/commands/*)      │
//! │  - Business rules, no stdout/stderr                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Testing Approach
//!
//! - Commands and the query engine are unit tested inside `folioapp` against
//!   the in-memory store.
//! - Rendering is tested on canned records in `render.rs`.
//! - `tests/cli_e2e.rs` drives the real binary against a temporary data dir.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
