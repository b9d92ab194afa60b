//! # Garden CLI Architecture
//!
//! The binary is intentionally thin: the CLI lives in `src/cli/`, while this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ## Workspace Structure
//!
//! - `crates/gardenapp/`: the pipeline library, UI-agnostic
//! - `crates/garden/`: this CLI, a client of the library's API facade
//!
//! ## Layering
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (crates/garden/src/cli/)                         │
//! │  - clap argument parsing (setup.rs)                         │
//! │  - Config, logging and API wiring, dispatch (commands.rs)   │
//! │  - Terminal and JSON rendering (render.rs, styles.rs)       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (crates/gardenapp/src/api.rs)                    │
//! │  - SiteApi / Build                                          │
//! │  - Returns structured values, HTML and XML                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Diagnostics from the library arrive through the `log` facade; the CLI routes
//! them to stderr with `simplelog`, so stdout only ever carries command output
//! and can be redirected into a file (`garden rss > dist/rss.xml`).
//!
//! ## Testing Approach
//!
//! - Pipeline logic is unit tested in the library.
//! - Rendering helpers are tested in `render.rs`.
//! - `tests/` runs the binary against a temporary site with `assert_cmd`.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
