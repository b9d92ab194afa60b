//! # CLI Behavior
//!
//! This is **one possible UI client** for gardenapp, not the pipeline itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Naked Execution (`garden`)
//!
//! Running `garden` with no subcommand runs `garden build`: load everything and
//! print the summary. It is the quickest way to see that the content parses.
//!
//! ## Artifacts Go to Stdout
//!
//! `rss`, `sitemap` and `render` print exactly what the site serves, so they can
//! be redirected into the output directory. Diagnostics (unknown tags, missing
//! CDN snapshot, failed lookups) are log records on stderr.
//!
//! ## Development vs Production
//!
//! Without `--production` every entry is kept, drafts and private notes
//! included. `--production` applies the same redaction a public build does.
//!
//! ## Output Modes
//!
//! `--output term` (the default) prints aligned, styled text. `--output json`
//! prints the API's values as pretty JSON for scripts.

mod commands;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
