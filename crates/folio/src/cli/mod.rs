//! # CLI Behavior
//!
//! This is **one possible UI client** for folio, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes and
//! output formatting.
//!
//! For the overall architecture, see the crate-level documentation in [`crate`].
//!
//! ## Selectors
//!
//! Wherever a command takes a record, it accepts a full UUID, a UUID prefix of
//! at least four characters, or the record's name, title, slug or file name.
//! Ambiguous selectors are rejected with the candidates listed.
//!
//! ## Output
//!
//! - Text by default: numbered rows, a short id column, a status badge and a
//!   relative time, followed by a page footer.
//! - `--json` prints the structured result instead (`CmdResult`, a page, a
//!   tree or the settings), suitable for piping into `jq`.
//! - Logs always go to stderr, filtered by `FOLIO_LOG` (`-v` for debug).
//!
//! ## Listings
//!
//! Every `list` subcommand shares `--search`, `--sort`, `--page` and
//! `--page-size`. Entity specific filters (`--status`, `--category`, `--tag`,
//! `--kind`, ...) accept `all` to disable them. `--deleted` lists the
//! tombstoned records, which `restore` brings back.
//!
//! ## Ad-hoc Queries
//!
//! `folio query FILE` runs the same list engine over any JSON array. Keys for
//! the label, date and manual order are configurable, and `--filter attr=value`
//! adds equality filters.

mod commands;
mod handlers;
mod render;
pub mod setup;
mod styles;

pub use commands::run;
