//! ChatLPT is a tabbed chat client whose tabs look like an old green-on-black
//! terminal.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns sessions, the command dispatcher, the response renderer,
//!   configuration, and chat files.
//! - [`ui`] draws the screen and runs the interactive event loop.
//! - [`api`] defines the remote collaborators and the HTTP client behind them.
//! - [`cli`] parses arguments and implements the `set`/`unset` subcommands.
//!
//! The binary (`src/main.rs`) routes through [`crate::cli::main`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
