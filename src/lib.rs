//! Dotfile linking engine.
//!
//! Mirrors the `home/` tree of a dotfile directory into symlinks under a
//! target directory, normally the user's home.  Files are linked one by one;
//! directories whose name ends with a marker symbol, and submodule roots, are
//! linked as a whole.
//!
//! The public API is organised into layers:
//!
//! - **[`walk`]** classifies the source tree into link units
//! - **[`paths`]** maps link units to destinations
//! - **[`link`]** creates symlinks and resolves conflicts with existing files
//! - **[`commands`]** wires settings, walker and linker together
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod link;
pub mod logging;
pub mod paths;
pub mod prompt;
pub mod walk;
