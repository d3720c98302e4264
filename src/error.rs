//! Domain-specific error types for the dotfile linker.
//!
//! Library modules return typed errors built with [`thiserror`]; the command
//! handler and `main` convert them to [`anyhow::Error`] via `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! DotconError
//! ├── Config(ConfigError)  settings resolution, missing source directory
//! ├── Walk(WalkError)      source tree traversal
//! └── Link(LinkError)      symlink creation and removal, prompting
//! ```
//!
//! Existing destinations and missing parent directories are recovered by the
//! linker and never appear here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a linking run.
#[derive(Error, Debug)]
pub enum DotconError {
    /// The run could not be configured; nothing was linked.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The source tree could not be traversed.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// A link unit could not be linked.
    #[error(transparent)]
    Link(#[from] LinkError),
}

/// Errors raised while resolving run settings, before any linking begins.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The platform home directory lookup returned nothing.
    #[error("cannot determine the home directory")]
    HomeNotFound,

    /// The current working directory could not be read while resolving a
    /// relative dotfile directory.
    #[error("cannot read the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The source directory does not exist or is not a directory.
    #[error("\"{}\" does not exist.", .path.display())]
    SourceMissing {
        /// The expected source directory.
        path: PathBuf,
    },
}

/// Errors raised while walking the source tree.
#[derive(Error, Debug)]
pub enum WalkError {
    /// A directory entry could not be read.
    #[error("failed to walk source tree: {0}")]
    Traverse(#[from] walkdir::Error),

    /// The walker yielded a path outside the source root.
    #[error("path escapes the source root: {}", .path.display())]
    OutsideRoot {
        /// The offending path.
        path: PathBuf,
    },
}

/// Unexpected I/O failures while linking a single unit.
#[derive(Error, Debug)]
pub enum LinkError {
    /// Creating the symlink failed for a reason other than an existing
    /// destination or a missing parent directory.
    #[error("failed to link {} -> {}: {source}", .dest.display(), .target.display())]
    CreateLink {
        /// Where the link was to be created.
        dest: PathBuf,
        /// What the link was to point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Creating the destination's missing ancestor directories failed.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Removing an existing destination failed.
    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        /// Destination that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The operator could not be asked how to resolve a conflict.
    #[error("conflict prompt failed: {0}")]
    Prompt(#[source] io::Error),
}
