//! Run settings resolved from the command line and the platform home lookup.
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::link::ConflictPolicy;
use crate::walk::WalkOptions;

/// Dotfile directory used when none is given, relative to the home directory.
pub const DEFAULT_DOTFILE_DIR: &str = ".dotfiles";

/// Subdirectory of the dotfile directory that mirrors the home directory.
pub const SOURCE_SUBDIR: &str = "home";

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The selected dotfile directory.
    pub dotfile_dir: PathBuf,
    /// Tree being mirrored: `<dotfile_dir>/home`.
    pub source_root: PathBuf,
    /// Directory the links are created in.
    pub target_root: PathBuf,
    /// How the source tree is classified.
    pub walk: WalkOptions,
    /// Conflict policy the run starts with.
    pub policy: ConflictPolicy,
    /// Report instead of linking.
    pub dry_run: bool,
}

impl Settings {
    /// Resolve settings from parsed arguments, the platform home directory and
    /// the current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, or if a
    /// relative dotfile directory is given and the current directory cannot be
    /// read.
    pub fn from_cli(args: &Cli) -> Result<Self, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        let cwd = match &args.dir {
            Some(dir) if dir.is_relative() => {
                Some(std::env::current_dir().map_err(ConfigError::CurrentDir)?)
            }
            _ => None,
        };
        Ok(Self::resolve(args, &home, cwd.as_deref()))
    }

    /// Resolve settings against explicit home and working directories.
    ///
    /// `cwd` is only consulted for a relative `--dir`; when it is `None` the
    /// relative path is used unchanged.
    #[must_use]
    pub fn resolve(args: &Cli, home: &Path, cwd: Option<&Path>) -> Self {
        let dotfile_dir = resolve_dotfile_dir(args.dir.as_deref(), home, cwd);
        let source_root = dotfile_dir.join(SOURCE_SUBDIR);
        let target_root = args.target.clone().unwrap_or_else(|| home.to_path_buf());
        Self {
            dotfile_dir,
            source_root,
            target_root,
            walk: WalkOptions {
                marker: args.marker,
                link_submodules_whole: !args.no_submodules,
            },
            policy: initial_policy(args),
            dry_run: args.dry_run,
        }
    }

    /// Check that the source root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SourceMissing`] otherwise.
    pub fn ensure_source(&self) -> Result<(), ConfigError> {
        if self.source_root.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::SourceMissing {
                path: self.source_root.clone(),
            })
        }
    }
}

/// Pick the dotfile directory: the default under `home`, an absolute path
/// as-is, or a relative path joined to `cwd`.
fn resolve_dotfile_dir(dir: Option<&Path>, home: &Path, cwd: Option<&Path>) -> PathBuf {
    match dir {
        None => home.join(DEFAULT_DOTFILE_DIR),
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.map_or_else(|| dir.to_path_buf(), |cwd| cwd.join(dir)),
    }
}

const fn initial_policy(args: &Cli) -> ConflictPolicy {
    if args.overwrite {
        ConflictPolicy::AlwaysOverwrite
    } else if args.skip_existing {
        ConflictPolicy::AlwaysSkip
    } else {
        ConflictPolicy::Ask
    }
}
