//! Command-line interface definition.
use std::path::PathBuf;

use clap::Parser;

use crate::walk::DEFAULT_MARKER;

/// Version reported by `--version`: the build's `git describe` output when
/// available, otherwise the package version.
const VERSION: &str = match option_env!("DOTCON_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Mirror a dotfile directory's `home/` tree into symlinks under your home
/// directory.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "dotcon",
    about = "Dotfile configuration management made easy",
    version = VERSION
)]
pub struct Cli {
    /// Relative or absolute path to the dotfile directory. Defaults to `~/.dotfiles`
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Directory to create links in. Defaults to your home directory
    #[arg(short, long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Character that, at the start or end of a directory name, links the directory as a whole
    #[arg(long, value_name = "CHAR", default_value_t = DEFAULT_MARKER)]
    pub marker: char,

    /// Link submodules file by file instead of as whole directories
    #[arg(long)]
    pub no_submodules: bool,

    /// Overwrite every existing destination without asking
    #[arg(long, conflicts_with = "skip_existing")]
    pub overwrite: bool,

    /// Keep every existing destination without asking
    #[arg(long)]
    pub skip_existing: bool,

    /// Preview links without changing anything
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
