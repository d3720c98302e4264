//! Source tree classification.
//!
//! [`Walker`] traverses a source directory top-down and yields one
//! [`LinkUnit`] per thing that must be linked: every regular file, except
//! files inside directories that are linked as a whole.  A directory is linked
//! as a whole when its name starts or ends with the marker symbol, or, in
//! submodule-whole mode, when it contains a `.git` entry that is not itself a
//! directory (the gitlink file `git submodule` writes).
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::WalkError;
use crate::paths::is_within;

/// Marker symbol that forces whole-directory linking (U+2B50, white medium star).
pub const DEFAULT_MARKER: char = '\u{2B50}';

/// Entry name that identifies a version-control submodule root.
pub const SUBMODULE_MARKER: &str = ".git";

/// Why a directory is linked as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirReason {
    /// The directory name starts or ends with the marker symbol.
    Marker,
    /// The directory is a submodule root.
    Submodule,
}

/// An atomically linked entity, identified by its path relative to the
/// source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkUnit {
    /// A single file.
    File(PathBuf),
    /// A directory linked whole; its children are never visited.
    Dir {
        /// Path relative to the source root.
        path: PathBuf,
        /// Which rule classified it.
        reason: DirReason,
    },
}

impl LinkUnit {
    /// Path of this unit relative to the source root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        match self {
            Self::File(path) | Self::Dir { path, .. } => path,
        }
    }

    /// Absolute source path of this unit.
    #[must_use]
    pub fn source_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(self.relative_path())
    }

    /// Returns `true` for whole-directory units.
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }
}

/// Classification rules for a walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Character that marks a directory for whole linking when it starts or
    /// ends the directory name.
    pub marker: char,
    /// Link submodule roots as a whole.
    pub link_submodules_whole: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER,
            link_submodules_whole: true,
        }
    }
}

/// Lazy, single-pass iterator over the [`LinkUnit`]s of a source tree.
///
/// Directories are visited before their children.  Within a directory, files
/// come before subdirectories and both are sorted by name.
pub struct Walker {
    root: PathBuf,
    options: WalkOptions,
    entries: walkdir::IntoIter,
    /// Relative paths already emitted as [`LinkUnit::Dir`].
    classified: Vec<PathBuf>,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("options", &self.options)
            .field("classified", &self.classified)
            .finish_non_exhaustive()
    }
}

impl Walker {
    /// Start a walk over `root`.  Nothing is read until the first call to
    /// [`Iterator::next`].
    #[must_use]
    pub fn new(root: &Path, options: WalkOptions) -> Self {
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by(files_first)
            .into_iter();
        Self {
            root: root.to_path_buf(),
            options,
            entries,
            classified: Vec::new(),
        }
    }

    /// Relative paths classified as whole directories so far.
    #[must_use]
    pub fn classified(&self) -> &[PathBuf] {
        &self.classified
    }

    fn is_inside_classified(&self, relative: &Path) -> bool {
        self.classified.iter().any(|dir| is_within(relative, dir))
    }

    /// Decide whether the directory at `path` is linked as a whole.
    fn classify_dir(&self, path: &Path, relative: &Path) -> Option<DirReason> {
        let marked = relative
            .file_name()
            .is_some_and(|name| has_marker(&name.to_string_lossy(), self.options.marker));
        if marked {
            return Some(DirReason::Marker);
        }
        if self.options.link_submodules_whole && has_submodule_marker(path) {
            return Some(DirReason::Submodule);
        }
        None
    }
}

impl Iterator for Walker {
    type Item = Result<LinkUnit, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(WalkError::Traverse(e))),
            };

            // The source root itself is never a link unit.
            if entry.depth() == 0 {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                return Some(Err(WalkError::OutsideRoot {
                    path: entry.path().to_path_buf(),
                }));
            };
            let relative = relative.to_path_buf();
            let file_type = entry.file_type();

            if self.is_inside_classified(&relative) {
                if file_type.is_dir() {
                    self.entries.skip_current_dir();
                }
                continue;
            }

            if file_type.is_dir() {
                if let Some(reason) = self.classify_dir(entry.path(), &relative) {
                    self.entries.skip_current_dir();
                    self.classified.push(relative.clone());
                    return Some(Ok(LinkUnit::Dir {
                        path: relative,
                        reason,
                    }));
                }
                continue;
            }

            // Symlinked directories are listed but not followed or linked.
            if file_type.is_symlink() && entry.path().is_dir() {
                continue;
            }

            return Some(Ok(LinkUnit::File(relative)));
        }
    }
}

/// Order entries so that a directory's files are yielded before its
/// subdirectories, each group by name.
fn files_first(a: &walkdir::DirEntry, b: &walkdir::DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Returns `true` if `name` starts or ends with `marker`.
fn has_marker(name: &str, marker: char) -> bool {
    name.starts_with(marker) || name.ends_with(marker)
}

/// Returns `true` if `dir` holds a `.git` entry that is not a directory.
fn has_submodule_marker(dir: &Path) -> bool {
    let marker = dir.join(SUBMODULE_MARKER);
    marker.symlink_metadata().is_ok() && !marker.is_dir()
}
