//! Host symlink primitives used by the linker.
use std::io;
use std::path::{Path, PathBuf};

/// Create a symlink at `link` pointing to `target`.
///
/// Errors are returned untouched so the caller can branch on
/// [`io::ErrorKind::AlreadyExists`] and [`io::ErrorKind::NotFound`].
pub fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove the file or symlink at `path`.
///
/// On Windows, directory symlinks must be removed with `remove_dir`, so the
/// raw `FILE_ATTRIBUTE_DIRECTORY` flag decides which call is used.
pub fn remove_existing(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// Returns `true` if `path` is a real directory, not a symlink to one.
#[must_use]
pub fn is_real_dir(path: &Path) -> bool {
    std::fs::symlink_metadata(path).is_ok_and(|m| m.is_dir() && !m.file_type().is_symlink())
}

/// Returns `true` if `link` is a symlink whose target is exactly `target`.
#[must_use]
pub fn points_to(link: &Path, target: &Path) -> bool {
    std::fs::read_link(link).is_ok_and(|existing| paths_equal(&existing, target))
}

/// Returns `true` if `a` and `b` resolve to the same entry, for example
/// because an ancestor of one is a symlink to an ancestor of the other.
///
/// Paths that cannot be resolved never match.
#[must_use]
pub fn same_entry(a: &Path, b: &Path) -> bool {
    match (dunce::canonicalize(a), dunce::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check if metadata represents a directory-like entry.
///
/// On Windows, `symlink_metadata().is_dir()` returns `false` for directory
/// symlinks, so the raw `FILE_ATTRIBUTE_DIRECTORY` bit is checked instead.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

/// Compare two paths, normalising the `\\?\` prefix that Windows
/// `read_link` prepends to extended-length paths.
fn paths_equal(a: &Path, b: &Path) -> bool {
    strip_win_prefix(a) == strip_win_prefix(b)
}

fn strip_win_prefix(p: &Path) -> PathBuf {
    dunce::simplified(p).to_path_buf()
}
