//! Mapping from link units to destination paths.
use std::path::{Path, PathBuf};

use crate::walk::{DirReason, LinkUnit};

/// Compute where `unit` is linked under `target_root`.
///
/// The relative path is reused as-is, except for directories classified by
/// the marker rule: their last segment loses the `marker` it starts or ends
/// with.  A directory named only by the marker keeps its literal name.  No
/// filesystem access is performed.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use dotcon::paths::destination;
/// use dotcon::walk::{DirReason, LinkUnit};
///
/// let unit = LinkUnit::Dir { path: PathBuf::from("a/\u{2B50}dir"), reason: DirReason::Marker };
/// assert_eq!(
///     destination(&unit, Path::new("/home/me"), '\u{2B50}'),
///     PathBuf::from("/home/me/a/dir"),
/// );
/// ```
#[must_use]
pub fn destination(unit: &LinkUnit, target_root: &Path, marker: char) -> PathBuf {
    let relative = unit.relative_path();
    match unit {
        LinkUnit::Dir {
            reason: DirReason::Marker,
            ..
        } => target_root.join(strip_marker(relative, marker)),
        _ => target_root.join(relative),
    }
}

/// Remove one `marker` from the last segment of `relative`, from the end it
/// sits at.  A marker at both ends loses only the trailing one.
fn strip_marker(relative: &Path, marker: char) -> PathBuf {
    let Some(name) = relative.file_name() else {
        return relative.to_path_buf();
    };
    let name = name.to_string_lossy();
    let stripped = name
        .strip_suffix(marker)
        .or_else(|| name.strip_prefix(marker));
    match stripped {
        Some(stripped) if !stripped.is_empty() => relative.with_file_name(stripped),
        _ => relative.to_path_buf(),
    }
}

/// Returns `true` if `path` equals `ancestor` or lies beneath it.
///
/// Containment is decided on whole path segments, so `a/dir2` is not within
/// `a/dir`.
#[must_use]
pub fn is_within(path: &Path, ancestor: &Path) -> bool {
    path.starts_with(ancestor)
}
