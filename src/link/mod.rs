//! Conflict-aware symlink creation.
//!
//! [`Linker::link`] runs a small state machine per link unit:
//!
//! ```text
//! Attempting ──ok──────────────▶ Done(Created | Overwritten)
//!     │ parent missing ──▶ create ancestors ──▶ Attempting
//!     │ already exists ──▶ Conflict
//!     └ other error ───▶ LinkError
//! Conflict ──overwrite──▶ remove destination ──▶ Attempting
//!          └─keep───────▶ Done(Skipped)
//! ```
//!
//! The [`ConflictPolicy`] decides conflicts without asking once the operator
//! has answered "all" or "none"; it never returns to [`ConflictPolicy::Ask`].
pub mod fs;

use std::fmt;
use std::io;
use std::path::Path;

use crate::error::LinkError;
use crate::logging::Log;
use crate::prompt::{ConflictChoice, Prompt};

/// Session-wide rule for destinations that already exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Ask the operator for every conflict.
    #[default]
    Ask,
    /// Replace every conflicting destination.
    AlwaysOverwrite,
    /// Keep every conflicting destination.
    AlwaysSkip,
}

/// Why a unit was not linked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The destination already links to the source.
    AlreadyLinked,
    /// The destination is a real directory, which is never removed.
    Directory,
    /// The operator or the policy kept the existing destination.
    Kept,
}

/// Result of linking one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    /// The link was created at a free destination.
    Created,
    /// An existing destination was removed and the link created.
    Overwritten,
    /// Nothing was changed.
    Skipped(SkipReason),
    /// Dry run; nothing was changed.
    DryRun,
}

/// Counts of link outcomes for the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    /// Links created at free destinations.
    pub created: u32,
    /// Links that replaced an existing destination.
    pub overwritten: u32,
    /// Conflicts resolved by keeping the destination.
    pub skipped: u32,
    /// Destinations that already pointed at their source.
    pub already_linked: u32,
    /// Units reported by a dry run.
    pub dry_run: u32,
}

impl LinkSummary {
    /// Count `outcome`.
    pub const fn record(&mut self, outcome: LinkOutcome) {
        match outcome {
            LinkOutcome::Created => self.created += 1,
            LinkOutcome::Overwritten => self.overwritten += 1,
            LinkOutcome::Skipped(SkipReason::AlreadyLinked) => self.already_linked += 1,
            LinkOutcome::Skipped(_) => self.skipped += 1,
            LinkOutcome::DryRun => self.dry_run += 1,
        }
    }

    /// Number of units that changed the filesystem.
    #[must_use]
    pub const fn changed(&self) -> u32 {
        self.created + self.overwritten
    }
}

impl fmt::Display for LinkSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.dry_run > 0 {
            return write!(
                f,
                "{} would change, {} already linked",
                self.dry_run, self.already_linked
            );
        }
        write!(
            f,
            "{} created, {} overwritten, {} skipped, {} already linked",
            self.created, self.overwritten, self.skipped, self.already_linked
        )
    }
}

/// Creates symlinks one unit at a time, resolving conflicts through a
/// [`Prompt`] and the session [`ConflictPolicy`].
pub struct Linker<'a> {
    prompt: &'a dyn Prompt,
    log: &'a dyn Log,
    policy: ConflictPolicy,
    dry_run: bool,
}

impl fmt::Debug for Linker<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Linker")
            .field("prompt", &"<dyn Prompt>")
            .field("log", &"<dyn Log>")
            .field("policy", &self.policy)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl<'a> Linker<'a> {
    /// Create a linker starting from `policy`.
    #[must_use]
    pub fn new(prompt: &'a dyn Prompt, log: &'a dyn Log, policy: ConflictPolicy) -> Self {
        Self {
            prompt,
            log,
            policy,
            dry_run: false,
        }
    }

    /// Report what would happen instead of touching the filesystem.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The current conflict policy.
    #[must_use]
    pub const fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Link `dest` to `source`.
    ///
    /// Missing ancestors of `dest` are created.  An existing `dest` is resolved
    /// by the conflict policy, asking the operator while it is
    /// [`ConflictPolicy::Ask`].
    ///
    /// # Errors
    ///
    /// Returns an error for any I/O failure other than an existing destination
    /// or a missing parent directory, and if the operator cannot be asked.
    pub fn link(&mut self, source: &Path, dest: &Path) -> Result<LinkOutcome, LinkError> {
        if self.dry_run {
            return Ok(self.preview(source, dest));
        }

        let mut replaced = false;
        let mut created_parent = false;
        loop {
            let err = match fs::create_symlink(source, dest) {
                Ok(()) => {
                    self.log
                        .info(&format!("{} -> {}", dest.display(), source.display()));
                    return Ok(if replaced {
                        LinkOutcome::Overwritten
                    } else {
                        LinkOutcome::Created
                    });
                }
                Err(err) => err,
            };

            match err.kind() {
                io::ErrorKind::NotFound if !created_parent => {
                    self.create_parent(dest)?;
                    created_parent = true;
                }
                io::ErrorKind::AlreadyExists => {
                    if let Some(reason) = self.resolve_conflict(source, dest)? {
                        return Ok(LinkOutcome::Skipped(reason));
                    }
                    fs::remove_existing(dest).map_err(|source| LinkError::Remove {
                        path: dest.to_path_buf(),
                        source,
                    })?;
                    self.log
                        .debug(&format!("removed existing {}", dest.display()));
                    replaced = true;
                }
                _ => {
                    return Err(LinkError::CreateLink {
                        dest: dest.to_path_buf(),
                        target: source.to_path_buf(),
                        source: err,
                    });
                }
            }
        }
    }

    /// Create every missing ancestor of `dest`.
    fn create_parent(&self, dest: &Path) -> Result<(), LinkError> {
        let Some(parent) = dest.parent() else {
            return Ok(());
        };
        std::fs::create_dir_all(parent).map_err(|source| LinkError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
        self.log.info(&format!(
            "Created directory \"{}\" since it did not exist.",
            parent.display()
        ));
        Ok(())
    }

    /// Decide an existing destination.  `None` means remove it and retry.
    ///
    /// A destination that already is, or resolves to, the source is never
    /// removed.
    fn resolve_conflict(
        &mut self,
        source: &Path,
        dest: &Path,
    ) -> Result<Option<SkipReason>, LinkError> {
        if fs::points_to(dest, source) || fs::same_entry(dest, source) {
            self.log
                .debug(&format!("\"{}\" is already linked.", dest.display()));
            return Ok(Some(SkipReason::AlreadyLinked));
        }
        if fs::is_real_dir(dest) {
            self.log.warn(&format!(
                "\"{}\" is a directory. Skipped.",
                dest.display()
            ));
            return Ok(Some(SkipReason::Directory));
        }

        match self.policy {
            ConflictPolicy::AlwaysOverwrite => {
                self.log
                    .info(&format!("\"{}\" exists. Forcing symlink.", dest.display()));
                Ok(None)
            }
            ConflictPolicy::AlwaysSkip => {
                self.log
                    .info(&format!("\"{}\" exists. Skipped.", dest.display()));
                Ok(Some(SkipReason::Kept))
            }
            ConflictPolicy::Ask => match self.ask(dest)? {
                ConflictChoice::Overwrite => {
                    self.log.info("Forcing symlink.");
                    Ok(None)
                }
                ConflictChoice::OverwriteAll => {
                    self.policy = ConflictPolicy::AlwaysOverwrite;
                    self.log.info("Forcing symlink.");
                    Ok(None)
                }
                ConflictChoice::Keep => {
                    self.log.info(&format!("\"{}\" skipped.", dest.display()));
                    Ok(Some(SkipReason::Kept))
                }
                ConflictChoice::SkipAll => {
                    self.policy = ConflictPolicy::AlwaysSkip;
                    self.log.info(&format!("\"{}\" skipped.", dest.display()));
                    Ok(Some(SkipReason::Kept))
                }
            },
        }
    }

    /// Ask until the operator gives a recognised answer.
    fn ask(&self, dest: &Path) -> Result<ConflictChoice, LinkError> {
        self.log
            .info(&format!("\"{}\" already exists.", dest.display()));
        self.log.info("Overwrite with symlink?");
        self.log.info("  Defaults to \"n\" (no overwrite).");
        self.log.info(
            "  \"all\" will overwrite ALL existing destination files without further prompting.",
        );
        self.log.info(
            "  \"none\" will skip all existing destination files without further prompting.",
        );
        loop {
            let answer = self
                .prompt
                .ask("[y/N/all/none]", ConflictChoice::RESPONSES)
                .map_err(LinkError::Prompt)?;
            if let Some(choice) = ConflictChoice::parse(&answer) {
                return Ok(choice);
            }
            self.log.warn("Not a valid choice.");
        }
    }

    /// Describe what [`Linker::link`] would do, without side effects.
    fn preview(&self, source: &Path, dest: &Path) -> LinkOutcome {
        if fs::points_to(dest, source) || fs::same_entry(dest, source) {
            self.log
                .debug(&format!("\"{}\" is already linked.", dest.display()));
            return LinkOutcome::Skipped(SkipReason::AlreadyLinked);
        }
        if dest.symlink_metadata().is_ok() {
            let action = if fs::is_real_dir(dest) {
                "is a directory, would skip"
            } else {
                match self.policy {
                    ConflictPolicy::Ask => "exists, would ask before overwriting",
                    ConflictPolicy::AlwaysOverwrite => "exists, would overwrite",
                    ConflictPolicy::AlwaysSkip => "exists, would skip",
                }
            };
            self.log
                .dry_run(&format!("\"{}\" {action}", dest.display()));
            return LinkOutcome::DryRun;
        }
        if let Some(parent) = dest.parent()
            && parent.symlink_metadata().is_err()
        {
            self.log
                .dry_run(&format!("would create directory \"{}\"", parent.display()));
        }
        self.log.dry_run(&format!(
            "would link {} -> {}",
            dest.display(),
            source.display()
        ));
        LinkOutcome::DryRun
    }
}
