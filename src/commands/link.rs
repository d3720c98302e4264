//! The link command: walk the source tree and link every unit into the
//! target directory.
use anyhow::Result;

use crate::cli::Cli;
use crate::config::Settings;
use crate::error::DotconError;
use crate::link::{LinkSummary, Linker};
use crate::logging::Log;
use crate::paths::destination;
use crate::prompt::{Prompt, TerminalPrompt};
use crate::walk::Walker;

/// Run the link command.
///
/// A failure is also logged, so it reaches the log file.
///
/// # Errors
///
/// Returns an error if settings cannot be resolved, the source directory is
/// missing, or linking fails with an unexpected I/O error.
pub fn run(args: &Cli, log: &dyn Log) -> Result<()> {
    let result = execute(args, log);
    if let Err(err) = &result {
        log.error(&err.to_string());
    }
    result
}

fn execute(args: &Cli, log: &dyn Log) -> Result<()> {
    let settings = Settings::from_cli(args)?;
    log.debug(&format!("dotfile directory: {}", settings.dotfile_dir.display()));
    log.debug(&format!("target: {}", settings.target_root.display()));
    link_all(&settings, &TerminalPrompt, log)?;
    Ok(())
}

/// Link every unit of `settings.source_root` into `settings.target_root`.
///
/// Units are linked strictly in walk order.  Units linked before a fatal
/// error stay linked.
///
/// # Errors
///
/// Returns an error if the source directory is missing, the tree cannot be
/// walked, or a unit fails to link for a reason other than an existing
/// destination or a missing parent directory.
pub fn link_all(
    settings: &Settings,
    prompt: &dyn Prompt,
    log: &dyn Log,
) -> Result<LinkSummary, DotconError> {
    settings.ensure_source()?;

    log.stage(&format!(
        "Symlinking files in \"{}\" recursively",
        settings.source_root.display()
    ));
    if settings.dry_run {
        log.dry_run("no changes will be made");
    }

    let mut linker = Linker::new(prompt, log, settings.policy).dry_run(settings.dry_run);
    let mut summary = LinkSummary::default();
    for unit in Walker::new(&settings.source_root, settings.walk) {
        let unit = unit?;
        let source = unit.source_path(&settings.source_root);
        let dest = destination(&unit, &settings.target_root, settings.walk.marker);
        if unit.is_dir() {
            log.debug(&format!(
                "linking directory {} as a whole",
                unit.relative_path().display()
            ));
        }
        summary.record(linker.link(&source, &dest)?);
    }

    log.info(&summary.to_string());
    log.stage("Finished setting up all symlinks.");
    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::link::ConflictPolicy;
    use crate::logging::RecordingLog;
    use crate::prompt::MockPrompt;
    use crate::walk::WalkOptions;
    use clap::Parser as _;
    use std::ffi::OsStr;
    use std::path::Path;

    fn settings(dotfile_dir: &Path, target: &Path) -> Settings {
        Settings {
            dotfile_dir: dotfile_dir.to_path_buf(),
            source_root: dotfile_dir.join("home"),
            target_root: target.to_path_buf(),
            walk: WalkOptions::default(),
            policy: ConflictPolicy::Ask,
            dry_run: false,
        }
    }

    fn silent() -> MockPrompt {
        let mut prompt = MockPrompt::new();
        prompt.expect_ask().never();
        prompt
    }

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    #[test]
    fn links_files_and_marked_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let dots = tmp.path().join("dots");
        let target = tmp.path().join("target");
        write(&dots.join("home/a/b.txt"), "b");
        write(&dots.join("home/a/\u{2B50}dir/x.txt"), "x");
        let (prompt, log) = (silent(), RecordingLog::default());

        let summary = link_all(&settings(&dots, &target), &prompt, &log).unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(
            std::fs::read_link(target.join("a/b.txt")).unwrap(),
            dots.join("home/a/b.txt")
        );
        assert_eq!(
            std::fs::read_link(target.join("a/dir")).unwrap(),
            dots.join("home/a/\u{2B50}dir")
        );
        assert!(log.contains("stage: Finished setting up all symlinks."));
    }

    #[test]
    fn missing_source_aborts_before_linking() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("target");
        let (prompt, log) = (silent(), RecordingLog::default());

        let err = link_all(&settings(&tmp.path().join("dots"), &target), &prompt, &log)
            .unwrap_err();

        assert!(matches!(err, DotconError::Config(_)));
        assert!(err.to_string().ends_with("does not exist."));
        assert!(!target.exists());
        assert!(log.lines().is_empty());
    }

    #[test]
    fn run_logs_fatal_errors() {
        let tmp = tempfile::tempdir().unwrap();
        let dots = tmp.path().join("dots");
        let target = tmp.path().join("target");
        let args = Cli::parse_from([
            OsStr::new("dotcon"),
            OsStr::new("--dir"),
            dots.as_os_str(),
            OsStr::new("--target"),
            target.as_os_str(),
        ]);
        let log = RecordingLog::default();

        let err = run(&args, &log).unwrap_err();

        let expected = format!("\"{}\" does not exist.", dots.join("home").display());
        assert_eq!(err.to_string(), expected);
        assert!(log.contains(&format!("error: {expected}")));
    }

    #[test]
    fn dry_run_reports_without_linking() {
        let tmp = tempfile::tempdir().unwrap();
        let dots = tmp.path().join("dots");
        let target = tmp.path().join("target");
        write(&dots.join("home/.bashrc"), "rc");
        let mut settings = settings(&dots, &target);
        settings.dry_run = true;
        let (prompt, log) = (silent(), RecordingLog::default());

        let summary = link_all(&settings, &prompt, &log).unwrap();

        assert_eq!(summary.dry_run, 1);
        assert_eq!(summary.changed(), 0);
        assert!(!target.exists());
    }

    #[test]
    fn summary_is_logged() {
        let tmp = tempfile::tempdir().unwrap();
        let dots = tmp.path().join("dots");
        let target = tmp.path().join("target");
        write(&dots.join("home/.vimrc"), "set nu");
        let (prompt, log) = (silent(), RecordingLog::default());

        link_all(&settings(&dots, &target), &prompt, &log).unwrap();

        assert!(log.contains("info: 1 created, 0 overwritten, 0 skipped, 0 already linked"));
    }
}
