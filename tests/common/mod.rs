// Shared helpers for integration tests.
//
// Provides a temporary dotfile directory with a fluent builder for its
// `home/` tree, plus a scripted prompt and a capturing log so the link
// command can run without a terminal or a global subscriber.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dotcon::config::Settings;
use dotcon::link::ConflictPolicy;
use dotcon::logging::Log;
use dotcon::prompt::Prompt;
use dotcon::walk::WalkOptions;

/// An isolated dotfile directory and link target backed by a
/// [`tempfile::TempDir`].
#[derive(Debug)]
pub struct IntegrationTestContext {
    /// Temporary directory holding `dots/` and `target/`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a context with an empty `dots/home/` and an empty `target/`.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(root.path().join("dots/home")).expect("create source root");
        std::fs::create_dir_all(root.path().join("target")).expect("create target root");
        Self { root }
    }

    /// The dotfile directory.
    pub fn dotfile_dir(&self) -> PathBuf {
        self.root.path().join("dots")
    }

    /// The source root, `dots/home`.
    pub fn source(&self) -> PathBuf {
        self.dotfile_dir().join("home")
    }

    /// The target root.
    pub fn target(&self) -> PathBuf {
        self.root.path().join("target")
    }

    /// Settings for a run over this context starting at `policy`.
    pub fn settings(&self, policy: ConflictPolicy) -> Settings {
        Settings {
            dotfile_dir: self.dotfile_dir(),
            source_root: self.source(),
            target_root: self.target(),
            walk: WalkOptions::default(),
            policy,
            dry_run: false,
        }
    }

    /// Where the link for `relative` is expected to point.
    pub fn link_at(&self, relative: &str) -> PathBuf {
        std::fs::read_link(self.target().join(relative)).expect("read link")
    }
}

/// Fluent builder for the `home/` tree of an [`IntegrationTestContext`].
#[derive(Debug)]
pub struct TestContextBuilder {
    ctx: IntegrationTestContext,
}

impl TestContextBuilder {
    /// Begin building a new context.
    pub fn new() -> Self {
        Self {
            ctx: IntegrationTestContext::new(),
        }
    }

    /// Write `content` to `home/<relative>`, creating parents.
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.source().join(relative), content);
        self
    }

    /// Create an empty directory at `home/<relative>`.
    pub fn with_dir(self, relative: &str) -> Self {
        std::fs::create_dir_all(self.ctx.source().join(relative)).expect("create dir");
        self
    }

    /// Turn `home/<relative>` into a submodule root by writing a gitlink
    /// `.git` file.
    pub fn with_submodule(self, relative: &str) -> Self {
        write_file(
            &self.ctx.source().join(relative).join(".git"),
            "gitdir: ../.git/modules/sub\n",
        );
        self
    }

    /// Write `content` to `target/<relative>`, creating parents.
    pub fn with_existing(self, relative: &str, content: &str) -> Self {
        write_file(&self.ctx.target().join(relative), content);
        self
    }

    /// Finish building.
    pub fn build(self) -> IntegrationTestContext {
        self.ctx
    }
}

fn write_file(path: &Path, content: &str) {
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create parent dirs");
    std::fs::write(path, content).expect("write file");
}

/// A [`Prompt`] that replays canned answers and records every question.
///
/// Running out of answers behaves like end of input.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: Mutex<VecDeque<String>>,
    asked: Mutex<u32>,
}

impl ScriptedPrompt {
    /// Answer with `answers` in order.
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().map(|a| (*a).to_string()).collect()),
            asked: Mutex::new(0),
        }
    }

    /// How many times the prompt was consulted.
    pub fn asked(&self) -> u32 {
        *self.asked.lock().expect("lock")
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&self, _message: &str, _allowed: &[&'static str]) -> io::Result<String> {
        *self.asked.lock().expect("lock") += 1;
        self.answers
            .lock()
            .expect("lock")
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

/// A [`Log`] that captures every message as `"<level>: <message>"`.
#[derive(Debug, Default)]
pub struct CapturingLog {
    lines: Mutex<Vec<String>>,
}

impl CapturingLog {
    fn push(&self, level: &str, msg: &str) {
        self.lines.lock().expect("lock").push(format!("{level}: {msg}"));
    }

    /// All captured lines in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("lock").clone()
    }

    /// Number of captured lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        self.lines().iter().filter(|l| l.contains(needle)).count()
    }
}

impl Log for CapturingLog {
    fn stage(&self, msg: &str) {
        self.push("stage", msg);
    }
    fn info(&self, msg: &str) {
        self.push("info", msg);
    }
    fn debug(&self, msg: &str) {
        self.push("debug", msg);
    }
    fn warn(&self, msg: &str) {
        self.push("warn", msg);
    }
    fn error(&self, msg: &str) {
        self.push("error", msg);
    }
    fn dry_run(&self, msg: &str) {
        self.push("dry_run", msg);
    }
}
