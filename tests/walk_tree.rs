#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Integration tests for source tree classification.
//!
//! Builds realistic dotfile trees and checks the walker's listing, the
//! destinations derived from it, and that the units partition the tree's
//! files.

mod common;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use common::TestContextBuilder;
use dotcon::paths::{destination, is_within};
use dotcon::walk::{DirReason, LinkUnit, WalkOptions, Walker};

fn units(root: &Path, options: WalkOptions) -> Vec<LinkUnit> {
    Walker::new(root, options)
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

/// Render a path with `/` separators on every platform.
fn slashed(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// One line per unit: kind, source path and destination relative to the
/// target root.
fn listing(units: &[LinkUnit], marker: char) -> String {
    units
        .iter()
        .map(|unit| {
            let kind = match unit {
                LinkUnit::File(_) => "file",
                LinkUnit::Dir {
                    reason: DirReason::Marker,
                    ..
                } => "dir:marker",
                LinkUnit::Dir {
                    reason: DirReason::Submodule,
                    ..
                } => "dir:submodule",
            };
            format!(
                "{kind} {} => {}",
                slashed(unit.relative_path()),
                slashed(&destination(unit, Path::new(""), marker))
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every regular file under `root`, relative to it.
fn all_files(root: &Path) -> BTreeSet<PathBuf> {
    walkdir::WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
        .collect()
}

fn typical_home() -> common::IntegrationTestContext {
    TestContextBuilder::new()
        .with_file(".bashrc", "")
        .with_file(".profile", "")
        .with_file(".config/git/config", "")
        .with_file(".config/nvim\u{2B50}/init.lua", "")
        .with_file(".config/nvim\u{2B50}/lua/plugins.lua", "")
        .with_file(".vim/vimrc", "")
        .with_file(".vim/pack/start/fugitive/plugin/fugitive.vim", "")
        .with_submodule(".vim/pack/start/fugitive")
        .with_file("bin/tool", "")
        .with_dir(".cache/empty")
        .build()
}

#[test]
fn typical_home_listing() {
    let ctx = typical_home();
    let units = units(&ctx.source(), WalkOptions::default());

    insta::assert_snapshot!(listing(&units, '\u{2B50}'), @r"
    file .bashrc => .bashrc
    file .profile => .profile
    file .config/git/config => .config/git/config
    dir:marker .config/nvim⭐ => .config/nvim
    file .vim/vimrc => .vim/vimrc
    dir:submodule .vim/pack/start/fugitive => .vim/pack/start/fugitive
    file bin/tool => bin/tool
    ");
}

#[test]
fn units_partition_the_tree() {
    let ctx = typical_home();
    let root = ctx.source();

    for options in [
        WalkOptions::default(),
        WalkOptions {
            link_submodules_whole: false,
            ..WalkOptions::default()
        },
        WalkOptions {
            marker: '+',
            ..WalkOptions::default()
        },
    ] {
        let units = units(&root, options);

        let paths: Vec<&Path> = units.iter().map(LinkUnit::relative_path).collect();
        for (i, a) in paths.iter().enumerate() {
            for (j, b) in paths.iter().enumerate() {
                assert!(
                    i == j || !is_within(a, b),
                    "{} is inside {}",
                    a.display(),
                    b.display()
                );
            }
        }

        for file in all_files(&root) {
            let covering = units
                .iter()
                .filter(|u| match u {
                    LinkUnit::File(path) => *path == file,
                    LinkUnit::Dir { path, .. } => is_within(&file, path),
                })
                .count();
            assert_eq!(covering, 1, "{} covered {covering} times", file.display());
        }
    }
}

#[test]
fn marker_directory_yields_one_unit_regardless_of_contents() {
    let ctx = TestContextBuilder::new()
        .with_file("x\u{2B50}/a", "")
        .with_file("x\u{2B50}/b/c\u{2B50}/d", "")
        .with_submodule("x\u{2B50}/e")
        .build();

    let units = units(&ctx.source(), WalkOptions::default());

    assert_eq!(
        units,
        vec![LinkUnit::Dir {
            path: PathBuf::from("x\u{2B50}"),
            reason: DirReason::Marker,
        }]
    );
}
