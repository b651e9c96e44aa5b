//! Test utilities: temporary directory trees and a scripted prompt.
//!
//! This module is only compiled for tests and benchmarks.

use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;
use crate::prompt::Prompt;

/// A temporary directory tree for testing.
///
/// The directory is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Create a directory and its parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dir");
        full_path
    }

    /// Create a symlink at `path` pointing to `target` (taken as-is, so relative
    /// targets resolve against the link's directory).
    #[cfg(unix)]
    pub fn add_symlink(&self, path: &str, target: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Entries of the root directory, sorted by name.
    pub fn children(&self) -> Vec<PathBuf> {
        let mut children: Vec<PathBuf> = fs::read_dir(self.dir.path())
            .expect("Failed to read temp dir")
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .collect();
        children.sort();
        children
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

/// One `select` call seen by `ScriptedPrompt`.
#[derive(Debug, Clone)]
pub struct PromptRecord {
    pub message: String,
    /// Path parsed from a walk message, empty for other questions
    pub path: PathBuf,
    pub labels: Vec<String>,
}

/// Prompt answering from a script of choice labels.
///
/// Once a script runs out the prompt takes the default (or the first choice), so a
/// short script walks the rest of the queue skipping everything.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    selects: VecDeque<String>,
    multis: VecDeque<Vec<String>>,
    confirms: VecDeque<bool>,
    transcript: Vec<PromptRecord>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selects: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Answers for successive multi-selects, by label.
    pub fn with_multi(mut self, answers: Vec<Vec<String>>) -> Self {
        self.multis = answers.into();
        self
    }

    /// Answers for successive confirmations.
    pub fn with_confirms(mut self, answers: Vec<bool>) -> Self {
        self.confirms = answers.into();
        self
    }

    pub fn transcript(&self) -> &[PromptRecord] {
        &self.transcript
    }

    /// Paths the walk asked about, in order.
    pub fn prompted_paths(&self) -> Vec<PathBuf> {
        self.transcript.iter().map(|r| r.path.clone()).collect()
    }
}

fn path_from_message(message: &str) -> PathBuf {
    message
        .strip_prefix('"')
        .and_then(|rest| rest.rsplit_once("\" - "))
        .map(|(path, _)| PathBuf::from(path))
        .unwrap_or_default()
}

impl Prompt for ScriptedPrompt {
    fn select(&mut self, message: &str, choices: &[String], default: Option<usize>) -> Result<usize> {
        self.transcript.push(PromptRecord {
            message: message.to_string(),
            path: path_from_message(message),
            labels: choices.to_vec(),
        });
        match self.selects.pop_front() {
            Some(answer) => Ok(choices
                .iter()
                .position(|c| *c == answer)
                .unwrap_or_else(|| panic!("{:?} not offered, choices were {:?}", answer, choices))),
            None => Ok(default.unwrap_or(0)),
        }
    }

    fn multi_select(&mut self, _message: &str, choices: &[String]) -> Result<Vec<usize>> {
        let answer = self.multis.pop_front().unwrap_or_default();
        Ok(answer
            .iter()
            .filter_map(|label| choices.iter().position(|c| c == label))
            .collect())
    }

    fn confirm(&mut self, _message: &str, default: bool) -> Result<bool> {
        Ok(self.confirms.pop_front().unwrap_or(default))
    }
}
