//! Isolated test environment and a fluent wrapper around assert_cmd.

// Test utility with methods not every suite uses.
#![allow(dead_code)]

use assert_cmd::Command;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ===========================================
// Test Environment
// ===========================================

/// Isolated vault in a temporary directory, cleaned up on drop.
pub struct TestEnv {
    _temp_dir: TempDir,
    vault_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let vault_dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            vault_dir,
        }
    }

    pub fn vault_dir(&self) -> &Path {
        &self.vault_dir
    }

    /// Path where the index document is stored.
    pub fn index_path(&self) -> PathBuf {
        self.vault_dir.join(".warren").join("index.json")
    }

    /// Path where the bridge document is stored.
    pub fn bridge_path(&self) -> PathBuf {
        self.vault_dir.join(".warren").join("bridge.json")
    }

    /// Writes a note at a vault-relative path, creating parent folders.
    pub fn add_note(&self, rel_path: &str, content: &str) -> PathBuf {
        let path = self.vault_dir.join(rel_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create note folder");
        }
        std::fs::write(&path, content).expect("Failed to write test note");
        path
    }

    /// Writes an arbitrary file at a vault-relative path.
    pub fn write_file(&self, rel_path: &str, content: &str) -> PathBuf {
        self.add_note(rel_path, content)
    }

    /// Creates a WarrenCommand configured for this vault.
    pub fn cmd(&self) -> WarrenCommand {
        WarrenCommand::new().dir(&self.vault_dir)
    }

    /// Builds the index through the CLI, asserting success.
    pub fn build_index(&self) {
        self.cmd().index().assert().success();
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for note content with frontmatter, tags, links, and tasks.
pub struct TestNote {
    tags: Vec<String>,
    links: Vec<String>,
    tasks: Vec<(String, bool)>,
    code_blocks: Vec<String>,
    body: String,
}

impl TestNote {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            links: Vec::new(),
            tasks: Vec::new(),
            code_blocks: Vec::new(),
            body: String::new(),
        }
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.tags.push(tag.to_string());
        self
    }

    pub fn link(mut self, target: &str) -> Self {
        self.links.push(target.to_string());
        self
    }

    pub fn task(mut self, text: &str, completed: bool) -> Self {
        self.tasks.push((text.to_string(), completed));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Adds a fenced code block of the given language.
    pub fn code_block(mut self, language: &str) -> Self {
        self.code_blocks.push(language.to_string());
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if !self.tags.is_empty() {
            out.push_str("---\ntags:\n");
            for tag in &self.tags {
                out.push_str(&format!("  - {tag}\n"));
            }
            out.push_str("---\n\n");
        }
        out.push_str("# Test Note\n\n");
        if !self.body.is_empty() {
            out.push_str(&self.body);
            out.push_str("\n\n");
        }
        for target in &self.links {
            out.push_str(&format!("See [[{target}]].\n"));
        }
        for (text, completed) in &self.tasks {
            let mark = if *completed { "x" } else { " " };
            out.push_str(&format!("- [{mark}] {text}\n"));
        }
        for language in &self.code_blocks {
            out.push_str(&format!("\n```{language}\nexample();\n```\n"));
        }
        out
    }
}

impl Default for TestNote {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================
// Command Wrapper
// ===========================================

/// Fluent wrapper around `assert_cmd::Command` for the `warren` binary.
pub struct WarrenCommand {
    args: Vec<String>,
}

impl WarrenCommand {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Sets the `--dir` option to the vault directory.
    pub fn dir(mut self, path: &Path) -> Self {
        self.args.push("--dir".to_string());
        self.args.push(path.to_string_lossy().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|s| s.as_ref().to_string()));
        self
    }

    /// Appends `--format json`.
    pub fn json(self) -> Self {
        self.args(["--format", "json"])
    }

    /// Runs the command and returns an Assert for making assertions.
    pub fn assert(self) -> assert_cmd::assert::Assert {
        let mut cmd = Command::cargo_bin("warren").expect("Failed to find warren binary");
        cmd.args(&self.args);
        cmd.assert()
    }

    /// Runs the command, expects success, and returns stdout as a string.
    pub fn output_success(self) -> String {
        let output = self.assert().success().get_output().stdout.clone();
        String::from_utf8(output).expect("Output was not valid UTF-8")
    }

    /// Runs the command, expects success, and parses stdout as JSON.
    pub fn output_json<T: DeserializeOwned>(self) -> T {
        let output = self.output_success();
        serde_json::from_str(&output).expect("Failed to parse output as JSON")
    }

    // ===========================================
    // Command Shortcuts
    // ===========================================

    pub fn index(self) -> Self {
        self.args(["index"])
    }

    pub fn stats(self) -> Self {
        self.args(["stats"])
    }

    pub fn tags(self) -> Self {
        self.args(["tags"])
    }

    pub fn folders(self) -> Self {
        self.args(["folders"])
    }

    pub fn tasks(self) -> Self {
        self.args(["tasks"])
    }

    pub fn links(self, path: &str) -> Self {
        self.args(["links", path])
    }

    pub fn notes_list(self) -> Self {
        self.args(["notes", "list"])
    }

    pub fn notes_info(self, path: &str) -> Self {
        self.args(["notes", "info", path])
    }

    pub fn code_stats(self) -> Self {
        self.args(["code", "stats"])
    }

    pub fn code_notes(self) -> Self {
        self.args(["code", "notes"])
    }

    pub fn code_search(self, language: &str) -> Self {
        self.args(["code", "search", language])
    }

    pub fn query(self, query: &str) -> Self {
        self.args(["query", query])
    }

    pub fn bridge_run_once(self) -> Self {
        self.args(["bridge", "run", "--once"])
    }

    pub fn bridge_status(self) -> Self {
        self.args(["bridge", "status"])
    }

    pub fn bridge_clear(self) -> Self {
        self.args(["bridge", "clear"])
    }
}

impl Default for WarrenCommand {
    fn default() -> Self {
        Self::new()
    }
}
