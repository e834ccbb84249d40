//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - `classifier-core` stays headless (no UI crates)
//! - The TUI goes through the workflow, never straight to HTTP
//! - Proper async I/O patterns in production code
//!
//! The helpers below give the tests a source-level view of the workspace.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root (two levels above this package)
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// All `.rs` files under `rel_dir` (relative to the workspace root)
pub fn rust_sources(rel_dir: &str) -> Vec<PathBuf> {
    let dir = workspace_root().join(rel_dir);
    if !dir.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// A production source line: 1-based number and the code before any `//`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeLine {
    /// 1-based line number
    pub number: usize,
    /// Code with comments stripped
    pub code: String,
    /// Whether the line sits inside an `async fn`
    pub in_async_fn: bool,
}

/// Production lines of a source file
///
/// Scanning stops at the first `#[cfg(test)]`; test modules sit at the
/// bottom of each file.
pub fn production_lines(content: &str) -> Vec<CodeLine> {
    let mut lines = Vec::new();
    let mut in_async_fn = false;

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }

        let code = strip_comment(line);
        if let Some(is_async) = fn_header(code) {
            in_async_fn = is_async;
        }

        if code.trim().is_empty() {
            continue;
        }

        lines.push(CodeLine {
            number: idx + 1,
            code: code.to_string(),
            in_async_fn,
        });
    }

    lines
}

/// The part of `line` before a `//` comment that is not inside a string literal
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if in_string => i += 1,
            b'"' => in_string = !in_string,
            // Char literals: '"' and '\''
            b'\'' if !in_string && bytes.get(i + 2) == Some(&b'\'') => i += 2,
            b'\'' if !in_string && bytes.get(i + 1) == Some(&b'\\') => i += 3,
            b'/' if !in_string && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            _ => {}
        }
        i += 1;
    }
    line
}

/// `Some(is_async)` if the line opens a function
fn fn_header(code: &str) -> Option<bool> {
    let mut words = code.split_whitespace().peekable();
    let mut is_async = false;

    while let Some(word) = words.next() {
        match word {
            "pub" | "const" | "unsafe" | "extern" => {}
            w if w.starts_with("pub(") => {}
            "async" => is_async = true,
            "fn" => return words.peek().map(|_| is_async),
            _ => return None,
        }
    }
    None
}

/// Names in the `[dependencies]` table of a manifest (relative to the workspace root)
///
/// A missing or unparsable manifest yields no names.
pub fn dependency_names(rel_manifest: &str) -> Vec<String> {
    fs::read_to_string(workspace_root().join(rel_manifest))
        .map(|content| manifest_dependency_names(&content))
        .unwrap_or_default()
}

/// Names in the `[dependencies]` table of manifest text
///
/// Covers every way cargo accepts a dependency: `name = "1"`,
/// `name = { .. }`, `name.workspace = true` and `[dependencies.name]`.
pub fn manifest_dependency_names(content: &str) -> Vec<String> {
    let Ok(manifest) = toml::from_str::<toml::Table>(content) else {
        return Vec::new();
    };

    manifest
        .get("dependencies")
        .and_then(toml::Value::as_table)
        .map(|deps| deps.keys().cloned().collect())
        .unwrap_or_default()
}

/// Format a violation as `path:line - what: code`
pub fn violation(path: &Path, line: &CodeLine, what: &str) -> String {
    let shown = path
        .strip_prefix(workspace_root())
        .unwrap_or(path)
        .display();
    format!("{shown}:{} - {what}: {}", line.number, line.code.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_async_function_detection() {
        let code = "pub async fn classify(&self) {\n    let x = std::fs::read(\"a\");\n}\n";
        let lines = production_lines(code);
        assert!(lines.iter().all(|l| l.in_async_fn));
    }

    #[test]
    fn test_non_async_function_detection() {
        let code = "async fn a() {}\npub(crate) fn load() {\n    std::fs::read(\"a\");\n}\n";
        let lines = production_lines(code);
        assert!(!lines.last().unwrap().in_async_fn);
    }

    #[test]
    fn test_stops_at_test_module() {
        let code = "fn a() {}\n#[cfg(test)]\nmod tests {\n    fn b() {}\n}\n";
        let lines = production_lines(code);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_comments_are_stripped() {
        let lines = production_lines("let a = 1; // std::fs::read\n//! reqwest::blocking\n");
        assert!(lines.iter().all(|l| !l.code.contains("std::fs")));
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_comment_markers_inside_strings_are_kept() {
        let lines = production_lines(
            "let url = \"http://127.0.0.1:5000\"; std::fs::read(url); // note\n",
        );
        assert_eq!(lines.len(), 1);
        assert!(lines[0].code.contains("std::fs::read(url);"));
        assert!(!lines[0].code.contains("note"));
    }

    #[test]
    fn test_char_literal_quote_does_not_open_string() {
        let lines = production_lines("let q = '\"'; let x = 1; // std::fs\n");
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].code.contains("std::fs"));
    }

    #[test]
    fn test_dependency_names_every_form() {
        let manifest = r#"
[package]
name = "demo"

[dependencies]
tokio = { version = "1", features = ["full"] }
serde = "1.0"
walkdir.workspace = true

[dependencies.ratatui]
version = "0.29"

[dev-dependencies]
tempfile = "3"
"#;
        let mut names = manifest_dependency_names(manifest);
        names.sort();
        assert_eq!(names, vec!["ratatui", "serde", "tokio", "walkdir"]);
    }

    #[test]
    fn test_dependency_names_malformed_manifest() {
        assert!(manifest_dependency_names("[dependencies\ntokio = ").is_empty());
        assert!(manifest_dependency_names("[package]\nname = \"demo\"\n").is_empty());
    }

    #[test]
    fn test_core_manifest_is_read() {
        let names = dependency_names("classifier/core/Cargo.toml");
        assert!(names.iter().any(|n| n == "reqwest"));
        assert!(!names.iter().any(|n| n == "tempfile"), "dev-dependencies are excluded");
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
