//! Integration Test: Layering
//!
//! **Policy**: `classifier-core` is headless and owns all outbound HTTP.
//! Surfaces (the TUI) talk to the classification service only through the
//! workflow.

use std::fs;

use architectural_enforcement::{dependency_names, production_lines, rust_sources, violation};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_has_no_ui_dependencies() {
    let deps = dependency_names("classifier/core/Cargo.toml");
    assert!(!deps.is_empty(), "classifier/core/Cargo.toml should list dependencies");

    for ui in UI_CRATES {
        assert!(
            !deps.iter().any(|d| d == ui),
            "classifier-core must not depend on {ui}"
        );
    }
}

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let mut violations = Vec::new();

    for path in rust_sources("classifier/core/src") {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for line in production_lines(&content) {
            for ui in UI_CRATES {
                if line.code.contains(&format!("{ui}::")) {
                    violations.push(violation(&path, &line, "UI crate in core"));
                }
            }
        }
    }

    assert!(
        violations.is_empty(),
        "classifier-core must stay headless:\n  {}",
        violations.join("\n  ")
    );
}

#[test]
fn test_tui_does_not_call_http_directly() {
    let deps = dependency_names("tui/Cargo.toml");
    assert!(
        deps.iter().any(|d| d == "classifier-core"),
        "the TUI should embed classifier-core"
    );
    assert!(
        !deps.iter().any(|d| d == "reqwest"),
        "the TUI must reach the service through the workflow, not reqwest"
    );

    let mut violations = Vec::new();
    for path in rust_sources("tui/src") {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for line in production_lines(&content) {
            if line.code.contains("reqwest::") || line.code.contains("HttpBackend::new") {
                violations.push(violation(&path, &line, "Direct HTTP in TUI"));
            }
        }
    }

    assert!(violations.is_empty(), "{}", violations.join("\n"));
}
