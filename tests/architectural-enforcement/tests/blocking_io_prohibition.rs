//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Production code in the TUI and the classifier core MUST NOT
//! use blocking I/O inside async functions.
//! **Required**: Use `tokio::fs`, `tokio::net`, `tokio::process`, not `std::fs`, `std::net`, `std::process`
//!
//! Blocking calls are fine in plain `fn`s that run before the event loop
//! (config loading, log file setup) and in tests.

use std::fs;

use architectural_enforcement::{production_lines, rust_sources, violation};

/// Test that production code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_production_code() {
    let violations = find_blocking_io_violations();

    if !violations.is_empty() {
        eprintln!("\nBlocking I/O calls found in async production code!\n");

        for violation in &violations {
            eprintln!("  {violation}");
        }

        eprintln!("\nFORBIDDEN in async fn:");
        eprintln!("  - std::fs::read(), std::fs::write(), std::fs::File");
        eprintln!("  - std::net::TcpStream, std::net::TcpListener");
        eprintln!("  - std::process::Command");
        eprintln!("  - reqwest::blocking::*");
        eprintln!("\nREQUIRED async I/O:");
        eprintln!("  - tokio::fs::read().await, tokio::fs::write().await");
        eprintln!("  - tokio::net::TcpStream::connect().await");
        eprintln!("  - reqwest::Client (async)");

        panic!(
            "\nFound {} blocking I/O violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Never acceptable, async or not
#[test]
fn test_no_blocking_http_client_anywhere() {
    let mut violations = Vec::new();
    for dir in ["classifier/core/src", "tui/src"] {
        for path in rust_sources(dir) {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };
            for line in production_lines(&content) {
                if line.code.contains("reqwest::blocking") {
                    violations.push(violation(&path, &line, "Blocking HTTP client"));
                }
            }
        }
    }
    assert!(violations.is_empty(), "{}", violations.join("\n"));
}

/// Find all blocking I/O calls inside async production code
fn find_blocking_io_violations() -> Vec<String> {
    let mut violations = Vec::new();

    for dir in ["classifier/core/src", "tui/src"] {
        for path in rust_sources(dir) {
            let Ok(content) = fs::read_to_string(&path) else {
                continue;
            };

            for line in production_lines(&content) {
                if !line.in_async_fn {
                    continue;
                }
                let code = &line.code;

                if code.contains("std::fs::") {
                    violations.push(violation(&path, &line, "Blocking file I/O"));
                }
                if code.contains("std::net::") {
                    violations.push(violation(&path, &line, "Blocking network I/O"));
                }
                if code.contains("std::process::Command") {
                    violations.push(violation(&path, &line, "Blocking process I/O"));
                }
                if code.contains("std::thread::sleep") {
                    violations.push(violation(&path, &line, "Blocking sleep"));
                }
            }
        }
    }

    violations
}
