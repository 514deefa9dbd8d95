//! Common test helpers shared across integration tests

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(dead_code)] // Not all helpers are used by every test file

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper to get the compiled binary path
pub fn get_binary_path() -> PathBuf {
    // Get the directory where cargo places test binaries
    let mut path = env::current_exe().unwrap();
    path.pop(); // Remove test executable name

    // Check if we're in a 'deps' directory (integration tests)
    if path.ends_with("deps") {
        path.pop(); // Go up to debug or release
    }

    path.push("urun");

    // If the binary doesn't exist yet, build it first
    if !path.exists() {
        let build_output = Command::new("cargo")
            .args(["build", "--bin", "urun"])
            .output()
            .expect("Failed to build binary");

        assert!(
            build_output.status.success(),
            "Failed to build urun binary: {}",
            String::from_utf8_lossy(&build_output.stderr)
        );
    }

    path
}

/// Helper to create a temporary directory for tests
pub fn create_temp_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Helper to write a script file into a directory
pub fn create_script(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// The standard demo script from the directive docs: one boolean flag pair
/// and one required positional, echoing its bridged environment.
pub const DEMO_SCRIPT: &str = r#"#!/bin/sh
#USAGE bin "demo"
#USAGE flag "-f --force"
#USAGE flag "-v --verbose"
#USAGE arg "<file>"
echo "force=${usage_force} verbose=${usage_verbose} file=${usage_file}"
"#;
