//! Conformance tests that run YAML fixtures against exemplar
//!
//! Run with: cargo test -p exemplar-test --test conformance
//!
//! Set `RUST_LOG=exemplar_test=debug` to see per-case progress.

#![cfg(feature = "fixtures")]

use exemplar_test::fixture::Fixture;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Fixtures live next to this crate's manifest.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Load and run all fixtures in a directory
fn run_fixtures_in_dir(dir: &Path) {
    init_tracing();
    assert!(dir.exists(), "Fixtures directory does not exist: {}", dir.display());

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .filter(|path| path.extension().is_some_and(|e| e == "yaml" || e == "yml"))
        .collect();
    paths.sort();
    assert!(!paths.is_empty(), "No fixtures in {}", dir.display());

    for path in paths {
        tracing::info!(fixture = %path.display(), "running fixture file");

        let yaml = fs::read_to_string(&path).expect("read yaml");

        // Parse potentially multiple fixtures (separated by ---)
        let fixtures = Fixture::from_yaml_multi(&yaml).unwrap_or_else(|e| {
            panic!("Failed to parse {}: {}", path.display(), e);
        });

        for fixture in fixtures {
            tracing::debug!(name = %fixture.name, "running");
            fixture.run_and_assert();
        }
    }
}

#[test]
fn test_structure() {
    run_fixtures_in_dir(&fixtures_dir().join("01_structure"));
}

#[test]
fn test_sequences() {
    run_fixtures_in_dir(&fixtures_dir().join("02_sequences"));
}

#[test]
fn test_rules() {
    run_fixtures_in_dir(&fixtures_dir().join("03_rules"));
}

#[test]
fn test_modes_and_formats() {
    run_fixtures_in_dir(&fixtures_dir().join("04_modes"));
}

#[test]
fn test_config_errors() {
    run_fixtures_in_dir(&fixtures_dir().join("05_config"));
}
