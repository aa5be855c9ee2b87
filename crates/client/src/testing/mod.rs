//! Testing utilities for reporter client tests.
//!
//! Available when running tests or when the `test-utils` feature is
//! enabled; integration tests enable the feature through a dev-dependency
//! on the crate itself.

use std::path::Path;

/// Load a JSON fixture from the crate's `fixtures/` directory.
///
/// # Panics
/// - If the fixture file cannot be read.
/// - If the file content is not valid JSON.
pub fn load_fixture(fixture_path: &str) -> serde_json::Value {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let full_path = manifest_dir.join("fixtures").join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("invalid JSON in fixture")
}
