//! Conformance test suite for `EntityStore` implementations.
//!
//! A backend-agnostic suite that any `EntityStore` implementation can run to
//! verify it behaves the way the registries expect:
//!
//! - **insert**: append-only inserts, duplicate detection
//! - **replace**: in-place overwrite, missing-record errors
//! - **read**: absent records, counting, failed calls leave the store intact
//!
//! # Usage
//!
//! Backend crates call [`run_conformance_suite`] with a factory that creates
//! a fresh, empty store for each test:
//!
//! ```ignore
//! use cityledger_storage::conformance::run_conformance_suite;
//!
//! #[test]
//! fn sqlite_conformance() {
//!     let report = run_conformance_suite(|| SqliteStore::open_in_memory());
//!     assert!(report.failed == 0, "{report}");
//! }
//! ```

mod insert;
mod read;
mod replace;

use std::fmt;

use crate::EntityStore;

/// Result of a single conformance test.
#[derive(Debug, Clone)]
pub struct TestResult {
    /// Test category (e.g. "insert", "replace").
    pub category: String,
    /// Test name (e.g. "duplicate_insert_returns_already_exists").
    pub name: String,
    pub passed: bool,
    /// Error message if the test failed.
    pub message: Option<String>,
}

impl TestResult {
    fn from_result(category: &str, name: &str, result: Result<(), String>) -> Self {
        let (passed, message) = match result {
            Ok(()) => (true, None),
            Err(msg) => (false, Some(msg)),
        };
        Self {
            category: category.to_string(),
            name: name.to_string(),
            passed,
            message,
        }
    }
}

/// Aggregated report from a full conformance suite run.
#[derive(Debug, Clone)]
pub struct ConformanceReport {
    pub results: Vec<TestResult>,
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl fmt::Display for ConformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Conformance: {}/{} passed ({} failed)",
            self.passed, self.total, self.failed
        )?;
        for r in &self.results {
            if !r.passed {
                writeln!(
                    f,
                    "  FAIL [{}/{}]: {}",
                    r.category,
                    r.name,
                    r.message.as_deref().unwrap_or("(no message)")
                )?;
            }
        }
        Ok(())
    }
}

/// Record type the suite stores. Backends must accept it like any other
/// registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRecord {
    pub label: String,
    pub revision: u32,
}

impl ProbeRecord {
    fn new(label: &str, revision: u32) -> Self {
        Self {
            label: label.to_string(),
            revision,
        }
    }
}

/// Run the full conformance suite against a storage backend.
///
/// `factory` is called once per test to create a fresh, empty store.
pub fn run_conformance_suite<S, F>(factory: F) -> ConformanceReport
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut results = Vec::new();

    results.extend(insert::run_insert_tests(&factory));
    results.extend(replace::run_replace_tests(&factory));
    results.extend(read::run_read_tests(&factory));

    let passed = results.iter().filter(|r| r.passed).count();
    let total = results.len();

    ConformanceReport {
        results,
        passed,
        failed: total - passed,
        total,
    }
}

fn expect_record<S>(store: &S, id: u64, expected: &ProbeRecord) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
{
    match store.get(id).map_err(|e| e.to_string())? {
        Some(ref rec) if rec == expected => Ok(()),
        Some(rec) => Err(format!("id {}: expected {:?}, got {:?}", id, expected, rec)),
        None => Err(format!("id {}: expected {:?}, got nothing", id, expected)),
    }
}
