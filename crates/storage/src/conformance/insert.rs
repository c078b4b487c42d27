use super::{expect_record, ProbeRecord, TestResult};
use crate::{EntityStore, StorageError};

pub(super) fn run_insert_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "insert",
            "insert_makes_record_readable",
            insert_makes_record_readable(factory),
        ),
        TestResult::from_result(
            "insert",
            "duplicate_insert_returns_already_exists",
            duplicate_insert_returns_already_exists(factory),
        ),
        TestResult::from_result(
            "insert",
            "duplicate_insert_keeps_original_record",
            duplicate_insert_keeps_original_record(factory),
        ),
        TestResult::from_result(
            "insert",
            "distinct_ids_are_independent",
            distinct_ids_are_independent(factory),
        ),
        TestResult::from_result(
            "insert",
            "insert_accepts_non_contiguous_ids",
            insert_accepts_non_contiguous_ids(factory),
        ),
    ]
}

fn insert_makes_record_readable<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    let rec = ProbeRecord::new("main-street-bridge", 0);
    s.insert(1, rec.clone()).map_err(|e| e.to_string())?;
    expect_record(&s, 1, &rec)
}

fn duplicate_insert_returns_already_exists<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    s.insert(1, ProbeRecord::new("first", 0))
        .map_err(|e| e.to_string())?;
    match s.insert(1, ProbeRecord::new("second", 0)) {
        Err(StorageError::AlreadyExists { id: 1 }) => Ok(()),
        other => Err(format!(
            "expected AlreadyExists {{ id: 1 }}, got {:?}",
            other
        )),
    }
}

fn duplicate_insert_keeps_original_record<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    let original = ProbeRecord::new("first", 0);
    s.insert(4, original.clone()).map_err(|e| e.to_string())?;
    let _ = s.insert(4, ProbeRecord::new("second", 9));
    expect_record(&s, 4, &original)?;
    match s.len().map_err(|e| e.to_string())? {
        1 => Ok(()),
        n => Err(format!(
            "expected 1 record after rejected insert, got {}",
            n
        )),
    }
}

fn distinct_ids_are_independent<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    let a = ProbeRecord::new("road", 0);
    let b = ProbeRecord::new("park", 0);
    s.insert(1, a.clone()).map_err(|e| e.to_string())?;
    s.insert(2, b.clone()).map_err(|e| e.to_string())?;
    expect_record(&s, 1, &a)?;
    expect_record(&s, 2, &b)
}

/// Sequences shared between tables leave gaps in each table's ID range.
fn insert_accepts_non_contiguous_ids<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    for id in [1, 3, 8] {
        s.insert(id, ProbeRecord::new("sensor", 0))
            .map_err(|e| e.to_string())?;
    }
    match s.len().map_err(|e| e.to_string())? {
        3 => Ok(()),
        n => Err(format!("expected 3 records, got {}", n)),
    }
}
