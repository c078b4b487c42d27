use super::{expect_record, ProbeRecord, TestResult};
use crate::{EntityStore, StorageError};

pub(super) fn run_replace_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "replace",
            "replace_overwrites_record",
            replace_overwrites_record(factory),
        ),
        TestResult::from_result(
            "replace",
            "replace_missing_returns_not_found",
            replace_missing_returns_not_found(factory),
        ),
        TestResult::from_result(
            "replace",
            "replace_missing_does_not_insert",
            replace_missing_does_not_insert(factory),
        ),
        TestResult::from_result(
            "replace",
            "replace_leaves_other_records_alone",
            replace_leaves_other_records_alone(factory),
        ),
        TestResult::from_result(
            "replace",
            "repeated_replace_keeps_last_write",
            repeated_replace_keeps_last_write(factory),
        ),
    ]
}

fn replace_overwrites_record<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    s.insert(1, ProbeRecord::new("city-hall", 0))
        .map_err(|e| e.to_string())?;
    let updated = ProbeRecord::new("city-hall", 1);
    s.replace(1, updated.clone()).map_err(|e| e.to_string())?;
    expect_record(&s, 1, &updated)
}

fn replace_missing_returns_not_found<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    match s.replace(999, ProbeRecord::new("ghost", 0)) {
        Err(StorageError::NotFound { id: 999 }) => Ok(()),
        other => Err(format!("expected NotFound {{ id: 999 }}, got {:?}", other)),
    }
}

fn replace_missing_does_not_insert<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    let _ = s.replace(5, ProbeRecord::new("ghost", 0));
    match s.get(5).map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(rec) => Err(format!("replace on missing id inserted {:?}", rec)),
    }
}

fn replace_leaves_other_records_alone<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    let untouched = ProbeRecord::new("water-main", 0);
    s.insert(1, ProbeRecord::new("bridge", 0))
        .map_err(|e| e.to_string())?;
    s.insert(2, untouched.clone()).map_err(|e| e.to_string())?;
    s.replace(1, ProbeRecord::new("bridge", 1))
        .map_err(|e| e.to_string())?;
    expect_record(&s, 2, &untouched)
}

fn repeated_replace_keeps_last_write<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    s.insert(1, ProbeRecord::new("task", 0))
        .map_err(|e| e.to_string())?;
    for revision in 1..=3 {
        s.replace(1, ProbeRecord::new("task", revision))
            .map_err(|e| e.to_string())?;
    }
    expect_record(&s, 1, &ProbeRecord::new("task", 3))?;
    match s.len().map_err(|e| e.to_string())? {
        1 => Ok(()),
        n => Err(format!("expected 1 record after replaces, got {}", n)),
    }
}
