use super::{ProbeRecord, TestResult};
use crate::EntityStore;

pub(super) fn run_read_tests<S, F>(factory: &F) -> Vec<TestResult>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    vec![
        TestResult::from_result(
            "read",
            "fresh_store_is_empty",
            fresh_store_is_empty(factory),
        ),
        TestResult::from_result(
            "read",
            "get_missing_returns_none",
            get_missing_returns_none(factory),
        ),
        TestResult::from_result(
            "read",
            "get_id_zero_returns_none",
            get_id_zero_returns_none(factory),
        ),
        TestResult::from_result("read", "len_counts_inserts", len_counts_inserts(factory)),
        TestResult::from_result(
            "read",
            "get_returns_independent_copy",
            get_returns_independent_copy(factory),
        ),
    ]
}

fn fresh_store_is_empty<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let s = factory();
    if s.is_empty().map_err(|e| e.to_string())? {
        Ok(())
    } else {
        Err("factory returned a non-empty store".to_string())
    }
}

fn get_missing_returns_none<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    s.insert(1, ProbeRecord::new("park", 0))
        .map_err(|e| e.to_string())?;
    match s.get(2).map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(rec) => Err(format!("expected None for id 2, got {:?}", rec)),
    }
}

fn get_id_zero_returns_none<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let s = factory();
    match s.get(0).map_err(|e| e.to_string())? {
        None => Ok(()),
        Some(rec) => Err(format!("expected None for id 0, got {:?}", rec)),
    }
}

fn len_counts_inserts<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    for id in 1..=4 {
        s.insert(id, ProbeRecord::new("road", 0))
            .map_err(|e| e.to_string())?;
    }
    match s.len().map_err(|e| e.to_string())? {
        4 => Ok(()),
        n => Err(format!("expected 4 records, got {}", n)),
    }
}

/// Mutating a returned record must not reach into the store.
fn get_returns_independent_copy<S, F>(factory: &F) -> Result<(), String>
where
    S: EntityStore<ProbeRecord>,
    F: Fn() -> S,
{
    let mut s = factory();
    s.insert(1, ProbeRecord::new("bridge", 0))
        .map_err(|e| e.to_string())?;
    let mut copy = s
        .get(1)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "record 1 missing".to_string())?;
    copy.revision = 42;
    match s.get(1).map_err(|e| e.to_string())? {
        Some(rec) if rec.revision == 0 => Ok(()),
        other => Err(format!("stored record changed through a copy: {:?}", other)),
    }
}
