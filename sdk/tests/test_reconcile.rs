use async_trait::async_trait;
use mars_minter_sdk::error::Error;
use mars_minter_sdk::models::MinterResult;
use mars_minter_sdk::reconcile::{reconcile_batch, Outcome, RemoteStore};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Default)]
struct MockStore {
    values: Mutex<HashMap<String, u64>>,
    /// Keys whose writes return an error.
    fail_writes: HashSet<String>,
    /// Keys whose writes silently store the wrong value.
    corrupt_writes: HashSet<String>,
    /// Keys whose reads never return.
    hang_reads: HashSet<String>,
    writes: Mutex<Vec<(String, u64)>>,
}

impl MockStore {
    fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    type Key = String;
    type Value = u64;

    async fn read_current(&self, key: &String) -> MinterResult<u64> {
        if self.hang_reads.contains(key) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(self.values.lock().unwrap().get(key).copied().unwrap_or(0))
    }

    async fn write_desired(&self, key: &String, value: &u64) -> MinterResult<()> {
        self.writes.lock().unwrap().push((key.clone(), *value));
        if self.fail_writes.contains(key) {
            return Err(Error::CommandFailed {
                command: "near call".to_string(),
                stderr: "simulated failure".to_string(),
            });
        }
        let stored = if self.corrupt_writes.contains(key) {
            value.wrapping_sub(1)
        } else {
            *value
        };
        self.values.lock().unwrap().insert(key.clone(), stored);
        Ok(())
    }
}

fn desired() -> Vec<(String, u64)> {
    vec![("alice.near".to_string(), 5), ("bob.near".to_string(), 3)]
}

fn outcome_for<'a>(
    reports: &'a [mars_minter_sdk::reconcile::Report<String>],
    key: &str,
) -> &'a Outcome {
    &reports.iter().find(|r| r.key == key).unwrap().outcome
}

#[tokio::test]
async fn empty_store_converges_with_one_write_per_key() {
    let store = MockStore::default();
    let reports = reconcile_batch(&store, desired(), TIMEOUT).await;

    assert_eq!(reports.len(), 2);
    assert!(matches!(outcome_for(&reports, "alice.near"), Outcome::Confirmed));
    assert!(matches!(outcome_for(&reports, "bob.near"), Outcome::Confirmed));
    assert_eq!(store.write_count(), 2);
    assert_eq!(store.values.lock().unwrap()["alice.near"], 5);
    assert_eq!(store.values.lock().unwrap()["bob.near"], 3);
}

#[tokio::test]
async fn second_run_issues_no_writes() {
    let store = MockStore::default();
    reconcile_batch(&store, desired(), TIMEOUT).await;
    assert_eq!(store.write_count(), 2);

    let reports = reconcile_batch(&store, desired(), TIMEOUT).await;
    assert!(reports.iter().all(|r| matches!(r.outcome, Outcome::Unchanged)));
    assert_eq!(store.write_count(), 2);
}

#[tokio::test]
async fn failed_key_does_not_affect_the_rest_of_the_batch() {
    let store = MockStore {
        fail_writes: HashSet::from(["k2".to_string()]),
        ..Default::default()
    };
    let batch = vec![
        ("k1".to_string(), 1),
        ("k2".to_string(), 2),
        ("k3".to_string(), 3),
    ];
    let reports = reconcile_batch(&store, batch, TIMEOUT).await;

    assert_eq!(reports.len(), 3);
    assert!(matches!(outcome_for(&reports, "k1"), Outcome::Confirmed));
    assert!(matches!(outcome_for(&reports, "k2"), Outcome::Failed(_)));
    assert!(matches!(outcome_for(&reports, "k3"), Outcome::Confirmed));
}

#[tokio::test]
async fn readback_mismatch_is_reported_as_failed() {
    let store = MockStore {
        corrupt_writes: HashSet::from(["k1".to_string()]),
        ..Default::default()
    };
    let reports = reconcile_batch(&store, vec![("k1".to_string(), 7)], TIMEOUT).await;

    match outcome_for(&reports, "k1") {
        Outcome::Failed(Error::ReconcileMismatch { expected, actual }) => {
            assert_eq!(expected, "7");
            assert_eq!(actual, "6");
        }
        other => panic!("expected ReconcileMismatch, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn hung_key_times_out_without_stalling_others() {
    let store = MockStore {
        hang_reads: HashSet::from(["stuck".to_string()]),
        ..Default::default()
    };
    let batch = vec![("stuck".to_string(), 1), ("fine".to_string(), 2)];
    let reports = reconcile_batch(&store, batch, TIMEOUT).await;

    assert!(matches!(outcome_for(&reports, "stuck"), Outcome::TimedOut));
    assert!(matches!(outcome_for(&reports, "fine"), Outcome::Confirmed));
}

#[tokio::test]
async fn outcome_success_covers_both_terminal_successes() {
    assert!(Outcome::Unchanged.is_success());
    assert!(Outcome::Confirmed.is_success());
    assert!(!Outcome::TimedOut.is_success());
}
