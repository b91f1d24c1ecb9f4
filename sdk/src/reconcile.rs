//! Idempotent convergence of remote keyed state toward a locally declared
//! desired state.
//!
//! Each key goes through a read-compare-write-reread cycle; the whole
//! batch is launched at once and keys settle independently, in no
//! particular order. A key's failure is recorded in its report and never
//! aborts or delays the rest of the batch.

use crate::error::Error;
use crate::models::MinterResult;
use async_trait::async_trait;
use futures::future::join_all;
use std::fmt::{Debug, Display};
use std::time::Duration;

/// Remote keyed storage the reconciler converges. Implementations map the
/// remote's "not found" onto their documented baseline value rather than
/// reporting an error.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    type Key: Display + Send + Sync;
    type Value: PartialEq + Debug + Send + Sync;

    async fn read_current(&self, key: &Self::Key) -> MinterResult<Self::Value>;
    async fn write_desired(&self, key: &Self::Key, value: &Self::Value) -> MinterResult<()>;
}

/// Terminal state of one key's reconciliation. No retries in any case.
#[derive(Debug)]
pub enum Outcome {
    /// Remote already held the desired value; no write was issued.
    Unchanged,
    /// A write was issued and the re-read returned the desired value.
    Confirmed,
    /// The read or write failed, or the re-read disagreed with the
    /// desired value.
    Failed(Error),
    /// The key's cycle did not settle within the per-key timeout.
    TimedOut,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Unchanged | Outcome::Confirmed)
    }
}

#[derive(Debug)]
pub struct Report<K> {
    pub key: K,
    pub outcome: Outcome,
}

async fn reconcile_one<S: RemoteStore>(store: &S, key: &S::Key, desired: &S::Value) -> Outcome {
    let current = match store.read_current(key).await {
        Ok(current) => current,
        Err(error) => return Outcome::Failed(error),
    };
    if current == *desired {
        return Outcome::Unchanged;
    }
    if let Err(error) = store.write_desired(key, desired).await {
        return Outcome::Failed(error);
    }
    match store.read_current(key).await {
        Ok(after) if after == *desired => Outcome::Confirmed,
        Ok(after) => Outcome::Failed(Error::ReconcileMismatch {
            expected: format!("{:?}", desired),
            actual: format!("{:?}", after),
        }),
        Err(error) => Outcome::Failed(error),
    }
}

/// Converge every `(key, desired)` pair concurrently and return a report
/// per key, in input order. Never fails as a whole; callers decide what
/// individual failures mean.
pub async fn reconcile_batch<S: RemoteStore>(
    store: &S,
    desired: Vec<(S::Key, S::Value)>,
    per_key_timeout: Duration,
) -> Vec<Report<S::Key>> {
    let tasks = desired
        .into_iter()
        .map(|(key, value)| async move {
            let outcome = match tokio::time::timeout(
                per_key_timeout,
                reconcile_one(store, &key, &value),
            )
            .await
            {
                Ok(outcome) => outcome,
                Err(_) => Outcome::TimedOut,
            };
            match &outcome {
                Outcome::Unchanged => {
                    tracing::info!(key = %key, "remote already matches desired value")
                }
                Outcome::Confirmed => {
                    tracing::info!(key = %key, value = ?value, "updated and confirmed")
                }
                Outcome::Failed(error) => {
                    tracing::error!(key = %key, %error, "reconciliation failed")
                }
                Outcome::TimedOut => {
                    tracing::error!(key = %key, timeout = ?per_key_timeout, "reconciliation timed out")
                }
            }
            Report { key, outcome }
        })
        .collect::<Vec<_>>();

    join_all(tasks).await
}
