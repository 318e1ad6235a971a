// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{Result, bail};
use chrono::{DateTime, TimeZone, Utc};
use check_runner::core::fixture::FixtureProvider;
use check_runner::{CheckResult, FailureReason};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A fixed start/end pair 4.2 seconds apart.
pub fn fixed_times() -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let end = start + chrono::Duration::milliseconds(4200);
    (start, end)
}

/// One result of each status, in the A/B/C order used across the tests.
pub fn sample_results() -> Vec<CheckResult> {
    vec![
        CheckResult::passed("A", Duration::from_millis(10)),
        CheckResult::failed(
            "B",
            Duration::from_millis(20),
            FailureReason::Assertion,
            "assertions failed",
        ),
        CheckResult::skipped("C", Duration::from_millis(1)),
    ]
}

/// Writes `content` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// In-memory fixture that counts provision and teardown calls.
#[derive(Debug, Clone, Default)]
pub struct CountingFixture {
    pub provisioned: Arc<AtomicUsize>,
    pub torn_down: Arc<AtomicUsize>,
    pub fail_provision: bool,
    pub fail_teardown: bool,
}

impl CountingFixture {
    pub fn provision_count(&self) -> usize {
        self.provisioned.load(Ordering::SeqCst)
    }

    pub fn teardown_count(&self) -> usize {
        self.torn_down.load(Ordering::SeqCst)
    }
}

impl FixtureProvider for CountingFixture {
    type Handle = String;

    async fn provision(&self) -> Result<String> {
        self.provisioned.fetch_add(1, Ordering::SeqCst);
        if self.fail_provision {
            bail!("provision exploded");
        }
        Ok("cluster-1234".to_string())
    }

    async fn teardown(&self, _handle: Option<&String>) -> Result<()> {
        self.torn_down.fetch_add(1, Ordering::SeqCst);
        if self.fail_teardown {
            bail!("teardown exploded");
        }
        Ok(())
    }
}
