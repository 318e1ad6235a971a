//! # Harness Integration Tests / 执行器集成测试
//!
//! Runs whole suites through [`Harness`] and checks that every check yields
//! exactly one result, in input order, whatever the check does.
//!
//! 通过 [`Harness`] 运行完整套件，验证无论检查做什么，每个检查都恰好产生一个结果，且按输入顺序排列。

use check_runner::core::models::{ASSERTIONS_FAILED, FailureReason, Status};
use check_runner::{Check, CheckContext, Harness, Report};
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn fixture() -> Arc<String> {
    Arc::new("cluster-1234".to_string())
}

fn passing(name: &str) -> Check<String> {
    Check::new(name, |cluster: Arc<String>, ctx: CheckContext| async move {
        ctx.check(!cluster.is_empty(), "cluster id should not be empty");
    })
}

#[tokio::test]
async fn test_pass_fail_skip_in_order() {
    let results = Harness::new(fixture())
        .check(passing("A"))
        .check(Check::new("B", |_c: Arc<String>, ctx: CheckContext| async move {
            ctx.fail();
        }))
        .check(Check::new("C", |_c: Arc<String>, ctx: CheckContext| async move {
            ctx.skip_now("not applicable");
        }))
        .run()
        .await
        .unwrap();

    let names: Vec<_> = results.iter().map(|r| r.name()).collect();
    let statuses: Vec<_> = results.iter().map(|r| r.status()).collect();
    assert_eq!(names, ["A", "B", "C"]);
    assert_eq!(statuses, [Status::Pass, Status::Fail, Status::Skip]);
    assert_eq!(results[1].error_detail(), Some(ASSERTIONS_FAILED));
}

#[tokio::test]
async fn test_panicking_check_does_not_stop_the_suite() {
    let results = Harness::new(fixture())
        .check(Check::new("P", |_c: Arc<String>, _ctx: CheckContext| async move {
            panic!("boom");
        }))
        .check(passing("Q"))
        .run()
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].failure_reason(), Some(FailureReason::Panic));
    assert_eq!(results[0].error_detail(), Some("boom"));
    assert_eq!(results[1].status(), Status::Pass);
}

#[tokio::test]
async fn test_empty_suite_produces_empty_report() {
    let harness: Harness<String> = Harness::new(fixture());
    assert!(harness.is_empty());

    let start = Utc::now();
    let results = harness.run().await.unwrap();
    let report = Report::new(results, start, Utc::now());

    assert!(report.results().is_empty());
    assert_eq!(report.summary().total, 0);
    assert_eq!(report.pass_rate(), None);
}

#[tokio::test]
async fn test_default_timeout_applies_and_suite_continues() {
    let results = Harness::new(fixture())
        .default_timeout(Some(Duration::from_millis(50)))
        .check(Check::new("Slow", |_c: Arc<String>, _ctx: CheckContext| async move {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }))
        .check(passing("Fast"))
        .run()
        .await
        .unwrap();

    assert_eq!(results[0].failure_reason(), Some(FailureReason::Timeout));
    assert_eq!(results[1].status(), Status::Pass);
}

#[tokio::test]
async fn test_check_timeout_overrides_default() {
    let results = Harness::new(fixture())
        .default_timeout(Some(Duration::from_millis(10)))
        .check(
            Check::new("Patient", |_c: Arc<String>, _ctx: CheckContext| async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
            })
            .with_timeout(Duration::from_secs(5)),
        )
        .run()
        .await
        .unwrap();

    assert_eq!(results[0].status(), Status::Pass);
}

#[tokio::test]
async fn test_parallel_jobs_keep_input_order() {
    let checks = (0..8).map(|i| {
        // Earlier checks sleep longer, so they finish last.
        let delay = Duration::from_millis(10 * (8 - i) as u64);
        Check::new(format!("check-{i}"), move |_c: Arc<String>, _ctx: CheckContext| async move {
            tokio::time::sleep(delay).await;
        })
    });

    let results = Harness::new(fixture()).jobs(4).checks(checks).run().await.unwrap();

    let names: Vec<_> = results.iter().map(|r| r.name().to_string()).collect();
    let expected: Vec<_> = (0..8).map(|i| format!("check-{i}")).collect();
    assert_eq!(names, expected);
    assert!(results.iter().all(|r| r.status() == Status::Pass));
}

#[tokio::test]
async fn test_cancelled_token_skips_every_check() {
    let runs = Arc::new(AtomicUsize::new(0));
    let token = CancellationToken::new();
    token.cancel();

    let counter = Arc::clone(&runs);
    let results = Harness::new(fixture())
        .stop_token(token)
        .check(Check::new("A", move |_c: Arc<String>, _ctx: CheckContext| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }))
        .check(passing("B"))
        .run()
        .await
        .unwrap();

    assert_eq!(runs.load(Ordering::SeqCst), 0);
    assert!(results.iter().all(|r| r.status() == Status::Skip));
}

#[tokio::test]
async fn test_cancel_mid_run_skips_remaining_checks() {
    let token = CancellationToken::new();
    let trigger = token.clone();

    let results = Harness::new(fixture())
        .stop_token(token)
        .check(Check::new("Stopper", move |_c: Arc<String>, _ctx: CheckContext| {
            let trigger = trigger.clone();
            async move {
                trigger.cancel();
            }
        }))
        .check(passing("Later"))
        .run()
        .await
        .unwrap();

    assert_eq!(results[0].status(), Status::Pass);
    assert_eq!(results[1].status(), Status::Skip);
}

#[tokio::test]
async fn test_duplicate_names_are_rejected_before_running() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let counting = Check::new("Dup", move |_c: Arc<String>, _ctx: CheckContext| {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    });

    let err = Harness::new(fixture())
        .check(counting.clone())
        .check(counting)
        .run()
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Dup"));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_checks_share_one_fixture() {
    let shared = fixture();
    let results = Harness::new(Arc::clone(&shared))
        .check(Check::new("SeesFixture", |cluster: Arc<String>, ctx: CheckContext| async move {
            ctx.require(cluster.as_str() == "cluster-1234", "unexpected cluster id");
        }))
        .run()
        .await
        .unwrap();

    assert_eq!(results[0].status(), Status::Pass);
}
