//! # Fixture Scope Integration Tests / 夹具作用域集成测试
//!
//! Teardown must run exactly once on every exit path of `with_fixture`.
//!
//! 在 `with_fixture` 的每条退出路径上，销毁都必须恰好执行一次。

mod common;

use check_runner::core::models::Status;
use check_runner::{Check, CheckContext, Harness, with_fixture};
use common::CountingFixture;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

fn crash() -> usize {
    panic!("harness crashed")
}

#[tokio::test]
async fn test_teardown_runs_after_success() {
    let provider = CountingFixture::default();

    let scoped = with_fixture(&provider, |cluster| async move {
        Harness::new(cluster)
            .check(Check::new("ClusterCreated", |cluster: Arc<String>, ctx: CheckContext| async move {
                ctx.check(cluster.starts_with("cluster-"), "unexpected cluster id");
            }))
            .run()
            .await
    })
    .await
    .unwrap();

    let results = scoped.value.unwrap();
    assert_eq!(results[0].status(), Status::Pass);
    assert!(scoped.teardown_error.is_none());
    assert_eq!(provider.provision_count(), 1);
    assert_eq!(provider.teardown_count(), 1);
}

#[tokio::test]
async fn test_teardown_runs_after_failing_checks() {
    let provider = CountingFixture::default();

    let scoped = with_fixture(&provider, |cluster| async move {
        Harness::new(cluster)
            .check(Check::new("Broken", |_c: Arc<String>, _ctx: CheckContext| async move {
                panic!("boom");
            }))
            .run()
            .await
    })
    .await
    .unwrap();

    assert_eq!(scoped.value.unwrap()[0].status(), Status::Fail);
    assert_eq!(provider.teardown_count(), 1);
}

#[tokio::test]
async fn test_teardown_runs_when_the_body_panics() {
    let provider = CountingFixture::default();

    let outcome = AssertUnwindSafe(with_fixture(&provider, |_cluster| async move { crash() }))
        .catch_unwind()
        .await;

    assert!(outcome.is_err());
    assert_eq!(provider.teardown_count(), 1);
}

#[tokio::test]
async fn test_provision_failure_skips_body_but_still_tears_down() {
    let provider = CountingFixture {
        fail_provision: true,
        ..CountingFixture::default()
    };

    let ran = Arc::new(AtomicBool::new(false));
    let ran_in_body = Arc::clone(&ran);

    let err = with_fixture(&provider, |_cluster| async move {
        ran_in_body.store(true, Ordering::SeqCst);
    })
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("provision exploded"));
    assert!(!ran.load(Ordering::SeqCst));
    assert_eq!(provider.teardown_count(), 1);
}

#[tokio::test]
async fn test_provision_and_teardown_failures_are_both_reported() {
    let provider = CountingFixture {
        fail_provision: true,
        fail_teardown: true,
        ..CountingFixture::default()
    };

    let err = with_fixture(&provider, |_cluster| async move {}).await.unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains("provision exploded"));
    assert!(message.contains("teardown exploded"));
}

#[tokio::test]
async fn test_teardown_failure_keeps_the_results() {
    let provider = CountingFixture {
        fail_teardown: true,
        ..CountingFixture::default()
    };

    let scoped = with_fixture(&provider, |cluster| async move { cluster.len() })
        .await
        .unwrap();

    assert_eq!(scoped.value, "cluster-1234".len());
    let err = scoped.teardown_error.expect("teardown error should be reported");
    assert!(err.to_string().contains("teardown exploded"));
}
