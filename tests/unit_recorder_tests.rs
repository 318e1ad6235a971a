//! # Recorder Unit Tests / 记录器单元测试
//!
//! Each test runs a single body through `record` and inspects the one
//! result it produces.
//!
//! 每个测试通过 `record` 运行单个检查体，并检查其产生的唯一结果。

use check_runner::core::models::{ASSERTIONS_FAILED, FailureReason, Status};
use check_runner::core::recorder::{NON_STRING_PANIC, panic_message, record};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

#[tokio::test]
async fn test_returning_body_passes() {
    let result = record("A", None, |ctx| async move {
        ctx.log("all good");
    })
    .await;

    assert_eq!(result.name(), "A");
    assert_eq!(result.status(), Status::Pass);
    assert_eq!(result.error_detail(), None);
}

#[tokio::test]
async fn test_fail_marks_failure_and_keeps_running() {
    let reached_end = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reached_end);

    let result = record("B", None, move |ctx| async move {
        ctx.fail();
        flag.store(true, Ordering::SeqCst);
    })
    .await;

    assert!(reached_end.load(Ordering::SeqCst));
    assert_eq!(result.failure_reason(), Some(FailureReason::Assertion));
    assert_eq!(result.error_detail(), Some(ASSERTIONS_FAILED));
}

#[tokio::test]
async fn test_fail_now_stops_the_body() {
    let reached_end = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&reached_end);

    let result = record("B", None, move |ctx| async move {
        ctx.fail_now();
        #[allow(unreachable_code)]
        flag.store(true, Ordering::SeqCst);
    })
    .await;

    assert!(!reached_end.load(Ordering::SeqCst));
    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.error_detail(), Some(ASSERTIONS_FAILED));
}

#[tokio::test]
async fn test_skip_now_yields_skip() {
    let result = record("C", None, |ctx| async move {
        ctx.skip_now("endpoint not reachable from CI");
    })
    .await;

    assert_eq!(result.status(), Status::Skip);
    assert_eq!(result.error_detail(), None);
}

#[tokio::test]
async fn test_failure_after_skip_is_a_failure() {
    let result = record("B", None, |ctx| async move {
        ctx.skip();
        ctx.fail();
    })
    .await;

    assert_eq!(result.status(), Status::Fail);
}

#[tokio::test]
async fn test_panic_is_captured_with_its_message() {
    let result = record("P", None, |_ctx| async move {
        panic!("boom");
    })
    .await;

    assert_eq!(result.status(), Status::Fail);
    assert_eq!(result.failure_reason(), Some(FailureReason::Panic));
    assert_eq!(result.error_detail(), Some("boom"));
}

#[tokio::test]
async fn test_formatted_panic_message_is_kept() {
    let result = record("P", None, |_ctx| async move {
        let id = 42;
        panic!("cluster {id} missing");
    })
    .await;

    assert_eq!(result.error_detail(), Some("cluster 42 missing"));
}

#[tokio::test]
async fn test_panic_after_fail_reports_the_panic() {
    let result = record("P", None, |ctx| async move {
        ctx.fail();
        panic!("boom");
    })
    .await;

    assert_eq!(result.failure_reason(), Some(FailureReason::Panic));
    assert_eq!(result.error_detail(), Some("boom"));
}

#[tokio::test]
async fn test_timeout_fails_the_check() {
    let result = record("T", Some(Duration::from_millis(50)), |_ctx| async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
    })
    .await;

    assert_eq!(result.failure_reason(), Some(FailureReason::Timeout));
    assert!(result.error_detail().unwrap().starts_with("timed out after"));
    assert!(result.duration() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_duration_is_measured() {
    let result = record("D", None, |_ctx| async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
    })
    .await;

    assert!(result.duration() >= Duration::from_millis(30));
}

#[test]
fn test_panic_message_variants() {
    let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
    let borrowed: Box<dyn std::any::Any + Send> = Box::new("borrowed");
    let other: Box<dyn std::any::Any + Send> = Box::new(7_u32);

    assert_eq!(panic_message(&*owned), "owned");
    assert_eq!(panic_message(&*borrowed), "borrowed");
    assert_eq!(panic_message(&*other), NON_STRING_PANIC);
}
