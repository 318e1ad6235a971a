//! # Fixture Module / 夹具模块
//!
//! Scoped acquisition of the shared fixture. [`with_fixture`] provisions the
//! fixture, hands it to the caller's body, and tears it down on every exit
//! path, including a failed provision and a panic inside the body.
//!
//! 共享夹具的作用域获取。[`with_fixture`] 创建夹具并交给调用方的闭包，
//! 并在所有退出路径上（包括创建失败和闭包内部 panic）将其销毁。

use anyhow::{Result, anyhow};
use colored::*;
use futures::FutureExt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::infra::t;

/// Creates and destroys the expensive resource that every check observes.
/// The handle is opaque to the harness.
///
/// 创建并销毁所有检查共同观察的昂贵资源。句柄对执行器而言是不透明的。
pub trait FixtureProvider {
    type Handle: Send + Sync + 'static;

    fn provision(&self) -> impl Future<Output = Result<Self::Handle>> + Send;

    /// Releases the fixture. `handle` is `None` when [`provision`] failed,
    /// in which case whatever the failed attempt created must still be
    /// released.
    ///
    /// [`provision`]: FixtureProvider::provision
    fn teardown(&self, handle: Option<&Self::Handle>) -> impl Future<Output = Result<()>> + Send;
}

/// The value produced inside a fixture scope, together with the outcome of
/// tearing the fixture down. A failed teardown does not discard the value.
#[derive(Debug)]
pub struct Scoped<T> {
    pub value: T,
    pub teardown_error: Option<anyhow::Error>,
}

/// Provisions a fixture, runs `body` with it, and always tears it down.
///
/// * If provisioning fails, `body` does not run but teardown still does, so a
///   partially created resource is released. The provisioning error is
///   returned, with the teardown error appended when that fails too.
/// * If `body` panics, teardown still runs and the panic is then resumed.
/// * A teardown error is returned in [`Scoped::teardown_error`] next to the
///   body's value.
///
/// 创建夹具，用它运行 `body`，并总是将其销毁。
/// 创建失败时不运行 `body`，但仍会执行销毁以释放部分创建的资源，并返回创建错误（销毁也失败时附带销毁错误）；
/// `body` panic 时仍会执行销毁，然后继续传播 panic；
/// 销毁错误与 `body` 的返回值一起放在 [`Scoped::teardown_error`] 中返回。
pub async fn with_fixture<P, B, Fut, T>(provider: &P, body: B) -> Result<Scoped<T>>
where
    P: FixtureProvider,
    B: FnOnce(Arc<P::Handle>) -> Fut,
    Fut: Future<Output = T>,
{
    println!("{}", t!("fixture.provisioning").blue());
    let handle = match provider.provision().await {
        Ok(handle) => Arc::new(handle),
        Err(e) => {
            let provision_error = e.context(t!("fixture.provision_failed").to_string());
            return Err(match release(provider, None).await {
                None => provision_error,
                Some(teardown_error) => anyhow!(
                    "{provision_error:#}\n{}: {teardown_error:#}",
                    t!("fixture.teardown_failed")
                ),
            });
        }
    };
    println!("{}", t!("fixture.provisioned").green());

    let handle_for_body = Arc::clone(&handle);
    let outcome = AssertUnwindSafe(async move { body(handle_for_body).await })
        .catch_unwind()
        .await;

    let teardown_error = release(provider, Some(handle.as_ref())).await;

    match outcome {
        Ok(value) => Ok(Scoped {
            value,
            teardown_error,
        }),
        Err(payload) => panic::resume_unwind(payload),
    }
}

async fn release<P: FixtureProvider>(provider: &P, handle: Option<&P::Handle>) -> Option<anyhow::Error> {
    println!("{}", t!("fixture.tearing_down").blue());
    match provider.teardown(handle).await {
        Ok(()) => {
            println!("{}", t!("fixture.torn_down").green());
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "fixture teardown failed");
            eprintln!("{} {:#}", t!("fixture.teardown_failed").red(), e);
            Some(e)
        }
    }
}
