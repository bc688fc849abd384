//! Scoped acquisition with guaranteed release
//!
//! `with_resource` runs a body against a borrowed resource and then releases
//! it, whether the body returned `Ok` or `Err`. If the body panics the
//! resource is dropped during unwinding, so implementors must also release in
//! `Drop`.

use futures::future::BoxFuture;
use std::future::Future;

/// A resource with an async, consuming release
pub trait Releasable: Send {
    fn release(self) -> impl Future<Output = ()> + Send;
}

/// Run `body` with `resource`, then release it
pub async fn with_resource<R, T, F>(mut resource: R, body: F) -> T
where
    R: Releasable,
    T: Send,
    F: for<'a> FnOnce(&'a mut R) -> BoxFuture<'a, T>,
{
    let output = body(&mut resource).await;
    resource.release().await;
    output
}
