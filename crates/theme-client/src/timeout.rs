//! Timeouts around cart service calls.
//!
//! The crate does not own a runtime. Whoever hosts it hands in a `Sleeper`
//! (a browser timer, `tokio::time::sleep`, ...) and each call races it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::{select, Either, LocalBoxFuture};
use theme_commerce::cart::CartSnapshot;

use crate::client::{AddItemRequest, CartClient, ClientError, UpdateItemRequest};
use crate::dependency::DependencyTag;
use crate::events::CartEvents;

/// Timeout configuration for one dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Total time allowed per call.
    pub total: Duration,
}

impl TimeoutConfig {
    pub fn from_total(total: Duration) -> Self {
        Self { total }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::from_total(Duration::from_millis(ms))
    }

    /// Defaults for a dependency.
    pub fn from_tag(tag: DependencyTag) -> Self {
        Self::from_total(tag.default_timeout())
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self::from_tag(DependencyTag::Cart)
    }
}

/// A timer supplied by the host.
pub trait Sleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

/// A sleeper that never fires. Calls then take as long as they take.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTimeout;

impl Sleeper for NoTimeout {
    fn sleep(&self, _duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(futures::future::pending())
    }
}

/// Wraps a client so every call fails with `ClientError::Timeout` once its
/// dependency's budget runs out.
pub struct TimedCartClient<C, S> {
    inner: C,
    sleeper: S,
    tag: DependencyTag,
    timeout: TimeoutConfig,
}

impl<C: CartClient, S: Sleeper> TimedCartClient<C, S> {
    pub fn new(inner: C, sleeper: S) -> Self {
        Self {
            inner,
            sleeper,
            tag: DependencyTag::Cart,
            timeout: TimeoutConfig::from_tag(DependencyTag::Cart),
        }
    }

    pub fn with_timeout(mut self, timeout: TimeoutConfig) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    async fn race<T>(
        &self,
        call: impl Future<Output = Result<T, ClientError>>,
    ) -> Result<T, ClientError> {
        let timer = self.sleeper.sleep(self.timeout.total);
        futures::pin_mut!(call);
        match select(call, timer).await {
            Either::Left((result, _)) => result,
            Either::Right(((), _)) => Err(ClientError::Timeout {
                dependency: self.tag,
                after: self.timeout.total,
            }),
        }
    }
}

#[async_trait(?Send)]
impl<C: CartClient, S: Sleeper> CartClient for TimedCartClient<C, S> {
    async fn init(&self, rendered: CartSnapshot) -> Result<CartSnapshot, ClientError> {
        self.race(self.inner.init(rendered)).await
    }

    async fn add_item(&self, request: &AddItemRequest) -> Result<CartSnapshot, ClientError> {
        self.race(self.inner.add_item(request)).await
    }

    async fn update_item(&self, request: &UpdateItemRequest) -> Result<CartSnapshot, ClientError> {
        self.race(self.inner.update_item(request)).await
    }

    async fn remove_item(&self, line: usize) -> Result<CartSnapshot, ClientError> {
        self.race(self.inner.remove_item(line)).await
    }

    fn subscribe(&self) -> CartEvents {
        self.inner.subscribe()
    }
}
