//! Callables stored on API definitions: request bodies and hooks.

use crate::arguments::Arguments;
use crate::client::GitHubClient;
use crate::errors::GitHubResult;
use async_trait::async_trait;
use serde_json::Value;

/// Body of a method defined on an API definition.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Runs the body against `client`.
    async fn call(&self, client: &mut GitHubClient, args: Arguments) -> GitHubResult<Value>;
}

/// A zero-argument hook run before or after request methods.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Runs the hook against `client`.
    async fn run(&self, client: &mut GitHubClient) -> GitHubResult<()>;
}

/// Request handler backed by a synchronous closure.
pub struct HandlerFn<F> {
    f: F,
}

/// Wraps a closure as a [`RequestHandler`].
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: Fn(&mut GitHubClient, Arguments) -> GitHubResult<Value> + Send + Sync,
{
    HandlerFn { f }
}

#[async_trait]
impl<F> RequestHandler for HandlerFn<F>
where
    F: Fn(&mut GitHubClient, Arguments) -> GitHubResult<Value> + Send + Sync,
{
    async fn call(&self, client: &mut GitHubClient, args: Arguments) -> GitHubResult<Value> {
        (self.f)(client, args)
    }
}

/// Hook backed by a synchronous closure.
pub struct HookFn<F> {
    f: F,
}

/// Wraps a closure as a [`Hook`].
pub fn hook_fn<F>(f: F) -> HookFn<F>
where
    F: Fn(&mut GitHubClient) -> GitHubResult<()> + Send + Sync,
{
    HookFn { f }
}

#[async_trait]
impl<F> Hook for HookFn<F>
where
    F: Fn(&mut GitHubClient) -> GitHubResult<()> + Send + Sync,
{
    async fn run(&self, client: &mut GitHubClient) -> GitHubResult<()> {
        (self.f)(client)
    }
}
