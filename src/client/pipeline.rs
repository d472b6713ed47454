//! Execution pipeline of request methods: before hooks, body, after hooks.

use super::GitHubClient;
use crate::api::RequestHandler;
use crate::arguments::Arguments;
use crate::callbacks::CallbackKind;
use crate::errors::{GitHubError, GitHubResult};
use crate::observability::TracingHooks;
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

impl GitHubClient {
    /// Runs an intercepted request method.
    #[instrument(
        skip(self, handler, args),
        fields(api = %self.definition.name(), invocation = %Uuid::new_v4())
    )]
    pub(crate) async fn execute(
        &mut self,
        action: &str,
        handler: Arc<dyn RequestHandler>,
        args: Arguments,
    ) -> GitHubResult<Value> {
        let start = Instant::now();
        match self.run_with_hooks(action, handler, args).await {
            Ok(value) => {
                TracingHooks::on_action_complete(action, start.elapsed());
                Ok(value)
            }
            Err(err) => {
                TracingHooks::on_action_error(action, &err.to_string());
                Err(err)
            }
        }
    }

    async fn run_with_hooks(
        &mut self,
        action: &str,
        handler: Arc<dyn RequestHandler>,
        args: Arguments,
    ) -> GitHubResult<Value> {
        self.run_callbacks(CallbackKind::Before, action).await?;
        let result = handler.call(self, args).await?;
        self.run_callbacks(CallbackKind::After, action).await?;
        Ok(result)
    }

    async fn run_callbacks(&mut self, kind: CallbackKind, action: &str) -> GitHubResult<()> {
        let definition = Arc::clone(&self.definition);
        let names: Vec<String> = definition
            .callbacks()
            .filter(kind, action)
            .map(|callback| callback.callback.clone())
            .collect();

        for name in names {
            let hook = definition
                .hook(&name)
                .cloned()
                .ok_or_else(|| GitHubError::no_such_method(&name, definition.name()))?;
            TracingHooks::on_hook(kind, &name);
            hook.run(self).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{handler_fn, hook_fn, ApiCatalog, ApiDefinition};
    use crate::arguments::Arguments;
    use crate::callbacks::Callback;
    use crate::errors::{GitHubError, GitHubErrorKind};
    use serde_json::{json, Value};

    fn trace(client: &mut crate::client::GitHubClient, step: &str) {
        let mut steps = client
            .option("trace")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        steps.push(json!(step));
        client.set("trace", Value::Array(steps)).unwrap();
    }

    fn catalog(fail_before: bool) -> std::sync::Arc<ApiCatalog> {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos
            .define_hook(
                "authenticate",
                hook_fn(move |client| {
                    trace(client, "before");
                    if fail_before {
                        return Err(GitHubError::new(GitHubErrorKind::BadCredentials, "denied"));
                    }
                    Ok(())
                }),
            )
            .define_hook("audit", hook_fn(|client| {
                trace(client, "after");
                Ok(())
            }))
            .before_request("authenticate")
            .after_request(Callback::new("audit").only(["list"]))
            .define_method(
                "list",
                handler_fn(|client, args| {
                    trace(client, "body");
                    Ok(args.positional(0).cloned().unwrap_or(Value::Null))
                }),
            )
            .define_method("get", handler_fn(|client, _| {
                trace(client, "body");
                Ok(Value::Null)
            }));

        ApiCatalog::builder().register(repos).build().unwrap()
    }

    #[tokio::test]
    async fn test_hooks_wrap_body() {
        let mut client = catalog(false).client("Repos", Value::Null).unwrap();
        let result = client.call("list", Arguments::new().arg(7)).await.unwrap();

        assert_eq!(result, json!(7));
        assert_eq!(client.option("trace"), Some(&json!(["before", "body", "after"])));
    }

    #[tokio::test]
    async fn test_only_filter() {
        let mut client = catalog(false).client("Repos", Value::Null).unwrap();
        client.call("get", Arguments::new()).await.unwrap();

        assert_eq!(client.option("trace"), Some(&json!(["before", "body"])));
    }

    #[tokio::test]
    async fn test_failing_hook_aborts() {
        let mut client = catalog(true).client("Repos", Value::Null).unwrap();
        let err = client.call("list", Arguments::new()).await.unwrap_err();

        assert_eq!(err.kind(), &GitHubErrorKind::BadCredentials);
        assert_eq!(client.option("trace"), Some(&json!(["before"])));
    }

    #[tokio::test]
    async fn test_call_without_callbacks() {
        let mut client = catalog(false).client("Repos", Value::Null).unwrap();
        client.call_without_callbacks("list", Arguments::new()).await.unwrap();

        assert_eq!(client.option("trace"), Some(&json!(["body"])));
    }

    #[tokio::test]
    async fn test_unresolvable_hook() {
        let mut repos = ApiDefinition::root("API").derive("Repos");
        repos
            .before_request("missing")
            .define_method("list", handler_fn(|_, _| Ok(Value::Null)));
        let catalog = ApiCatalog::builder().register(repos).build().unwrap();

        let mut client = catalog.client("Repos", Value::Null).unwrap();
        let err = client.call("list", Arguments::new()).await.unwrap_err();
        assert_eq!(err.kind(), &GitHubErrorKind::NoSuchMethod);
    }
}
