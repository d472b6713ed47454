//! Integration tests for namespaces and configuration inheritance.

#[cfg(test)]
mod namespace_tests {
    use integrations_github_api::api::NamespaceOptions;
    use integrations_github_api::mocks::{fixtures, MockGitHubTransport, MockResponse};
    use integrations_github_api::transport::HttpMethod;
    use integrations_github_api::{
        ApiCatalog, ApiDefinition, Arguments, Configuration, GitHubErrorKind,
    };
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use test_case::test_case;

    fn sample_catalog() -> (Arc<ApiCatalog>, MockGitHubTransport) {
        let transport = MockGitHubTransport::new();
        let config = Configuration::builder()
            .user_agent("namespace-tests")
            .build()
            .unwrap();
        let catalog = fixtures::catalog(config, transport.clone()).unwrap();
        (catalog, transport)
    }

    #[test]
    fn test_namespace_snapshot_matches_parent() {
        let (catalog, _) = sample_catalog();
        let mut client = catalog
            .client("Client", json!({"oauth_token": "ghp_token", "per_page": 50}))
            .unwrap();
        client.with("octocat/hello-world").unwrap();

        let repos = client.namespace("repos").unwrap();
        assert_eq!(repos.api_name(), "Client::Repos");
        assert_eq!(repos.current_options(), client.current_options());
        assert_eq!(
            repos.settings().oauth_token().map(|t| t.expose_secret().as_str()),
            Some("ghp_token")
        );
        assert_eq!(repos.option("per_page"), Some(&json!(50)));
    }

    #[test]
    fn test_namespace_overrides_win() {
        let (catalog, _) = sample_catalog();
        let client = catalog.client("Client", json!({"user": "octocat"})).unwrap();

        let issues = client
            .namespace_with("issues", json!({"user": "hubot", "state": "open"}))
            .unwrap();

        let mut expected = client.current_options().clone();
        expected.insert("user".into(), json!("hubot"));
        expected.insert("state".into(), json!("open"));
        assert_eq!(issues.current_options(), &expected);
        assert_eq!(issues.settings().user(), Some("hubot"));
        assert_eq!(client.settings().user(), Some("octocat"));
    }

    #[test]
    fn test_namespace_is_repeatable() {
        let (catalog, _) = sample_catalog();
        let client = catalog.client("Client", json!({"org": "github"})).unwrap();

        let first = client.namespace("repos").unwrap();
        let mut second = client.namespace("repos").unwrap();
        assert_eq!(first.current_options(), second.current_options());

        second.set("org", "rails").unwrap();
        let third = client.namespace("repos").unwrap();
        assert_eq!(third.option("org"), Some(&json!("github")));
    }

    #[test]
    fn test_nested_namespace() {
        let (catalog, _) = sample_catalog();
        let client = catalog.client("Client", Value::Null).unwrap();

        let comments = client.namespace("repos").unwrap().namespace("comments").unwrap();
        assert_eq!(comments.api_name(), "Repos::Comments");
        assert_eq!(comments.option("user_agent"), Some(&json!("namespace-tests")));
    }

    #[test]
    fn test_basic_auth_flows_into_namespace() {
        let (catalog, _) = sample_catalog();
        let client = catalog
            .client("Client", json!({"basic_auth": "octocat:hunter2"}))
            .unwrap();

        let repos = client.namespace("repos").unwrap();
        assert_eq!(repos.settings().login(), Some("octocat"));
        assert_eq!(
            repos.settings().password().map(|p| p.expose_secret().as_str()),
            Some("hunter2")
        );
    }

    #[test]
    fn test_namespace_keeps_parent_login_changes() {
        let (catalog, _) = sample_catalog();
        let mut client = catalog
            .client("Client", json!({"basic_auth": "octocat:pw"}))
            .unwrap();
        client.clear("login").unwrap();

        let repos = client.namespace("repos").unwrap();
        assert_eq!(repos.option("login"), Some(&Value::Null));
        assert_eq!(repos.settings().login(), None);
        assert_eq!(repos.current_options(), client.current_options());

        let issues = client
            .namespace_with("issues", json!({"basic_auth": "hubot:token"}))
            .unwrap();
        assert_eq!(issues.settings().login(), Some("hubot"));
        assert_eq!(client.option("login"), Some(&Value::Null));
    }

    #[test]
    fn test_unregistered_target() {
        let mut client = ApiDefinition::root("API").derive("Client");
        client.namespace("gists", NamespaceOptions::new());
        let catalog = ApiCatalog::builder().register(client).build().unwrap();

        let err = catalog
            .client("Client", Value::Null)
            .unwrap()
            .namespace("gists")
            .unwrap_err();
        assert_eq!(err.kind(), &GitHubErrorKind::UnknownApi);
    }

    #[test_case("pull_requests", NamespaceOptions::new(), "Client::PullRequests"; "qualified")]
    #[test_case("issues", NamespaceOptions::new().root(), "Issues"; "root")]
    #[test_case("pulls", NamespaceOptions::new().full_name("pull_requests"), "Client::PullRequests"; "full name")]
    fn test_namespace_targets(name: &str, options: NamespaceOptions, target: &str) {
        let mut client = ApiDefinition::root("API").derive("Client");
        client.namespace(name, options);

        assert_eq!(
            client.namespace_binding(name).map(|binding| binding.target()),
            Some(target)
        );
    }

    #[tokio::test]
    async fn test_dispatch_namespace_with_params() {
        let (catalog, transport) = sample_catalog();
        transport.on_get(
            "/repos/octocat/hello-world/issues",
            MockResponse::ok(&json!([{"number": 1347}])),
        );
        let mut client = catalog.client("Client", Value::Null).unwrap();

        let mut issues = client
            .dispatch(
                "issues",
                Arguments::new()
                    .param("user", "octocat")
                    .param("repo", "hello-world"),
            )
            .await
            .unwrap()
            .into_namespace()
            .unwrap();

        let listed = issues.call("list", Arguments::new()).await.unwrap();
        assert_eq!(listed, json!([{"number": 1347}]));
        assert!(transport.verify_request(HttpMethod::Get, "/repos/octocat/hello-world/issues"));
        assert_eq!(client.option("user"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_namespace_request_carries_parent_options() {
        let (catalog, transport) = sample_catalog();
        transport.on_get(
            "/repos/octocat/hello-world/comments",
            MockResponse::ok(&json!([])),
        );
        let client = catalog
            .client("Client", json!({"user": "octocat", "repo": "hello-world"}))
            .unwrap();

        let mut comments = client.namespace("repos").unwrap().namespace("comments").unwrap();
        comments.call("list", Arguments::new()).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].options.get("user_agent"), Some(&json!("namespace-tests")));
    }

    #[tokio::test]
    async fn test_error_status_is_mapped() {
        let (catalog, _) = sample_catalog();
        let client = catalog
            .client("Client", json!({"user": "octocat", "repo": "missing"}))
            .unwrap();

        let mut repos = client.namespace("repos").unwrap();
        let err = repos.call("get", Arguments::new()).await.unwrap_err();

        assert_eq!(err.kind(), &GitHubErrorKind::NotFound);
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.api(), Some("Client::Repos"));
    }
}
