//! # GitHub API Dispatch Core
//!
//! The request-dispatch layer of a GitHub REST API client:
//! - Per-client option store with typed property slots
//! - Fluent option composer (`set`, `set_options`, `with`)
//! - Before/after request hooks inherited by derived API types
//! - Automatic interception of request methods
//! - Namespaces that build sub-API clients from the caller's configuration
//! - Pluggable transport and arguments parser
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_github_api::api::{ApiCatalog, ApiDefinition, NamespaceOptions};
//! use integrations_github_api::transport::Endpoint;
//! use integrations_github_api::mocks::MockGitHubTransport;
//! use integrations_github_api::Arguments;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let root = ApiDefinition::root("API");
//!
//!     let mut client = root.derive("Client");
//!     client.namespace("repos", NamespaceOptions::new());
//!
//!     let mut repos = root.derive("Client::Repos");
//!     repos.define_method("get", Endpoint::get("/repos/{user}/{repo}"));
//!
//!     let catalog = ApiCatalog::builder()
//!         .register(client)
//!         .register(repos)
//!         .transport(MockGitHubTransport::new())
//!         .build()?;
//!
//!     let github = catalog.client("Client", json!({"oauth_token": "ghp_xxxxxxxxxxxx"}))?;
//!     let mut repos = github.namespace("repos")?;
//!     repos.with("octocat/hello-world")?;
//!
//!     let repo = repos.call("get", Arguments::new()).await?;
//!     println!("{}", repo);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod options;

// API definitions and hooks
pub mod api;
pub mod callbacks;

// Client and dispatch
pub mod arguments;
pub mod client;

// Transport seam
pub mod transport;

// Observability
pub mod observability;

// Mocks for testing
pub mod mocks;

// Re-exports for convenience
pub use api::{ApiCatalog, ApiCatalogBuilder, ApiDefinition, NamespaceOptions, Visibility};
pub use arguments::{Arguments, ArgumentsParser, PassthroughParser};
pub use callbacks::{Callback, CallbackKind, CallbackRegistry};
pub use client::{Dispatched, GitHubClient, GitHubClientBuilder};
pub use config::{Configuration, ConfigurationBuilder, Property};
pub use errors::{GitHubError, GitHubErrorKind, GitHubResult};
pub use options::{OptionStore, Settings};
