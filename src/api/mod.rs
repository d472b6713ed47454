//! API definitions, their registry and the callables stored on them.

mod catalog;
mod definition;
mod handler;
mod namespace;

pub use catalog::{ApiCatalog, ApiCatalogBuilder};
pub use definition::{ApiDefinition, Visibility, RESERVED_METHODS};
pub use handler::{handler_fn, hook_fn, HandlerFn, Hook, HookFn, RequestHandler};
pub use namespace::{NamespaceBinding, NamespaceOptions};
