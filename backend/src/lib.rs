//! Daily wellness backend library.
//!
//! Layout follows ports and adapters: [`domain`] holds the rules,
//! [`inbound`] exposes them over HTTP, and [`outbound`] stores them in
//! PostgreSQL or memory.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
