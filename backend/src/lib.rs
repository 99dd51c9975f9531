//! Product catalog service library.
//!
//! Hexagonal layout: `domain` holds the product model, ports and the
//! cache-consistent catalog service; `outbound` adapts PostgreSQL and Redis;
//! `inbound` exposes the HTTP surface.

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
pub use domain::TraceId;
pub use middleware::Trace;
pub use settings::ServiceSettings;
