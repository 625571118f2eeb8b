//! # Formation payment server
//! This crate hosts the HTTP surface of the formation payment reconciliation service. It is responsible for:
//! * Accepting formation requests and checkout sessions from the storefront integration.
//! * Reconciling requests against the Shopify order feed on demand, since Shopify webhooks cannot be relied on.
//! * Recording document uploads and letting administrators override request statuses.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/api/requests/...`: The formation request routes. See [routes](routes/index.html).

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod notifications;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
