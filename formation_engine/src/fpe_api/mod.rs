//! # Formation engine public API
//!
//! The API is split by concern, so clients can pick the parts they need:
//!
//! * [`reconciliation_api`] matches a request against the external order feed and records the payment exactly once.
//! * [`status_flow_api`] derives and persists lifecycle status changes, records document uploads and applies
//!   administrative overrides.
//! * [`request_api`] creates and reads back formation requests and their audit trail.
//!
//! Every API is created from a database backend that implements [`crate::traits::FormationDatabase`]:
//!
//! ```rust,ignore
//! use formation_engine::{events::EventProducers, ReconciliationApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/formation_store.db", 5).await?;
//! let api = ReconciliationApi::new(db, my_order_feed, EventProducers::default());
//! let result = api.reconcile(&request_id).await?;
//! ```
pub mod errors;
pub mod reconciliation_api;
pub mod reconciliation_objects;
pub mod request_api;
pub mod status_flow_api;
