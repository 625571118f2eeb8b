//! Formation Engine
//!
//! The formation engine reconciles company-formation requests with the orders that pay for them in an external
//! commerce platform, and drives each request's lifecycle status from the result. It is provider-agnostic: the
//! commerce platform is reached through the [`OrderFeed`] trait, and storage through [`FormationDatabase`].
//!
//! The library is divided into these main sections:
//! 1. The matching pipeline ([`mod@matching`]): match signals, candidate ranking and payment classification. These
//!    are pure functions over [`commerce_order::CommerceOrder`]s.
//! 2. The lifecycle rules ([`mod@lifecycle`]), also pure.
//! 3. The public API ([`mod@fpe_api`]), which ties the pipeline, the rules and the storage traits together.
//! 4. Storage. The [`traits`] define what a backend must provide. [`SqliteDatabase`] is the bundled backend.
//!
//! The engine also emits events ([`mod@events`]) when a payment is recorded or a status changes, so notification
//! hooks can be attached without the engine knowing about them.
pub mod commerce_order;
pub mod db_types;
pub mod events;
pub mod fpe_api;
pub mod lifecycle;
pub mod matching;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use fpe_api::{
    errors::ReconciliationError,
    reconciliation_api::ReconciliationApi,
    reconciliation_objects::{ReconciliationOutcome, ReconciliationResult},
    request_api::RequestApi,
    status_flow_api::{DocumentUploadResult, StatusFlowApi},
};
#[cfg(feature = "sqlite")]
pub use sqlite::{db as sqlite_db, SqliteDatabase};
pub use traits::{FormationDatabase, FormationStoreError, OrderFeed, OrderFeedError};
