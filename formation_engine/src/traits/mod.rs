//! # Backend contracts
//!
//! The engine never talks to a database or a commerce platform directly. Instead, it works against the traits in this
//! module, so that the storage layer and the order feed can be swapped out (or mocked) independently.
//!
//! * [`FormationDatabase`] is the highest-level storage contract. A backend implementing it can drive every API in
//!   the engine.
//! * [`RequestManagement`] stores formation requests, their payment snapshots and their status.
//! * [`DocumentManagement`] records which documents have been uploaded for a request.
//! * [`ActivityLog`] is the append-only audit trail.
//! * [`OrderFeed`] lists recent orders from the external commerce system.
mod activity_log;
mod data_objects;
mod document_management;
mod formation_database;
mod order_feed;
mod request_management;

pub use activity_log::ActivityLog;
pub use data_objects::{SnapshotWrite, StatusWrite};
pub use document_management::DocumentManagement;
pub use formation_database::{FormationDatabase, FormationStoreError};
pub use order_feed::{OrderFeed, OrderFeedError};
pub use request_management::RequestManagement;
