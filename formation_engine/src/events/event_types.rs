use serde::{Deserialize, Serialize};

use crate::db_types::{FormationRequest, PaymentSnapshot, RequestStatus};

/// Emitted every time a status write actually changes a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangedEvent {
    pub old_status: RequestStatus,
    pub request: FormationRequest,
    pub reason: String,
}

impl StatusChangedEvent {
    pub fn new(old_status: RequestStatus, request: FormationRequest, reason: &str) -> Self {
        Self { old_status, request, reason: reason.to_string() }
    }

    pub fn new_status(&self) -> RequestStatus {
        self.request.status
    }
}

/// Emitted once per request, when a payment snapshot is first recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecordedEvent {
    pub request: FormationRequest,
    pub snapshot: PaymentSnapshot,
}

impl PaymentRecordedEvent {
    pub fn new(request: FormationRequest, snapshot: PaymentSnapshot) -> Self {
        Self { request, snapshot }
    }
}
