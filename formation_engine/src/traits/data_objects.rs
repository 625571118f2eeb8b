use crate::db_types::{FormationRequest, PaymentSnapshot};

/// The result of a conditional payment snapshot write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotWrite {
    /// The snapshot was stored. This caller won the write.
    Written(FormationRequest),
    /// A snapshot was already present. The existing one is returned and nothing was changed.
    AlreadyPresent(PaymentSnapshot),
}

/// The result of a conditional status write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusWrite {
    Updated(FormationRequest),
    /// The status changed underneath us. The request is returned as it currently stands.
    Conflict(FormationRequest),
}

impl StatusWrite {
    pub fn into_request(self) -> FormationRequest {
        match self {
            StatusWrite::Updated(r) | StatusWrite::Conflict(r) => r,
        }
    }
}
