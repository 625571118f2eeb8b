//! Pure lifecycle rules for formation requests.
//!
//! Nothing in here touches storage. The status flow API reads the facts (current status, whether a payment snapshot
//! exists, which documents are on file), asks [`compute_next_status`] what to do, and persists the answer.
use std::collections::HashSet;

use crate::db_types::{DocumentType, RequestStatus};

/// Derives the status a request should be in, given the current status and the facts the engine knows about.
///
/// * Terminal states are never left.
/// * Without a valid payment nothing changes.
/// * A paid request moves to `payment_completed`, or to `in_review` once every required document is on file.
/// * The derived status is only applied when it moves the request forward. A request sitting in
///   `documents_requested` stays there until the documents are complete, and `processing` is never pulled back.
///
/// `processing`, `completed`, `rejected` and `cancelled` are never derived here. Only an administrator sets them.
pub fn compute_next_status(
    current: RequestStatus,
    has_valid_payment: bool,
    required_documents_complete: bool,
) -> RequestStatus {
    if current.is_terminal() || !has_valid_payment {
        return current;
    }
    let derived =
        if required_documents_complete { RequestStatus::InReview } else { RequestStatus::PaymentCompleted };
    match (current.progress(), derived.progress()) {
        (Some(now), Some(next)) if next > now => derived,
        _ => current,
    }
}

/// True if every required document type appears at least once in `uploaded`.
pub fn required_documents_complete<I>(uploaded: I) -> bool
where I: IntoIterator<Item = DocumentType> {
    missing_required_documents(uploaded).is_empty()
}

/// The required document types that do not appear in `uploaded`, in declaration order.
pub fn missing_required_documents<I>(uploaded: I) -> Vec<DocumentType>
where I: IntoIterator<Item = DocumentType> {
    let uploaded = uploaded.into_iter().collect::<HashSet<_>>();
    DocumentType::required_types().filter(|t| !uploaded.contains(t)).collect()
}

/// Checks whether an administrator may move a request from `current` to `new`.
pub fn check_override(current: RequestStatus, new: RequestStatus) -> Result<(), OverrideRejection> {
    if current == new {
        return Err(OverrideRejection::NoOp);
    }
    if current.is_terminal() {
        return Err(OverrideRejection::Terminal(current));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideRejection {
    NoOp,
    Terminal(RequestStatus),
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::db_types::{DocumentType::*, RequestStatus::*};

    #[test]
    fn unpaid_requests_do_not_move() {
        for status in RequestStatus::ALL {
            assert_eq!(compute_next_status(status, false, true), status);
            assert_eq!(compute_next_status(status, false, false), status);
        }
    }

    #[test]
    fn terminal_states_are_absorbing() {
        for status in [Completed, Rejected, Cancelled] {
            for paid in [true, false] {
                for docs in [true, false] {
                    assert_eq!(compute_next_status(status, paid, docs), status);
                }
            }
        }
    }

    #[test]
    fn payment_and_documents_gate_the_status() {
        assert_eq!(compute_next_status(PendingPayment, true, false), PaymentCompleted);
        assert_eq!(compute_next_status(PendingPayment, true, true), InReview);
        assert_eq!(compute_next_status(PaymentCompleted, true, false), PaymentCompleted);
        assert_eq!(compute_next_status(PaymentCompleted, true, true), InReview);
    }

    #[test]
    fn never_moves_backwards() {
        assert_eq!(compute_next_status(DocumentsRequested, true, false), DocumentsRequested);
        assert_eq!(compute_next_status(DocumentsRequested, true, true), InReview);
        assert_eq!(compute_next_status(InReview, true, false), InReview);
        assert_eq!(compute_next_status(Processing, true, true), Processing);
        assert_eq!(compute_next_status(Processing, true, false), Processing);
    }

    #[test]
    fn document_gate() {
        assert!(!required_documents_complete(Vec::<DocumentType>::new()));
        assert!(!required_documents_complete([Identity, BusinessPlan, Other]));
        assert!(required_documents_complete([AddressProof, Identity]));
        assert!(required_documents_complete([Other, Identity, Identity, AddressProof]));
        assert_eq!(missing_required_documents([Identity]), vec![AddressProof]);
        assert_eq!(missing_required_documents([BusinessPlan]), vec![Identity, AddressProof]);
    }

    #[test]
    fn overrides() {
        assert_eq!(check_override(InReview, InReview), Err(OverrideRejection::NoOp));
        assert_eq!(check_override(Completed, Processing), Err(OverrideRejection::Terminal(Completed)));
        assert_eq!(check_override(Cancelled, Cancelled), Err(OverrideRejection::NoOp));
        assert!(check_override(InReview, DocumentsRequested).is_ok());
        assert!(check_override(Processing, Completed).is_ok());
        assert!(check_override(PendingPayment, Rejected).is_ok());
    }
}
