//! Notification hooks for engine events.
//!
//! Delivering emails or chat messages is somebody else's job. These hooks are the seam where such a collaborator
//! would be attached; for now they write a structured log line for every payment and status change, which is what
//! operations staff watch.
use formation_engine::events::{EventHandlers, EventHooks, PaymentRecordedEvent, StatusChangedEvent};
use futures::future::BoxFuture;
use log::*;

pub const NOTIFICATION_EVENT_BUFFER_SIZE: usize = 25;

pub fn create_notification_handlers() -> EventHandlers {
    let mut hooks = EventHooks::default();
    hooks.on_status_changed(|ev| {
        log_status_change(&ev);
        no_op()
    });
    hooks.on_payment_recorded(|ev| {
        log_payment(&ev);
        no_op()
    });
    EventHandlers::new(NOTIFICATION_EVENT_BUFFER_SIZE, hooks)
}

fn log_status_change(ev: &StatusChangedEvent) {
    info!(
        "📬️ Formation request {} for {} moved from {} to {}. Reason: {}",
        ev.request.id,
        ev.request.company_name,
        ev.old_status,
        ev.new_status(),
        ev.reason
    );
}

fn log_payment(ev: &PaymentRecordedEvent) {
    let PaymentRecordedEvent { request, snapshot } = ev;
    let test_marker = if snapshot.is_test_order { " (TEST ORDER)" } else { "" };
    info!(
        "📬️ Payment recorded for formation request {}: order {} for {} {}{test_marker}",
        request.id, snapshot.order_number, snapshot.total_price, snapshot.currency
    );
}

fn no_op() -> BoxFuture<'static, ()> {
    Box::pin(async {})
}
