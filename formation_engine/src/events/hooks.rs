use std::{future::Future, pin::Pin, sync::Arc};

use log::*;

use crate::events::{EventHandler, EventProducer, Handler, PaymentRecordedEvent, StatusChangedEvent};

#[derive(Default, Clone)]
pub struct EventProducers {
    pub status_changed_producer: Vec<EventProducer<StatusChangedEvent>>,
    pub payment_recorded_producer: Vec<EventProducer<PaymentRecordedEvent>>,
}

impl EventProducers {
    pub async fn publish_status_changed(&self, event: StatusChangedEvent) {
        for producer in &self.status_changed_producer {
            debug!("📬️ Notifying status change subscribers");
            producer.publish_event(event.clone()).await;
        }
    }

    pub async fn publish_payment_recorded(&self, event: PaymentRecordedEvent) {
        for producer in &self.payment_recorded_producer {
            debug!("📬️ Notifying payment recorded subscribers");
            producer.publish_event(event.clone()).await;
        }
    }
}

pub struct EventHandlers {
    pub on_status_changed: Option<EventHandler<StatusChangedEvent>>,
    pub on_payment_recorded: Option<EventHandler<PaymentRecordedEvent>>,
}

impl EventHandlers {
    pub fn new(buffer_size: usize, hooks: EventHooks) -> Self {
        let on_status_changed = hooks.on_status_changed.map(|f| EventHandler::new(buffer_size, f));
        let on_payment_recorded = hooks.on_payment_recorded.map(|f| EventHandler::new(buffer_size, f));
        Self { on_status_changed, on_payment_recorded }
    }

    pub fn producers(&self) -> EventProducers {
        let mut result = EventProducers::default();
        if let Some(handler) = &self.on_status_changed {
            result.status_changed_producer.push(handler.subscribe());
        }
        if let Some(handler) = &self.on_payment_recorded {
            result.payment_recorded_producer.push(handler.subscribe());
        }
        result
    }

    /// Spawns a task per configured handler. Each one stops once all of its producers have been dropped.
    pub async fn start_handlers(self) {
        if let Some(handler) = self.on_status_changed {
            tokio::spawn(handler.start_handler());
        }
        if let Some(handler) = self.on_payment_recorded {
            tokio::spawn(handler.start_handler());
        }
    }
}

#[derive(Default, Clone)]
pub struct EventHooks {
    pub on_status_changed: Option<Handler<StatusChangedEvent>>,
    pub on_payment_recorded: Option<Handler<PaymentRecordedEvent>>,
}

impl EventHooks {
    pub fn on_status_changed<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(StatusChangedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_status_changed = Some(Arc::new(f));
        self
    }

    pub fn on_payment_recorded<F>(&mut self, f: F) -> &mut Self
    where F: (Fn(PaymentRecordedEvent) -> Pin<Box<dyn Future<Output = ()> + Send>>) + Send + Sync + 'static {
        self.on_payment_recorded = Some(Arc::new(f));
        self
    }
}
