use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::event::{EventListener, SmsEvent, SMS_RECEIVED};

/// A named event as seen by subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    pub name: String,
    pub payload: SmsEvent,
}

/// In-process event emitter on the runtime side of the bridge.
///
/// Uses a broadcast channel so any number of subscribers see every event.
/// Emitting never blocks; slow subscribers lag instead.
pub struct EventEmitter {
    tx: broadcast::Sender<EmittedEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Arc<Self> {
        let (tx, _) = broadcast::channel(capacity);
        Arc::new(Self { tx })
    }

    /// Subscribe to every event name
    pub fn subscribe(&self) -> broadcast::Receiver<EmittedEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Call `callback` for each `SMS_RECEIVED` event until the subscription
    /// is removed or the emitter is dropped. Must be called inside a tokio
    /// runtime.
    pub fn listen_incoming_sms<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(SmsEvent) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();

        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) if event.name == SMS_RECEIVED => callback(event.payload),
                    Ok(event) => debug!(name = %event.name, "Ignoring event"),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "SMS subscriber lagged, events lost");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });

        Subscription { handle }
    }
}

impl EventListener for EventEmitter {
    fn emit(&self, event_name: &str, event: &SmsEvent) {
        let emitted = EmittedEvent {
            name: event_name.to_string(),
            payload: event.clone(),
        };
        // No subscribers is not an error
        if self.tx.send(emitted).is_err() {
            debug!(name = event_name, "No subscribers for event");
        }
    }
}

/// Handle returned by [`EventEmitter::listen_incoming_sms`].
#[must_use = "dropping a Subscription leaves the listener running"]
pub struct Subscription {
    handle: JoinHandle<()>,
}

impl Subscription {
    /// Stop listening
    pub fn remove(self) {
        self.handle.abort();
    }

    /// Wait until the emitter is gone and every pending event was handled.
    pub async fn closed(self) {
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                error!("SMS subscriber panicked: {}", e);
            }
        }
    }
}
