use serde::{Deserialize, Serialize};

/// Event name delivered to listeners for every normalized broadcast.
pub const SMS_RECEIVED: &str = "SMS_RECEIVED";

/// The normalized payload handed to listeners
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsEvent {
    /// Bodies of every decoded PDU, concatenated in delivery order
    pub body: String,
    /// Last non-null originating address, or empty
    pub address: String,
    /// Service centre timestamp of the last decoded PDU, ms since epoch
    pub timestamp: i64,
}

/// Capability for delivering events into the hosting runtime.
///
/// Implementations are called synchronously from the broadcast callback and
/// must not block.
pub trait EventListener: Send + Sync {
    fn emit(&self, event_name: &str, event: &SmsEvent);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::{EventListener, SmsEvent};

    /// Listener that records every emission.
    #[derive(Default)]
    pub struct RecordingListener {
        pub events: Mutex<Vec<(String, SmsEvent)>>,
    }

    impl RecordingListener {
        pub fn emitted(&self) -> Vec<(String, SmsEvent)> {
            self.events.lock().unwrap().clone()
        }
    }

    impl EventListener for RecordingListener {
        fn emit(&self, event_name: &str, event: &SmsEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event_name.to_string(), event.clone()));
        }
    }
}
