//! SMS broadcast to event bridge.
//!
//! Decodes the PDUs of an incoming SMS broadcast, folds them into one
//! [`SmsEvent`] and hands it to whichever [`EventListener`] is attached.

pub mod bridge;
pub mod broadcast;
pub mod config;
pub mod event;
pub mod pdu;
pub mod receiver;

pub use bridge::{BridgeContext, EventEmitter, JsonLinesListener, Subscription};
pub use broadcast::IncomingBroadcast;
pub use config::{Config, DecodeFailurePolicy};
pub use event::{EventListener, SmsEvent, SMS_RECEIVED};
pub use receiver::SmsReceiver;
