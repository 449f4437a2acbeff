//! Turns an SMS broadcast into a single `SMS_RECEIVED` event.
//!
//! Delivery is best-effort and at-most-once. With no listener attached the
//! event is dropped; nothing is queued or retried.

use tracing::{debug, info_span, warn};

use crate::bridge::BridgeContext;
use crate::broadcast::IncomingBroadcast;
use crate::config::{DecodeFailurePolicy, ReceiverConfig};
use crate::event::{EventListener, SmsEvent, SMS_RECEIVED};
use crate::pdu::{self, PduError, PduFormat};

/// Stateless adapter from broadcasts to listener events.
#[derive(Debug, Clone, Default)]
pub struct SmsReceiver {
    policy: DecodeFailurePolicy,
    default_format: PduFormat,
}

impl SmsReceiver {
    pub fn new(policy: DecodeFailurePolicy, default_format: PduFormat) -> Self {
        Self {
            policy,
            default_format,
        }
    }

    pub fn from_config(config: &ReceiverConfig) -> Self {
        Self::new(config.decode_failure, config.default_format)
    }

    /// Decode and fold a broadcast into one event.
    ///
    /// Returns `Ok(None)` when there is nothing to report: no PDU list, an
    /// empty one, or (under [`DecodeFailurePolicy::Skip`]) no PDU that decoded.
    pub fn normalize(&self, payload: &IncomingBroadcast) -> Result<Option<SmsEvent>, PduError> {
        let pdus = match payload.pdus.as_deref() {
            Some(pdus) if !pdus.is_empty() => pdus,
            _ => return Ok(None),
        };

        let format = match payload.format.as_deref() {
            Some(tag) => tag.parse::<PduFormat>(),
            None => Ok(self.default_format),
        };

        let mut body = String::new();
        let mut address: Option<String> = None;
        let mut timestamp: Option<i64> = None;

        for (index, raw) in pdus.iter().enumerate() {
            let decoded = format.clone().and_then(|format| pdu::decode(raw, format));
            let sms = match decoded {
                Ok(sms) => sms,
                Err(e) => match self.policy {
                    DecodeFailurePolicy::Skip => {
                        warn!(index, error = %e, "Skipping undecodable PDU");
                        continue;
                    }
                    DecodeFailurePolicy::FailBatch => return Err(e),
                },
            };

            debug!(
                index,
                encoding = ?sms.encoding,
                concat = ?sms.concat,
                "Decoded PDU"
            );

            if let Some(text) = &sms.body {
                body.push_str(text);
            }
            if sms.originating_address.is_some() {
                address = sms.originating_address;
            }
            timestamp = Some(sms.timestamp_millis);
        }

        Ok(timestamp.map(|timestamp| SmsEvent {
            body,
            address: address.unwrap_or_default(),
            timestamp,
        }))
    }

    /// Handle one broadcast. The only effect is an emission on `listener`,
    /// or nothing.
    pub fn on_sms_broadcast(
        &self,
        payload: &IncomingBroadcast,
        listener: Option<&dyn EventListener>,
    ) {
        let span = info_span!("sms_broadcast", id = %uuid::Uuid::new_v4());
        let _guard = span.enter();

        let event = match self.normalize(payload) {
            Ok(Some(event)) => event,
            Ok(None) => {
                debug!("Broadcast carried nothing to deliver");
                return;
            }
            Err(e) => {
                warn!(error = %e, "Dropping broadcast after decode failure");
                return;
            }
        };

        match listener {
            Some(listener) => {
                debug!(address = %event.address, "Emitting {}", SMS_RECEIVED);
                listener.emit(SMS_RECEIVED, &event);
            }
            None => debug!("No listener attached, dropping {}", SMS_RECEIVED),
        }
    }

    /// Handle one broadcast against whatever listener `context` holds right now.
    pub fn on_broadcast(&self, payload: &IncomingBroadcast, context: &BridgeContext) {
        let listener = context.current();
        self.on_sms_broadcast(payload, listener.as_deref());
    }
}
