pub mod emitter;
pub mod json_lines;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::event::EventListener;

pub use emitter::{EmittedEvent, EventEmitter, Subscription};
pub use json_lines::JsonLinesListener;

/// Slot for the listener of the hosting runtime.
///
/// Empty until the runtime attaches itself, and again after it detaches.
/// Broadcasts handled while empty are dropped.
#[derive(Default)]
pub struct BridgeContext {
    listener: RwLock<Option<Arc<dyn EventListener>>>,
}

impl BridgeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a listener, returning the one it replaces.
    pub fn attach(&self, listener: Arc<dyn EventListener>) -> Option<Arc<dyn EventListener>> {
        let mut slot = self
            .listener
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let previous = slot.replace(listener);
        info!(replaced = previous.is_some(), "Bridge listener attached");
        previous
    }

    pub fn detach(&self) -> Option<Arc<dyn EventListener>> {
        let previous = self
            .listener
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("Bridge listener detached");
        }
        previous
    }

    pub fn current(&self) -> Option<Arc<dyn EventListener>> {
        self.listener
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_attached(&self) -> bool {
        self.listener
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for BridgeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeContext")
            .field("attached", &self.is_attached())
            .finish()
    }
}
