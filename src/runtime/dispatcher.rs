use crate::logging::{LogLevel, SdpLogger};
use crate::types::{SdpEvent, Status};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;

/// The caller's event sink.
pub type SdpCallback = Arc<dyn Fn(&SdpEvent) + Send + Sync>;

/// Holds the single callback registration and delivers events through it.
///
/// Lifecycle: no registration until [`Dispatcher::enable`]; a later `enable`
/// rebinds (replaces) the registration when rebinding is allowed, otherwise
/// it is refused with `Busy`. [`Dispatcher::reset`] clears it on shutdown.
pub struct Dispatcher {
    callback: RwLock<Option<SdpCallback>>,
    allow_rebind: bool,
    logger: Arc<dyn SdpLogger>,
}

impl Dispatcher {
    pub fn new(allow_rebind: bool, logger: Arc<dyn SdpLogger>) -> Self {
        Dispatcher {
            callback: RwLock::new(None),
            allow_rebind,
            logger,
        }
    }

    /// Install `callback`, then send it `Enabled`.
    ///
    /// The registration is visible before `Enabled` is delivered, so the
    /// callback may issue requests from its `Enabled` handler. The flip side:
    /// on a rebind, a completion signalled concurrently from another thread
    /// can reach the new callback ahead of its `Enabled` event.
    pub fn enable(&self, callback: SdpCallback) -> Status {
        let rebound = {
            let mut slot = self.callback.write().unwrap_or_else(PoisonError::into_inner);
            let rebound = slot.is_some();
            if rebound && !self.allow_rebind {
                self.logger.log(LogLevel::Warn, "Dispatcher", "Enable refused: callback already registered");
                return Status::Busy;
            }
            *slot = Some(Arc::clone(&callback));
            rebound
        };

        let msg = if rebound { "Callback rebound" } else { "Callback registered" };
        self.logger.log(LogLevel::Info, "Dispatcher", msg);

        callback(&SdpEvent::Enabled { status: Status::Success });
        Status::Success
    }

    pub fn is_enabled(&self) -> bool {
        self.callback.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Deliver an event to the registered callback. The registration lock is
    /// not held during the call, so the callback may re-enter the service.
    /// Returns false if nothing is registered.
    pub fn deliver(&self, event: &SdpEvent) -> bool {
        let callback = self.callback.read().unwrap_or_else(PoisonError::into_inner).clone();
        match callback {
            Some(cb) => {
                cb(event);
                true
            }
            None => {
                self.logger.log(
                    LogLevel::Warn,
                    "Dispatcher",
                    &format!("Dropping {:?} event: no callback registered", event.kind()),
                );
                false
            }
        }
    }

    pub fn reset(&self) {
        let previous = self.callback.write().unwrap_or_else(PoisonError::into_inner).take();
        if previous.is_some() {
            self.logger.log(LogLevel::Info, "Dispatcher", "Callback registration cleared");
        }
    }
}

/// Callback that forwards a copy of every event into an unbounded channel,
/// for callers that want to `await` completions.
pub fn event_channel() -> (SdpCallback, mpsc::UnboundedReceiver<SdpEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let callback: SdpCallback = Arc::new(move |event: &SdpEvent| {
        let _ = tx.send(event.clone());
    });
    (callback, rx)
}
