//! Subscription tokens.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

/// Something a token can detach itself from.
pub(crate) trait Registry: Send + Sync {
    fn release(&self, registrant_id: u64);
}

/// Handle to one listener's subscription.
///
/// Closing the token stops delivery to its listener, including notifications
/// already queued on the listener's dispatcher. When the last token of a
/// directory closes, the directory stops observing its feed. Dropping the
/// token closes it.
pub struct SubscriptionToken {
    registrant_id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<dyn Registry>,
}

impl SubscriptionToken {
    pub(crate) fn new(registrant_id: u64, active: Arc<AtomicBool>, registry: Weak<dyn Registry>) -> Self {
        Self {
            registrant_id,
            active,
            registry,
        }
    }

    /// Cancel the subscription.
    ///
    /// Idempotent and safe to call from any thread; only the first call has
    /// an effect.
    pub fn close(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(registry) = self.registry.upgrade() {
                registry.release(self.registrant_id);
            }
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for SubscriptionToken {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for SubscriptionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionToken")
            .field("registrant_id", &self.registrant_id)
            .field("active", &self.is_active())
            .finish()
    }
}
