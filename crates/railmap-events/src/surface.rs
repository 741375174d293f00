//! Render-surface resize observation.
//!
//! The canvas reports its measured size every frame; the observer forwards a
//! report to subscribers only when it differs from the previous one, which
//! mirrors how platform resize observers fire. Subscriptions are RAII guards:
//! dropping one unregisters it, so a view that subscribes on activation is
//! unsubscribed on every exit path.

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;
use railmap_core::ViewportSize;
use std::sync::{Arc, Weak};

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscribers: Vec<(u64, Sender<ViewportSize>)>,
    last_reported: Option<ViewportSize>,
}

#[derive(Clone, Default)]
pub struct SurfaceObserver {
    registry: Arc<Mutex<Registry>>,
}

impl SurfaceObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to size changes. The most recent known size, if any, is
    /// delivered immediately as the initial measurement.
    pub fn observe(&self) -> ResizeSubscription {
        let (tx, rx) = unbounded();
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        if let Some(size) = registry.last_reported {
            let _ = tx.send(size);
        }
        registry.subscribers.push((id, tx));
        tracing::debug!(subscription = id, "Surface observer subscribed");

        ResizeSubscription {
            id,
            rx,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Record a measured size. Returns `true` if it was forwarded.
    pub fn report(&self, size: ViewportSize) -> bool {
        let mut registry = self.registry.lock();
        if registry.last_reported == Some(size) {
            return false;
        }
        registry.last_reported = Some(size);
        registry
            .subscribers
            .retain(|(_, tx)| tx.send(size).is_ok());
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().subscribers.len()
    }
}

/// Live subscription handle; unsubscribes on drop.
pub struct ResizeSubscription {
    id: u64,
    rx: Receiver<ViewportSize>,
    registry: Weak<Mutex<Registry>>,
}

impl ResizeSubscription {
    /// All sizes reported since the last call, oldest first.
    pub fn drain(&self) -> Vec<ViewportSize> {
        self.rx.try_iter().collect()
    }
}

impl Drop for ResizeSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().subscribers.retain(|(id, _)| *id != self.id);
            tracing::debug!(subscription = self.id, "Surface observer unsubscribed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_receives_changes_only() {
        let observer = SurfaceObserver::new();
        let subscription = observer.observe();

        assert!(observer.report(ViewportSize::new(800.0, 600.0)));
        assert!(!observer.report(ViewportSize::new(800.0, 600.0)));
        assert!(observer.report(ViewportSize::new(1200.0, 900.0)));

        let sizes = subscription.drain();
        assert_eq!(
            sizes,
            vec![ViewportSize::new(800.0, 600.0), ViewportSize::new(1200.0, 900.0)]
        );
        assert!(subscription.drain().is_empty());
    }

    #[test]
    fn test_late_subscriber_gets_initial_measurement() {
        let observer = SurfaceObserver::new();
        observer.report(ViewportSize::new(1024.0, 768.0));

        let subscription = observer.observe();
        assert_eq!(subscription.drain(), vec![ViewportSize::new(1024.0, 768.0)]);
    }

    #[test]
    fn test_drop_unsubscribes_symmetrically() {
        let observer = SurfaceObserver::new();
        for _ in 0..5 {
            let first = observer.observe();
            let second = observer.observe();
            assert_eq!(observer.subscriber_count(), 2);
            drop(first);
            assert_eq!(observer.subscriber_count(), 1);
            drop(second);
        }
        assert_eq!(observer.subscriber_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_observer_is_harmless() {
        let observer = SurfaceObserver::new();
        let subscription = observer.observe();
        drop(observer);
        assert!(subscription.drain().is_empty());
        drop(subscription);
    }
}
