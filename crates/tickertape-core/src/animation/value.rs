//! The single animatable scalar a marquee translates its content by

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Shared, observable animated position
///
/// Cloning yields another handle to the same value. Renderers read it with
/// [`get`](Self::get) or follow it through [`subscribe`](Self::subscribe).
#[derive(Debug, Clone)]
pub struct AnimatedValue {
    tx: Arc<watch::Sender<f64>>,
}

impl Default for AnimatedValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl AnimatedValue {
    pub fn new(initial: f64) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    #[inline]
    pub fn get(&self) -> f64 {
        *self.tx.borrow()
    }

    /// Set the value unconditionally
    pub fn set(&self, value: f64) {
        self.tx.send_replace(value);
    }

    /// Set the value on behalf of a drive, unless that drive was cancelled.
    ///
    /// The cancellation check happens under the value's write lock, so once
    /// a drive's token is cancelled and the owner has reset the value, no
    /// late write from that drive can land. Returns whether the write landed.
    pub fn write(&self, value: f64, drive: &CancellationToken) -> bool {
        self.tx.send_if_modified(|current| {
            if drive.is_cancelled() {
                return false;
            }
            *current = value;
            true
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_value() {
        let value = AnimatedValue::default();
        let other = value.clone();
        value.set(-42.0);
        assert_eq!(other.get(), -42.0);
    }

    #[test]
    fn test_write_rejected_after_cancel() {
        let value = AnimatedValue::default();
        let token = CancellationToken::new();

        assert!(value.write(-10.0, &token));
        token.cancel();
        value.set(0.0);

        assert!(!value.write(-20.0, &token));
        assert_eq!(value.get(), 0.0);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let value = AnimatedValue::default();
        let mut rx = value.subscribe();
        value.set(5.0);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 5.0);
    }
}
