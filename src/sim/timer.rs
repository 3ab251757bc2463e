//! Cancelable one-shot timers driven by simulation time

use serde::{Deserialize, Serialize};

/// Identifies one scheduled timer so it can be cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CancelToken(u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Deferred<T> {
    token: CancelToken,
    remaining: f32,
    action: T,
}

/// Holds at most one pending action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OneShot<T> {
    pending: Option<Deferred<T>>,
    next_token: u64,
}

impl<T> Default for OneShot<T> {
    fn default() -> Self {
        Self {
            pending: None,
            next_token: 1,
        }
    }
}

impl<T> OneShot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire after `delay` seconds. Any action already
    /// pending is replaced.
    pub fn schedule(&mut self, delay: f32, action: T) -> CancelToken {
        let token = CancelToken(self.next_token);
        self.next_token += 1;
        self.pending = Some(Deferred {
            token,
            remaining: delay.max(0.0),
            action,
        });
        token
    }

    /// Cancel whatever is pending; returns its token
    pub fn cancel_pending(&mut self) -> Option<CancelToken> {
        self.pending.take().map(|d| d.token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn token(&self) -> Option<CancelToken> {
        self.pending.as_ref().map(|d| d.token)
    }

    /// Count down by `dt`; returns the action once its delay has elapsed
    pub fn advance(&mut self, dt: f32) -> Option<T> {
        let deferred = self.pending.as_mut()?;
        deferred.remaining -= dt;
        if deferred.remaining > 0.0 {
            return None;
        }
        self.pending.take().map(|d| d.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_delay() {
        let mut timer = OneShot::new();
        timer.schedule(0.5, "boom");
        assert_eq!(timer.advance(0.25), None);
        assert_eq!(timer.advance(0.25), Some("boom"));
        assert!(!timer.is_pending());
        assert_eq!(timer.advance(1.0), None);
    }

    #[test]
    fn test_cancel_prevents_fire() {
        let mut timer = OneShot::new();
        let token = timer.schedule(0.1, 7);
        assert_eq!(timer.cancel_pending(), Some(token));
        assert_eq!(timer.advance(1.0), None);
    }

    #[test]
    fn test_reschedule_replaces_pending() {
        let mut timer = OneShot::new();
        let old = timer.schedule(0.1, 1);
        let new = timer.schedule(0.1, 2);
        assert_ne!(old, new);
        assert_eq!(timer.token(), Some(new));
        assert_eq!(timer.advance(0.2), Some(2));
        assert_eq!(timer.advance(0.2), None);
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut timer = OneShot::new();
        timer.schedule(0.0, ());
        assert_eq!(timer.advance(0.0), Some(()));
    }

    #[test]
    fn test_cancel_pending() {
        let mut timer = OneShot::new();
        let token = timer.schedule(1.0, ());
        assert_eq!(timer.token(), Some(token));
        assert_eq!(timer.cancel_pending(), Some(token));
        assert_eq!(timer.cancel_pending(), None);
    }
}
