//! Admin login nonce broker
//!
//! Short-lived, single-use verification tickets binding the out-of-band
//! confirmation action to one login attempt. Each nonce moves through
//! `Pending -> Verified -> consumed`; entries older than the configured
//! TTL are swept lazily on every access, so an unverified (or verified
//! but never exchanged) nonce simply disappears.
//!
//! The clock is injected so expiry is testable without real time passing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Time source for nonce ages
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock used in production
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Nonce errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NonceError {
    /// Unknown, expired, or already consumed nonce
    #[error("nonce not found")]
    NotFound,

    /// Nonce exists but has not been confirmed out-of-band
    #[error("nonce not verified")]
    NotVerified,
}

#[derive(Debug)]
struct NonceEntry {
    created_at: Instant,
    verified: bool,
}

/// Broker for admin login nonces
///
/// All state lives behind a single mutex; every operation sweeps expired
/// entries before touching the map, so each call observes only live
/// nonces.
pub struct NonceBroker {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, NonceEntry>>,
}

impl NonceBroker {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Create a fresh `Pending` nonce and return its id
    ///
    /// The caller is responsible for delivering the verification link to
    /// the administrator's out-of-band channel.
    pub fn request_login(&self) -> String {
        let nonce = format!("n{}", Uuid::new_v4().simple());
        let mut entries = self.entries.lock();
        self.sweep(&mut entries);
        entries.insert(
            nonce.clone(),
            NonceEntry {
                created_at: self.clock.now(),
                verified: false,
            },
        );
        tracing::debug!(nonce = %nonce, "Admin login nonce created");
        nonce
    }

    /// Transition `Pending -> Verified`
    ///
    /// Invoked by the out-of-band confirmation action. Idempotent:
    /// confirming an already-verified nonce is a no-op success.
    pub fn confirm(&self, nonce: &str) -> Result<(), NonceError> {
        let mut entries = self.entries.lock();
        self.sweep(&mut entries);
        let entry = entries.get_mut(nonce).ok_or(NonceError::NotFound)?;
        entry.verified = true;
        Ok(())
    }

    /// Non-mutating poll; returns `false` for unknown nonces
    ///
    /// Never errors, so an expired or never-issued nonce is
    /// indistinguishable from an unverified one.
    pub fn check(&self, nonce: &str) -> bool {
        let mut entries = self.entries.lock();
        self.sweep(&mut entries);
        entries.get(nonce).map(|e| e.verified).unwrap_or(false)
    }

    /// Consume a `Verified` nonce
    ///
    /// Delete-on-read: the entry is removed under the lock, so a nonce
    /// can be exchanged for a token at most once. A `Pending` nonce is
    /// left in place.
    pub fn exchange(&self, nonce: &str) -> Result<(), NonceError> {
        let mut entries = self.entries.lock();
        self.sweep(&mut entries);
        match entries.get(nonce) {
            None => Err(NonceError::NotFound),
            Some(entry) if !entry.verified => Err(NonceError::NotVerified),
            Some(_) => {
                entries.remove(nonce);
                tracing::info!(nonce = %nonce, "Admin login nonce exchanged");
                Ok(())
            }
        }
    }

    fn sweep(&self, entries: &mut HashMap<String, NonceEntry>) {
        let now = self.clock.now();
        entries.retain(|_, e| now.duration_since(e.created_at) < self.ttl);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Manually advanced clock
    struct TestClock {
        now: Mutex<Instant>,
    }

    impl TestClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Instant::now()),
            }
        }

        fn advance(&self, by: Duration) {
            *self.now.lock() += by;
        }
    }

    impl Clock for TestClock {
        fn now(&self) -> Instant {
            *self.now.lock()
        }
    }

    fn broker() -> (Arc<TestClock>, NonceBroker) {
        let clock = Arc::new(TestClock::new());
        let broker = NonceBroker::with_clock(Duration::from_secs(300), clock.clone());
        (clock, broker)
    }

    #[test]
    fn handshake_happy_path() {
        let (_clock, broker) = broker();
        let nonce = broker.request_login();

        assert!(!broker.check(&nonce));
        broker.confirm(&nonce).unwrap();
        assert!(broker.check(&nonce));
        broker.exchange(&nonce).unwrap();
    }

    #[test]
    fn exchange_is_single_use() {
        let (_clock, broker) = broker();
        let nonce = broker.request_login();
        broker.confirm(&nonce).unwrap();

        assert_eq!(broker.exchange(&nonce), Ok(()));
        assert_eq!(broker.exchange(&nonce), Err(NonceError::NotFound));
        assert!(!broker.check(&nonce));
    }

    #[test]
    fn pending_nonce_cannot_be_exchanged() {
        let (_clock, broker) = broker();
        let nonce = broker.request_login();

        assert_eq!(broker.exchange(&nonce), Err(NonceError::NotVerified));
        // Still pending, not consumed
        broker.confirm(&nonce).unwrap();
        assert_eq!(broker.exchange(&nonce), Ok(()));
    }

    #[test]
    fn confirm_is_idempotent() {
        let (_clock, broker) = broker();
        let nonce = broker.request_login();

        broker.confirm(&nonce).unwrap();
        broker.confirm(&nonce).unwrap();
        assert!(broker.check(&nonce));
    }

    #[test]
    fn unknown_nonce_is_not_revealed() {
        let (_clock, broker) = broker();
        assert!(!broker.check("n-does-not-exist"));
        assert_eq!(broker.confirm("n-does-not-exist"), Err(NonceError::NotFound));
        assert_eq!(broker.exchange("n-does-not-exist"), Err(NonceError::NotFound));
    }

    #[test]
    fn pending_nonce_expires() {
        let (clock, broker) = broker();
        let nonce = broker.request_login();

        clock.advance(Duration::from_secs(301));
        assert_eq!(broker.confirm(&nonce), Err(NonceError::NotFound));
    }

    #[test]
    fn verified_nonce_expires_too() {
        let (clock, broker) = broker();
        let nonce = broker.request_login();
        broker.confirm(&nonce).unwrap();

        clock.advance(Duration::from_secs(301));
        assert!(!broker.check(&nonce));
        assert_eq!(broker.exchange(&nonce), Err(NonceError::NotFound));
    }

    #[test]
    fn concurrent_exchange_single_winner() {
        let broker = Arc::new(NonceBroker::new(Duration::from_secs(300)));
        let nonce = broker.request_login();
        broker.confirm(&nonce).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let broker = broker.clone();
                let nonce = nonce.clone();
                std::thread::spawn(move || broker.exchange(&nonce).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
    }

    #[test]
    fn nonce_ids_are_unique() {
        let (_clock, broker) = broker();
        let a = broker.request_login();
        let b = broker.request_login();
        assert_ne!(a, b);
    }
}
