use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

type InvalidationCallback = Box<dyn Fn() + Send + Sync>;

/// Owns the bearer token for the lifetime of the process. The first 401
/// from any endpoint evicts the token and fires the registered callback
/// exactly once; every later request fails fast as unauthenticated.
pub struct Session {
    token: Mutex<Option<String>>,
    expired: AtomicBool,
    on_invalidated: Mutex<Option<InvalidationCallback>>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            token: Mutex::new(None),
            expired: AtomicBool::new(false),
            on_invalidated: Mutex::new(None),
        }
    }

    pub fn set_token(&self, token: String) {
        *self.token.lock().unwrap() = Some(token);
        self.expired.store(false, Ordering::Relaxed);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.lock().unwrap().is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.expired.load(Ordering::Relaxed)
    }

    pub fn on_invalidated(&self, callback: impl Fn() + Send + Sync + 'static) {
        *self.on_invalidated.lock().unwrap() = Some(Box::new(callback));
    }

    pub fn invalidate(&self) {
        let had_token = self.token.lock().unwrap().take().is_some();
        if !had_token {
            return;
        }
        self.expired.store(true, Ordering::Relaxed);
        if let Some(callback) = self.on_invalidated.lock().unwrap().as_ref() {
            callback();
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    use super::*;

    #[test]
    fn invalidation_fires_the_callback_once() {
        let session = Session::new();
        let fired = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&fired);
        session.on_invalidated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        session.set_token("abc".to_string());
        session.invalidate();
        session.invalidate();

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!session.is_authenticated());
        assert!(session.is_expired());
    }

    #[test]
    fn invalidating_without_a_token_is_a_no_op() {
        let session = Session::new();
        session.invalidate();
        assert!(!session.is_expired());
    }
}
