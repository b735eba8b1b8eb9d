use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};

/// Process-local keyed throttle: at most one permit per key per interval.
///
/// Backs the per-network notification rate limit and the 24 h alert dedup.
/// State is lost on restart; worst case one duplicate notification, which
/// is the documented trade-off.
pub struct Throttle {
    last_sent: Mutex<HashMap<String, DateTime<Utc>>>,
    /// Entries older than this are evicted opportunistically.
    retention: Duration,
}

impl Throttle {
    pub fn new() -> Self {
        Self {
            last_sent: Mutex::new(HashMap::new()),
            retention: Duration::hours(48),
        }
    }

    /// Returns true and records `now` if the key is outside its interval.
    pub fn allow(&self, key: &str, interval: Duration) -> bool {
        self.allow_at(key, interval, Utc::now())
    }

    /// Clock-injected variant for tests.
    pub fn allow_at(&self, key: &str, interval: Duration, now: DateTime<Utc>) -> bool {
        let mut map = self.last_sent.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(last) = map.get(key) {
            if now - *last < interval {
                return false;
            }
        }
        map.insert(key.to_string(), now);
        let retention = self.retention;
        map.retain(|_, t| now - *t <= retention);
        true
    }

    /// Drop a key so the next `allow` succeeds immediately.
    pub fn clear(&self, key: &str) {
        let mut map = self.last_sent.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new()
    }
}

/// Throttle key helper: "kind:entity" ("down:example.com", "net:abc123").
pub fn throttle_key(kind: &str, entity: &str) -> String {
    format!("{kind}:{entity}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_permit_allowed_then_blocked() {
        let t = Throttle::new();
        let now = Utc::now();
        assert!(t.allow_at("down:a.com", Duration::hours(24), now));
        assert!(!t.allow_at("down:a.com", Duration::hours(24), now + Duration::seconds(10)));
    }

    #[test]
    fn permit_after_interval() {
        let t = Throttle::new();
        let now = Utc::now();
        assert!(t.allow_at("k", Duration::seconds(60), now));
        assert!(t.allow_at("k", Duration::seconds(60), now + Duration::seconds(61)));
    }

    #[test]
    fn keys_are_independent() {
        let t = Throttle::new();
        let now = Utc::now();
        assert!(t.allow_at("down:a.com", Duration::hours(24), now));
        assert!(t.allow_at("down:b.com", Duration::hours(24), now));
        assert!(t.allow_at("soft_blocked:a.com", Duration::hours(24), now));
    }

    #[test]
    fn stale_entries_are_evicted() {
        let t = Throttle::new();
        let now = Utc::now();
        assert!(t.allow_at("old", Duration::hours(24), now));
        // 72h later the old entry is past retention and gets dropped.
        assert!(t.allow_at("other", Duration::hours(24), now + Duration::hours(72)));
        let map = t.last_sent.lock().unwrap();
        assert!(!map.contains_key("old"));
    }

    #[test]
    fn clear_resets_a_key() {
        let t = Throttle::new();
        let now = Utc::now();
        assert!(t.allow_at("k", Duration::hours(24), now));
        t.clear("k");
        assert!(t.allow_at("k", Duration::hours(24), now));
    }
}
