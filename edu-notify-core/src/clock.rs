//! Time source and record id generation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use crate::model::RecordId;

/// Source of "now" for record timestamps and relative-time formatting.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }

    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Process-wide sequence shared by every generator so ids never repeat,
/// even across stores.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Prefix distinguishing notification ids from message ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPrefix {
    Notification,
    Message,
}

impl IdPrefix {
    fn as_str(self) -> &'static str {
        match self {
            IdPrefix::Notification => "n",
            IdPrefix::Message => "m",
        }
    }
}

/// Generate `<prefix>_<unix-millis>_<sequence-base36>`.
pub fn next_id(prefix: IdPrefix, now: DateTime<Utc>) -> RecordId {
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    RecordId::new(format!(
        "{}_{}_{}",
        prefix.as_str(),
        now.timestamp_millis(),
        to_base36(seq)
    ))
}

fn to_base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_ids_unique_at_same_instant() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let ids: HashSet<_> = (0..1000)
            .map(|_| next_id(IdPrefix::Notification, now))
            .collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_id_shape() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let id = next_id(IdPrefix::Message, now);
        let parts: Vec<_> = id.as_str().split('_').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "m");
        assert_eq!(parts[1], now.timestamp_millis().to_string());
    }

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let other = clock.clone();

        clock.advance(Duration::minutes(5));
        assert_eq!(other.now(), start + Duration::minutes(5));
    }
}
