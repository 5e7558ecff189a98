//! Sliding-window flood detector.
//!
//! Keeps recent message timestamps per (chat, user) in memory. State is lost
//! on restart, which only delays detection by one window.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use super::model::FloodSettings;

type WindowKey = (i64, u64); // (chat_id, user_id)

/// Result of recording one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloodCheck {
    pub within_limit: bool,
    /// Messages counted in the current window, including this one.
    pub count: usize,
}

impl FloodCheck {
    fn allowed() -> Self {
        Self {
            within_limit: true,
            count: 0,
        }
    }
}

/// Per-user rolling windows. Cloning shares the same state.
#[derive(Clone, Default)]
pub struct FloodDetector {
    windows: Arc<DashMap<WindowKey, VecDeque<Instant>>>,
}

impl FloodDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message at `now` and check it against the tenant's limit.
    ///
    /// Disabled tenants are not tracked at all. A trip clears the user's
    /// window so the penalty is applied once per burst.
    pub fn check(&self, chat_id: i64, user_id: u64, now: Instant, settings: &FloodSettings) -> FloodCheck {
        if !settings.enabled {
            return FloodCheck::allowed();
        }

        let window = Duration::from_secs(u64::from(settings.window_secs));

        // The entry guard holds the shard lock, serializing same-key updates.
        let mut times = self.windows.entry((chat_id, user_id)).or_default();

        while let Some(&oldest) = times.front() {
            if now.saturating_duration_since(oldest) >= window {
                times.pop_front();
            } else {
                break;
            }
        }

        times.push_back(now);
        let count = times.len();
        let flooding = count > settings.max_messages as usize;

        if flooding {
            debug!(
                "User {} tripped flood limit in chat {} ({} > {} in {}s)",
                user_id, chat_id, count, settings.max_messages, settings.window_secs
            );
            times.clear();
        }

        FloodCheck {
            within_limit: !flooding,
            count,
        }
    }

    /// Remove windows whose newest message is older than `idle`.
    pub fn prune_idle(&self, now: Instant, idle: Duration) -> usize {
        let before = self.windows.len();
        self.windows.retain(|_, times| {
            times
                .back()
                .is_some_and(|&last| now.saturating_duration_since(last) < idle)
        });
        before.saturating_sub(self.windows.len())
    }

    /// Messages currently tracked for a user.
    #[cfg(test)]
    pub fn window_len(&self, chat_id: i64, user_id: u64) -> usize {
        self.windows
            .get(&(chat_id, user_id))
            .map(|times| times.len())
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> FloodSettings {
        FloodSettings {
            enabled: true,
            max_messages: 5,
            window_secs: 10,
            mute_secs: 300,
        }
    }

    #[test]
    fn test_sixth_message_within_nine_seconds_trips() {
        let detector = FloodDetector::new();
        let start = Instant::now();
        let offsets_ms = [0, 1_800, 3_600, 5_400, 7_200, 9_000];

        let results: Vec<FloodCheck> = offsets_ms
            .iter()
            .map(|ms| detector.check(-1, 7, start + Duration::from_millis(*ms), &settings()))
            .collect();

        assert!(results[..5].iter().all(|r| r.within_limit));
        assert!(!results[5].within_limit);
        assert_eq!(results[5].count, 6);
    }

    #[test]
    fn test_six_messages_over_eleven_seconds_never_trip() {
        let detector = FloodDetector::new();
        let start = Instant::now();
        let offsets_ms = [0, 2_200, 4_400, 6_600, 8_800, 11_000];

        for ms in offsets_ms {
            let check = detector.check(-1, 7, start + Duration::from_millis(ms), &settings());
            assert!(check.within_limit, "message at {}ms tripped", ms);
        }
        assert_eq!(detector.window_len(-1, 7), 5);
    }

    #[test]
    fn test_disabled_tenant_is_not_tracked() {
        let detector = FloodDetector::new();
        let mut off = settings();
        off.enabled = false;
        let now = Instant::now();

        for _ in 0..20 {
            assert!(detector.check(-1, 7, now, &off).within_limit);
        }
        assert_eq!(detector.window_len(-1, 7), 0);
    }

    #[test]
    fn test_users_and_chats_are_isolated() {
        let detector = FloodDetector::new();
        let now = Instant::now();

        for _ in 0..5 {
            detector.check(-1, 7, now, &settings());
        }
        assert!(detector.check(-1, 8, now, &settings()).within_limit);
        assert!(detector.check(-2, 7, now, &settings()).within_limit);
        assert!(!detector.check(-1, 7, now, &settings()).within_limit);
    }

    #[test]
    fn test_trip_clears_window() {
        let detector = FloodDetector::new();
        let now = Instant::now();

        for _ in 0..6 {
            detector.check(-1, 7, now, &settings());
        }
        assert_eq!(detector.window_len(-1, 7), 0);
        assert!(detector.check(-1, 7, now, &settings()).within_limit);
    }

    #[test]
    fn test_prune_idle_windows() {
        let detector = FloodDetector::new();
        let start = Instant::now();
        detector.check(-1, 7, start, &settings());
        detector.check(-1, 8, start + Duration::from_secs(50), &settings());

        let removed = detector.prune_idle(start + Duration::from_secs(70), Duration::from_secs(60));

        assert_eq!(removed, 1);
        assert_eq!(detector.window_len(-1, 7), 0);
        assert_eq!(detector.window_len(-1, 8), 1);
    }
}
