//! Frame pacing: skip redraws when nothing visible changed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Decides per loop iteration whether a new frame is worth drawing.
#[derive(Debug, Clone)]
pub struct RenderThrottle {
    /// Redraw at least this often even when idle (resizes, cue expiry).
    heartbeat_ms: u64,
    last: Option<(u64, u64)>,
}

impl RenderThrottle {
    pub fn new(heartbeat_ms: u64) -> Self {
        Self {
            heartbeat_ms,
            last: None,
        }
    }

    /// `key` fingerprints everything the frame depends on; `animating` is true
    /// while deferred work (reveal delay, shake, win flash) is still queued.
    ///
    /// Animating frames always draw. Otherwise a frame draws when the key
    /// changed or the heartbeat elapsed.
    pub fn should_render(&mut self, now_ms: u64, key: u64, animating: bool) -> bool {
        let draw = match self.last {
            None => true,
            Some(_) if animating => true,
            Some((_, last_key)) if last_key != key => true,
            Some((last_ms, _)) => now_ms.saturating_sub(last_ms) >= self.heartbeat_ms,
        };
        if draw {
            self.last = Some((now_ms, key));
        }
        draw
    }

    /// Force the next call to draw.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Hash any frame inputs into a throttle key.
pub fn frame_key<T: Hash + ?Sized>(parts: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    parts.hash(&mut hasher);
    hasher.finish()
}
