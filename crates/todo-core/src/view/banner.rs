//! Transient status banners

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerKind {
    Success,
    Error,
}

/// A message that clears itself after `ttl`
#[derive(Debug, Clone)]
pub struct Banner {
    pub message: String,
    pub kind: BannerKind,
    shown_at: Instant,
    ttl: Duration,
}

impl Banner {
    pub fn new(message: impl Into<String>, kind: BannerKind, ttl: Duration) -> Self {
        Self::shown_at(message, kind, ttl, Instant::now())
    }

    pub fn shown_at(
        message: impl Into<String>,
        kind: BannerKind,
        ttl: Duration,
        shown_at: Instant,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at,
            ttl,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == BannerKind::Error
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry() {
        let start = Instant::now();
        let banner = Banner::shown_at("Todo created", BannerKind::Success, Duration::from_secs(3), start);

        assert!(!banner.is_expired(start));
        assert!(!banner.is_expired(start + Duration::from_millis(2999)));
        assert!(banner.is_expired(start + Duration::from_secs(3)));
        assert!(!banner.is_error());
    }
}
