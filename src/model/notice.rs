//! Transient notifications shown to the player for a limited time.

use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    CapacityExceeded,
    Deposited,
    NothingToDeposit,
}

impl NoticeKind {
    pub fn message(self) -> &'static str {
        match self {
            NoticeKind::CapacityExceeded => "Backpack full! Maximum weight reached.",
            NoticeKind::Deposited => "Gems deposited successfully.",
            NoticeKind::NothingToDeposit => "No gems to deposit.",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub posted_at: Instant,
    pub expires_at: Instant,
}

impl Notice {
    pub fn new(kind: NoticeKind, posted_at: Instant, duration: Duration) -> Self {
        Self {
            kind,
            posted_at,
            expires_at: posted_at + duration,
        }
    }

    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_until_expiry() {
        let now = Instant::now();
        let notice = Notice::new(NoticeKind::Deposited, now, Duration::from_secs(2));
        assert!(notice.is_visible(now));
        assert!(notice.is_visible(now + Duration::from_millis(1_999)));
        assert!(!notice.is_visible(now + Duration::from_secs(2)));
        assert_eq!(notice.message(), "Gems deposited successfully.");
    }
}
