use crate::client::SubmitError;
use std::time::{Duration, Instant};

pub const STATUS_TTL: Duration = Duration::from_millis(5000);
pub const FADE_DURATION: Duration = Duration::from_millis(300);
pub const SUCCESS_TEXT: &str =
    "Message sent successfully! You should receive a confirmation email shortly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerPhase {
    Visible,
    Fading,
    Removed,
}

/// A transient message shown above the contact form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub text: String,
    pub kind: StatusKind,
    pub ttl: Duration,
}

impl StatusBanner {
    pub fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: StatusKind::Success,
            ttl: STATUS_TTL,
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: StatusKind::Error,
            ttl: STATUS_TTL,
        }
    }

    pub fn for_result(result: &Result<(), SubmitError>) -> Self {
        match result {
            Ok(()) => Self::success(SUCCESS_TEXT),
            Err(e) => Self::error(&e.user_message()),
        }
    }

    pub fn phase(&self, elapsed: Duration) -> BannerPhase {
        if elapsed < self.ttl {
            BannerPhase::Visible
        } else if elapsed < self.ttl + FADE_DURATION {
            BannerPhase::Fading
        } else {
            BannerPhase::Removed
        }
    }
}

/// Holds the one banner a form displays at a time.
#[derive(Debug, Default)]
pub struct StatusSlot {
    current: Option<(StatusBanner, Instant)>,
}

impl StatusSlot {
    /// Replaces whatever banner is showing and returns it.
    pub fn show(&mut self, banner: StatusBanner, now: Instant) -> Option<StatusBanner> {
        self.current
            .replace((banner, now))
            .map(|(previous, _)| previous)
    }

    pub fn current(&mut self, now: Instant) -> Option<(&StatusBanner, BannerPhase)> {
        let phase = match &self.current {
            Some((banner, shown_at)) => banner.phase(now.saturating_duration_since(*shown_at)),
            None => return None,
        };
        if phase == BannerPhase::Removed {
            self.current = None;
            return None;
        }
        self.current.as_ref().map(|(banner, _)| (banner, phase))
    }
}
