use super::Severity;
use std::time::{Duration, Instant};

/// Time a toast spends fading before it is dropped.
pub const FADE_DURATION: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Fading,
    Gone,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub severity: Severity,
    pub title: String,
    pub subtitle: Option<String>,
    fade_at: Instant,
}

impl Toast {
    pub fn phase(&self, now: Instant) -> ToastPhase {
        if now < self.fade_at {
            ToastPhase::Visible
        } else if now < self.fade_at + FADE_DURATION {
            ToastPhase::Fading
        } else {
            ToastPhase::Gone
        }
    }

    /// 1.0 while visible, linear down to 0.0 across the fade.
    pub fn opacity(&self, now: Instant) -> f32 {
        match self.phase(now) {
            ToastPhase::Visible => 1.0,
            ToastPhase::Fading => {
                let faded = now.duration_since(self.fade_at).as_secs_f32();
                (1.0 - faded / FADE_DURATION.as_secs_f32()).clamp(0.0, 1.0)
            }
            ToastPhase::Gone => 0.0,
        }
    }
}

/// Stack of notifications. Pushing never dedupes.
#[derive(Debug)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
    next_id: u64,
    duration: Duration,
    error_duration: Duration,
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(Duration::from_secs(3), Duration::from_secs(5))
    }
}

impl ToastQueue {
    pub fn new(duration: Duration, error_duration: Duration) -> Self {
        Self {
            toasts: Vec::new(),
            next_id: 0,
            duration,
            error_duration,
        }
    }

    pub fn push(
        &mut self,
        severity: Severity,
        title: impl Into<String>,
        subtitle: Option<String>,
        now: Instant,
    ) -> u64 {
        let lifetime = match severity {
            Severity::Error => self.error_duration,
            _ => self.duration,
        };
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            severity,
            title: title.into(),
            subtitle,
            fade_at: now + lifetime,
        });
        id
    }

    pub fn info(&mut self, title: impl Into<String>, now: Instant) -> u64 {
        self.push(Severity::Info, title, None, now)
    }

    pub fn success(&mut self, title: impl Into<String>, now: Instant) -> u64 {
        self.push(Severity::Success, title, None, now)
    }

    pub fn warning(&mut self, title: impl Into<String>, now: Instant) -> u64 {
        self.push(Severity::Warning, title, None, now)
    }

    pub fn error(&mut self, title: impl Into<String>, subtitle: Option<String>, now: Instant) -> u64 {
        self.push(Severity::Error, title, subtitle, now)
    }

    /// Drops toasts whose fade has finished.
    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.phase(now) != ToastPhase::Gone);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
