use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// How long a toast stays on screen.
pub const TOAST_DELAY_MS: i64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub shown_at: DateTime<Utc>,
}

impl Toast {
    pub fn is_visible(&self, now: DateTime<Utc>) -> bool {
        now < self.shown_at + Duration::milliseconds(TOAST_DELAY_MS)
    }
}

/// Single toast slot: showing a new toast replaces the current one.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    current: Option<Toast>,
}

impl Notifications {
    pub fn show(&mut self, message: impl Into<String>, kind: ToastKind) -> Toast {
        self.show_at(message, kind, Utc::now())
    }

    pub fn show_at(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        now: DateTime<Utc>,
    ) -> Toast {
        let toast = Toast {
            message: message.into(),
            kind,
            shown_at: now,
        };
        self.current = Some(toast.clone());
        toast
    }

    pub fn visible(&self) -> Option<&Toast> {
        self.visible_at(Utc::now())
    }

    pub fn visible_at(&self, now: DateTime<Utc>) -> Option<&Toast> {
        self.current.as_ref().filter(|toast| toast.is_visible(now))
    }
}
