use crate::foundation::error::{RelingoError, RelingoResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default duration of a manually added caption.
pub const MANUAL_CAPTION_SECS: f64 = 2.0;

/// Opaque caption identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptionId(pub String);

impl CaptionId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CaptionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for CaptionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One timed caption segment. Times are seconds on the source timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    /// Identifier, unique within a store.
    pub id: CaptionId,
    /// Inclusive start time in seconds.
    pub start: f64,
    /// Inclusive end time in seconds.
    pub end: f64,
    /// Caption text.
    pub text: String,
}

impl Caption {
    /// Create a validated caption.
    pub fn new(
        id: impl Into<CaptionId>,
        start: f64,
        end: f64,
        text: impl Into<String>,
    ) -> RelingoResult<Self> {
        let c = Self {
            id: id.into(),
            start,
            end,
            text: text.into(),
        };
        c.validate()?;
        Ok(c)
    }

    /// A caption added by hand at playback position `at`, lasting [`MANUAL_CAPTION_SECS`].
    pub fn manual(at: f64, text: impl Into<String>) -> RelingoResult<Self> {
        let start = at.max(0.0);
        Self::new(CaptionId::generate(), start, start + MANUAL_CAPTION_SECS, text)
    }

    /// Check timing invariants: finite, `start >= 0`, `end > start`.
    pub fn validate(&self) -> RelingoResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(RelingoError::validation(format!(
                "caption '{}' has non-finite timing",
                self.id
            )));
        }
        if self.start < 0.0 {
            return Err(RelingoError::validation(format!(
                "caption '{}' starts before 0",
                self.id
            )));
        }
        if self.end <= self.start {
            return Err(RelingoError::validation(format!(
                "caption '{}' must end after it starts ({} <= {})",
                self.id, self.end, self.start
            )));
        }
        Ok(())
    }

    /// `true` when `t` lies in `[start, end]` (both bounds inclusive).
    pub fn contains(&self, t: f64) -> bool {
        self.start <= t && t <= self.end
    }

    /// Segment duration in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}
