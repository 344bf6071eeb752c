//! Class sessions ("events") and their opaque check-in tokens.
//!
//! An event is created by a lecturer with a bounded time window and a token
//! minted once at creation. The token is the QR payload that students post
//! back to check in; it is never rotated or derived from event fields.

use chrono::{DateTime, Utc};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::Serialize;
use uuid::Uuid;

/// Opaque, globally unique session token.
///
/// Minted from 128 bits of operating-system randomness and rendered in the
/// hyphenated UUID layout.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a fresh token.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::SessionToken;
    ///
    /// let a = SessionToken::mint();
    /// let b = SessionToken::mint();
    /// assert_eq!(a.as_str().len(), 36);
    /// assert_ne!(a, b);
    /// ```
    pub fn mint() -> Self {
        let mut bytes = [0_u8; 16];
        OsRng.fill_bytes(&mut bytes);
        Self(Uuid::from_bytes(bytes).hyphenated().to_string())
    }

    /// Wrap a token presented by a client or loaded from storage.
    ///
    /// Returns `None` when the token is blank.
    pub fn from_presented(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Borrow the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SessionToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validation failures raised while building an [`EventDraft`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    /// A required text field was blank.
    #[error("{field} is required")]
    EmptyField {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// The window closes before it opens.
    #[error("end_time must be after start_time")]
    EndBeforeStart,
}

/// Validated input for a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    course_code: String,
    course_name: String,
    department: String,
    venue: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
}

/// Unvalidated session fields supplied by an inbound adapter.
#[derive(Debug, Clone)]
pub struct EventFields {
    /// Course code, e.g. `CSC301`.
    pub course_code: String,
    /// Human-readable course name.
    pub course_name: String,
    /// Owning department.
    pub department: String,
    /// Room or hall.
    pub venue: String,
    /// Window opening instant.
    pub start_time: DateTime<Utc>,
    /// Window closing instant.
    pub end_time: DateTime<Utc>,
}

fn required(value: String, field: &'static str) -> Result<String, EventValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(EventValidationError::EmptyField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

impl EventDraft {
    /// Validate raw fields.
    ///
    /// # Examples
    /// ```
    /// use attendance::domain::{EventDraft, EventFields, EventValidationError};
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let fields = EventFields {
    ///     course_code: "CSC301".into(),
    ///     course_name: "Compilers".into(),
    ///     department: "Computer Science".into(),
    ///     venue: "LT1".into(),
    ///     start_time: start,
    ///     end_time: start - Duration::minutes(1),
    /// };
    /// assert_eq!(EventDraft::new(fields), Err(EventValidationError::EndBeforeStart));
    /// ```
    pub fn new(fields: EventFields) -> Result<Self, EventValidationError> {
        let EventFields {
            course_code,
            course_name,
            department,
            venue,
            start_time,
            end_time,
        } = fields;
        let draft = Self {
            course_code: required(course_code, "course_code")?,
            course_name: required(course_name, "course_name")?,
            department: required(department, "department")?,
            venue: required(venue, "venue")?,
            start_time,
            end_time,
        };
        if draft.end_time < draft.start_time {
            return Err(EventValidationError::EndBeforeStart);
        }
        Ok(draft)
    }

    /// Course code.
    pub fn course_code(&self) -> &str {
        &self.course_code
    }

    /// Course name.
    pub fn course_name(&self) -> &str {
        &self.course_name
    }

    /// Department.
    pub fn department(&self) -> &str {
        &self.department
    }

    /// Venue.
    pub fn venue(&self) -> &str {
        &self.venue
    }

    /// Window start.
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Window end.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }
}

/// Row to be written when a lecturer creates a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Validated session fields.
    pub draft: EventDraft,
    /// Owning lecturer.
    pub lecturer_id: i64,
    /// Freshly minted token.
    pub token: SessionToken,
    /// Creation instant from the service clock.
    pub created_at: DateTime<Utc>,
}

/// Persisted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Primary key.
    pub id: i64,
    /// Course code.
    pub course_code: String,
    /// Course name.
    pub course_name: String,
    /// Department.
    pub department: String,
    /// Venue.
    pub venue: String,
    /// Window start.
    pub start_time: DateTime<Utc>,
    /// Window end.
    pub end_time: DateTime<Utc>,
    /// Owning lecturer; absent only on legacy rows.
    pub lecturer_id: Option<i64>,
    /// Check-in token.
    pub token: SessionToken,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Position of an instant relative to an event window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPosition {
    /// Before `start_time`.
    BeforeStart,
    /// Inside `[start_time, end_time]`.
    Open,
    /// After `end_time`.
    AfterEnd,
}

impl WindowPosition {
    /// Classify `now` against `[start, end]` using whole seconds.
    pub fn of(start: DateTime<Utc>, end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let now = now.timestamp();
        if now < start.timestamp() {
            Self::BeforeStart
        } else if now > end.timestamp() {
            Self::AfterEnd
        } else {
            Self::Open
        }
    }
}

impl Event {
    /// Classify `now` against the window using whole seconds.
    ///
    /// Both bounds are inclusive.
    pub fn window_position(&self, now: DateTime<Utc>) -> WindowPosition {
        WindowPosition::of(self.start_time, self.end_time, now)
    }
}
