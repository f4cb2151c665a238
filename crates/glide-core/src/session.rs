#![forbid(unsafe_code)]

//! Touch session tracking.
//!
//! A [`TouchSession`] covers one continuous interaction from the first
//! contact landing until the last one lifts (or the session is cancelled).
//!
//! # Invariants
//! 1. A session exists iff `active_count > 0`; the sample that brings the
//!    count to zero destroys it synchronously.
//! 2. Only the first two contacts are tracked. A third contact is reported
//!    as [`ContactAdded::Overflow`] and the caller cancels.
//! 3. Samples are applied strictly in arrival order; nothing is buffered.

use crate::geometry::{Point, TouchSample};

/// A position with the time it was observed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stamp {
    pub pos: Point,
    pub timestamp_ms: u64,
}

/// How the session is being interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// One contact: tap, long-press, swipe candidates.
    Single,
    /// Two contacts: pinch only. Once entered, never left for the session.
    Pinch,
}

/// Second tracked contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SecondaryContact {
    pub id: u32,
    pub start: Point,
    pub current: Point,
}

/// State of one active touch interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchSession {
    active_count: usize,
    primary_id: u32,
    primary_start: Stamp,
    primary_current: Stamp,
    secondary: Option<SecondaryContact>,
    mode: SessionMode,
    resolved: bool,
    cancelled: bool,
}

impl TouchSession {
    fn new(primary_id: u32, start: Stamp) -> Self {
        Self {
            active_count: 1,
            primary_id,
            primary_start: start,
            primary_current: start,
            secondary: None,
            mode: SessionMode::Single,
            resolved: false,
            cancelled: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    #[inline]
    #[must_use]
    pub const fn primary_id(&self) -> u32 {
        self.primary_id
    }

    #[inline]
    #[must_use]
    pub const fn primary_start(&self) -> Stamp {
        self.primary_start
    }

    #[inline]
    #[must_use]
    pub const fn primary_current(&self) -> Stamp {
        self.primary_current
    }

    #[inline]
    #[must_use]
    pub const fn secondary(&self) -> Option<SecondaryContact> {
        self.secondary
    }

    #[inline]
    #[must_use]
    pub const fn mode(&self) -> SessionMode {
        self.mode
    }

    /// A terminal event (long-press) already fired for this session.
    #[inline]
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved
    }

    #[inline]
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    /// Primary displacement since the session began.
    #[must_use]
    pub fn delta(&self) -> (f64, f64) {
        self.primary_start.pos.delta_to(self.primary_current.pos)
    }

    /// Straight-line primary travel since the session began.
    #[must_use]
    pub fn distance(&self) -> f64 {
        self.primary_start.pos.distance(self.primary_current.pos)
    }

    /// Elapsed time between the first and the latest primary sample.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.primary_current
            .timestamp_ms
            .saturating_sub(self.primary_start.timestamp_ms)
    }

    /// Distance between the two tracked contacts, when both are known.
    #[must_use]
    pub fn spread(&self) -> Option<f64> {
        self.secondary
            .map(|secondary| self.primary_current.pos.distance(secondary.current))
    }

    /// Forget tracked contacts that are no longer down. When the primary
    /// lifts, the secondary takes its place.
    fn release_lifted(&mut self, sample: &TouchSample) {
        let is_down = |id: u32| sample.touches.iter().any(|contact| contact.id == id);
        if self.secondary.is_some_and(|secondary| !is_down(secondary.id)) {
            self.secondary = None;
        }
        if !is_down(self.primary_id)
            && let Some(secondary) = self.secondary.take()
        {
            self.primary_id = secondary.id;
            self.primary_current = Stamp {
                pos: sample.position_of(secondary.id).unwrap_or(secondary.current),
                timestamp_ms: sample.timestamp_ms,
            };
        }
    }
}

/// Why a sample did not change tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleIgnored {
    /// The sample lists no contacts at all.
    EmptySample,
    /// A start arrived with more than one new contact and no session.
    NotSingleContact,
    /// A start arrived while a session is already active.
    SessionAlreadyActive,
    /// A move/end arrived with no matching active session.
    NoActiveSession,
    /// The tracked contact is missing from the sample.
    ContactMismatch,
    /// The edge gate rejected the session start.
    OutsideEdgeBand,
    /// The component was destroyed.
    Destroyed,
}

impl SampleIgnored {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EmptySample => "empty_sample",
            Self::NotSingleContact => "not_single_contact",
            Self::SessionAlreadyActive => "session_already_active",
            Self::NoActiveSession => "no_active_session",
            Self::ContactMismatch => "contact_mismatch",
            Self::OutsideEdgeBand => "outside_edge_band",
            Self::Destroyed => "destroyed",
        }
    }
}

/// Result of a contact landing while a session is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ContactAdded {
    /// The second contact is now tracked; the session switched to pinch.
    Secondary,
    /// More than two contacts are down.
    Overflow,
    /// Nothing new was tracked.
    Ignored(SampleIgnored),
}

/// Result of a contact lifting.
#[derive(Debug, Clone, PartialEq)]
pub enum Lift {
    /// Contacts remain; the session continues.
    Continuing,
    /// The last contact lifted; the session is gone and returned here.
    Ended(TouchSession),
    Ignored(SampleIgnored),
}

/// Owns at most one [`TouchSession`].
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    session: Option<TouchSession>,
}

impl SessionTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    /// The active session, if any.
    #[inline]
    #[must_use]
    pub fn session(&self) -> Option<&TouchSession> {
        self.session.as_ref()
    }

    #[inline]
    pub(crate) fn session_mut(&mut self) -> Option<&mut TouchSession> {
        self.session.as_mut()
    }

    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session for a sample carrying exactly one contact.
    pub fn begin(&mut self, sample: &TouchSample) -> Result<&TouchSession, SampleIgnored> {
        if self.session.is_some() {
            return Err(SampleIgnored::SessionAlreadyActive);
        }
        if sample.active_count() == 0 {
            return Err(SampleIgnored::EmptySample);
        }
        if sample.active_count() != 1 {
            return Err(SampleIgnored::NotSingleContact);
        }
        let contact = sample.touches[0];
        let stamp = Stamp {
            pos: contact.pos,
            timestamp_ms: sample.timestamp_ms,
        };
        Ok(&*self.session.insert(TouchSession::new(contact.id, stamp)))
    }

    /// Register contacts that landed while a session is active.
    pub fn add_contact(&mut self, sample: &TouchSample) -> ContactAdded {
        let Some(session) = self.session.as_mut() else {
            return ContactAdded::Ignored(SampleIgnored::NoActiveSession);
        };
        let count = sample.active_count();
        if count > 2 {
            session.active_count = count;
            return ContactAdded::Overflow;
        }
        if count < 2 || session.secondary.is_some() {
            return ContactAdded::Ignored(SampleIgnored::SessionAlreadyActive);
        }
        let Some(other) = sample
            .touches
            .iter()
            .find(|contact| contact.id != session.primary_id)
        else {
            return ContactAdded::Ignored(SampleIgnored::ContactMismatch);
        };
        session.active_count = 2;
        session.secondary = Some(SecondaryContact {
            id: other.id,
            start: other.pos,
            current: other.pos,
        });
        session.mode = SessionMode::Pinch;
        if let Some(pos) = sample.position_of(session.primary_id) {
            session.primary_current = Stamp {
                pos,
                timestamp_ms: sample.timestamp_ms,
            };
        }
        ContactAdded::Secondary
    }

    /// Apply a move sample to the tracked contacts.
    pub fn apply_move(&mut self, sample: &TouchSample) -> Result<&TouchSession, SampleIgnored> {
        let Some(session) = self.session.as_mut() else {
            return Err(SampleIgnored::NoActiveSession);
        };
        if sample.active_count() == 0 {
            return Err(SampleIgnored::EmptySample);
        }
        let primary = sample.position_of(session.primary_id);
        let secondary = session
            .secondary
            .and_then(|secondary| sample.position_of(secondary.id));
        if primary.is_none() && secondary.is_none() {
            return Err(SampleIgnored::ContactMismatch);
        }
        if let Some(pos) = primary {
            session.primary_current = Stamp {
                pos,
                timestamp_ms: sample.timestamp_ms,
            };
        }
        if let (Some(pos), Some(tracked)) = (secondary, session.secondary.as_mut()) {
            tracked.current = pos;
        }
        Ok(&*session)
    }

    /// Apply a lift sample. Destroys the session when no contacts remain.
    pub fn apply_lift(&mut self, sample: &TouchSample) -> Lift {
        let Some(session) = self.session.as_mut() else {
            return Lift::Ignored(SampleIgnored::NoActiveSession);
        };
        if let Some(pos) = sample
            .changed
            .iter()
            .find(|contact| contact.id == session.primary_id)
            .map(|contact| contact.pos)
        {
            session.primary_current = Stamp {
                pos,
                timestamp_ms: sample.timestamp_ms,
            };
        }
        session.active_count = sample.active_count();
        if session.active_count > 0 {
            session.release_lifted(sample);
            return Lift::Continuing;
        }
        match self.session.take() {
            Some(ended) => Lift::Ended(ended),
            None => Lift::Ignored(SampleIgnored::NoActiveSession),
        }
    }

    /// Discard the session, returning it marked as cancelled.
    pub fn cancel(&mut self) -> Option<TouchSession> {
        self.session.take().map(|mut session| {
            session.cancelled = true;
            session.active_count = 0;
            session
        })
    }
}
