//! Session lifecycle state machine.
//!
//! Turns the per-frame stream of observations into discrete session events:
//!
//! - **start**: all four boundary markers are visible and at least two known
//!   people are in view. The first person in detection order becomes the
//!   trainer, the second the student.
//! - **card learned**: while a session is active and the zones are known, a
//!   card whose center falls in the (padded) student zone is recorded once per
//!   session.
//! - **end**: the trainer or the student is no longer visible. This does not
//!   need the boundary markers, so a briefly occluded boundary marker never
//!   ends a session.
//!
//! The tracker only decides and records. Delivering the returned events is the
//! caller's job, and a failed delivery never rolls back the recorded state.
//! A tracker must only ever be driven by one frame at a time.

use crate::{
    calendar::{jalali_timestamp, SessionTime},
    constants::{DEFAULT_STUDENT_ZONE_PADDING, STUDENT_ZONE_LABEL},
    frame::{BoundaryIds, FrameObservation, MarkerId},
    geometry::Zones,
    lookup::Lookups,
};
use chrono::NaiveDateTime;
use log::{debug, info};
use std::collections::HashSet;

/// Whether a session is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Inactive,
    Active,
}

/// Mutable bookkeeping of the current session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    phase: SessionPhase,
    trainer_id: Option<MarkerId>,
    student_id: Option<MarkerId>,
    learned_card_ids: HashSet<MarkerId>,
    learned_order: Vec<MarkerId>,
    learned_card_count: u32,
}

impl SessionState {
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    #[must_use]
    pub fn trainer_id(&self) -> Option<MarkerId> {
        self.trainer_id
    }

    #[must_use]
    pub fn student_id(&self) -> Option<MarkerId> {
        self.student_id
    }

    #[must_use]
    pub fn learned_card_count(&self) -> u32 {
        self.learned_card_count
    }

    /// Learned cards in the order they were learned
    #[must_use]
    pub fn learned_card_ids(&self) -> &[MarkerId] {
        &self.learned_order
    }

    #[must_use]
    pub fn has_learned(&self, card_id: MarkerId) -> bool {
        self.learned_card_ids.contains(&card_id)
    }

    fn clear_cards(&mut self) {
        self.learned_card_ids.clear();
        self.learned_order.clear();
        self.learned_card_count = 0;
    }

    fn record_card(&mut self, card_id: MarkerId) -> u32 {
        self.learned_card_ids.insert(card_id);
        self.learned_order.push(card_id);
        self.learned_card_count += 1;
        self.learned_card_count
    }
}

/// A session has begun
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStarted {
    pub time: SessionTime,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
}

/// A card was shown in the student zone for the first time this session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLearned {
    pub time: SessionTime,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
    pub card_id: MarkerId,
    pub word: String,
    pub zone: &'static str,
    pub active: bool,
    pub count: u32,
}

/// A session has finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnded {
    pub time: SessionTime,
    pub trainer_id: MarkerId,
    pub student_id: MarkerId,
    pub count: u32,
    pub learned_card_ids: Vec<MarkerId>,
}

/// Domain event emitted by the tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Started(SessionStarted),
    CardLearned(CardLearned),
    Ended(SessionEnded),
}

impl SessionEvent {
    /// Short name used in logs
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started(_) => "session-start",
            Self::CardLearned(_) => "card-learned",
            Self::Ended(_) => "session-end",
        }
    }
}

/// Consumes frame observations and owns the session state
#[derive(Debug, Clone)]
pub struct SessionTracker {
    state: SessionState,
    boundary_ids: BoundaryIds,
    padding: i32,
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new(BoundaryIds::default(), DEFAULT_STUDENT_ZONE_PADDING)
    }
}

impl SessionTracker {
    /// Create an inactive tracker
    #[must_use]
    pub fn new(boundary_ids: BoundaryIds, padding: i32) -> Self {
        Self {
            state: SessionState::default(),
            boundary_ids,
            padding,
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn boundary_ids(&self) -> &BoundaryIds {
        &self.boundary_ids
    }

    /// Process one frame and return the events it produced, in emission order
    pub fn step(&mut self, observation: &FrameObservation, lookups: &Lookups, now: NaiveDateTime) -> Vec<SessionEvent> {
        let time = jalali_timestamp(now);
        let zones = observation.zones(&self.boundary_ids, self.padding);
        let mut events = Vec::new();

        if self.state.is_active() {
            events.extend(self.check_end(observation, time));
        } else {
            events.extend(self.try_start(observation, zones.as_ref(), lookups, time));
        }

        if let Some(zones) = zones.as_ref() {
            events.extend(self.check_card_learned(observation, zones, lookups, time));
        } else {
            debug!("Boundary markers incomplete, skipping zone checks");
        }

        events
    }

    /// Begin a session if the zones are known and two people are in view
    pub fn try_start(
        &mut self,
        observation: &FrameObservation,
        zones: Option<&Zones>,
        lookups: &Lookups,
        time: SessionTime,
    ) -> Option<SessionEvent> {
        if self.state.is_active() || zones.is_none() {
            return None;
        }

        let mut candidates: Vec<MarkerId> = Vec::with_capacity(2);
        for &id in observation.visible_ids() {
            if lookups.is_person(id) && !candidates.contains(&id) {
                candidates.push(id);
                if candidates.len() == 2 {
                    break;
                }
            }
        }
        let &[trainer_id, student_id] = candidates.as_slice() else {
            return None;
        };

        self.state.clear_cards();
        self.state.trainer_id = Some(trainer_id);
        self.state.student_id = Some(student_id);
        self.state.phase = SessionPhase::Active;
        info!("Class started: trainer {trainer_id}, student {student_id}");

        Some(SessionEvent::Started(SessionStarted {
            time,
            trainer_id,
            student_id,
        }))
    }

    /// End the session if the trainer or the student left the frame
    pub fn check_end(&mut self, observation: &FrameObservation, time: SessionTime) -> Option<SessionEvent> {
        let (Some(trainer_id), Some(student_id)) = (self.state.trainer_id, self.state.student_id) else {
            return None;
        };
        if !self.state.is_active()
            || (observation.is_visible(trainer_id) && observation.is_visible(student_id))
        {
            return None;
        }

        let event = SessionEnded {
            time,
            trainer_id,
            student_id,
            count: self.state.learned_card_count,
            learned_card_ids: self.state.learned_order.clone(),
        };

        self.state.clear_cards();
        self.state.trainer_id = None;
        self.state.student_id = None;
        self.state.phase = SessionPhase::Inactive;
        info!("Class ended: trainer {trainer_id}, student {student_id}, {} cards", event.count);

        Some(SessionEvent::Ended(event))
    }

    /// Record every new card whose center lies in the student zone
    pub fn check_card_learned(
        &mut self,
        observation: &FrameObservation,
        zones: &Zones,
        lookups: &Lookups,
        time: SessionTime,
    ) -> Vec<SessionEvent> {
        let (Some(trainer_id), Some(student_id)) = (self.state.trainer_id, self.state.student_id) else {
            return Vec::new();
        };
        if !self.state.is_active() {
            return Vec::new();
        }

        let mut events = Vec::new();
        for &(card_id, center) in observation.centers() {
            let Some(word) = lookups.word(card_id) else {
                continue;
            };
            if self.state.has_learned(card_id) || !zones.student.contains(center) {
                continue;
            }

            let count = self.state.record_card(card_id);
            info!("Card {card_id} ({word}) learned, count {count}");
            events.push(SessionEvent::CardLearned(CardLearned {
                time,
                trainer_id,
                student_id,
                card_id,
                word: word.to_string(),
                zone: STUDENT_ZONE_LABEL,
                active: true,
                count,
            }));
        }

        events
    }
}
