//! Ground-contact resolution.
//!
//! Turns raw begin/end contact events into a grounded flag. A counter is kept
//! instead of a boolean because an entity can rest on several ground
//! colliders at once (e.g. straddling a platform seam), and the flag must stay
//! set until the last of them separates.

use crate::api::types::EntityId;
use crate::core::physics::CollisionPair;

/// Per-entity count of ground colliders currently touching it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundSensor {
    contacts: u32,
}

impl GroundSensor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) {
        self.contacts += 1;
    }

    /// Never goes below zero, even for an end without a matching begin.
    pub fn end(&mut self) {
        self.contacts = self.contacts.saturating_sub(1);
    }

    pub fn contacts(&self) -> u32 {
        self.contacts
    }

    pub fn is_grounded(&self) -> bool {
        self.contacts > 0
    }
}

/// What contact resolution needs to know about the entities behind a contact.
pub trait ContactSubjects {
    fn is_ground(&self, id: EntityId) -> bool;
    fn ground_sensor_mut(&mut self, id: EntityId) -> Option<&mut GroundSensor>;
}

/// Contact listener maintaining [`GroundSensor`]s.
#[derive(Debug, Default)]
pub struct GroundCheckListener;

impl GroundCheckListener {
    pub fn new() -> Self {
        Self
    }

    pub fn on_contact_begin(&mut self, subjects: &mut impl ContactSubjects, a: EntityId, b: EntityId) {
        self.update(subjects, a, b, GroundSensor::begin);
    }

    pub fn on_contact_end(&mut self, subjects: &mut impl ContactSubjects, a: EntityId, b: EntityId) {
        self.update(subjects, a, b, GroundSensor::end);
    }

    /// Feed a batch of step events in order.
    pub fn resolve(&mut self, subjects: &mut impl ContactSubjects, pairs: &[CollisionPair]) {
        for pair in pairs {
            if pair.started {
                self.on_contact_begin(subjects, pair.entity_a, pair.entity_b);
            } else {
                self.on_contact_end(subjects, pair.entity_a, pair.entity_b);
            }
        }
    }

    fn update(
        &mut self,
        subjects: &mut impl ContactSubjects,
        a: EntityId,
        b: EntityId,
        apply: fn(&mut GroundSensor),
    ) {
        for (ground, other) in [(a, b), (b, a)] {
            if subjects.is_ground(ground) && !subjects.is_ground(other) {
                if let Some(sensor) = subjects.ground_sensor_mut(other) {
                    apply(sensor);
                    log::trace!(
                        "entity {} ground contacts now {}",
                        other.0,
                        sensor.contacts()
                    );
                }
            }
        }
    }
}
