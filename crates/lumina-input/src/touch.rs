//! Multi-touch drag tracker with axis locking.
//!
//! Each contact accumulates movement from its start point until it
//! crosses a pixel threshold, at which point it locks to the dominant
//! axis for the rest of its life. Only the most recently started
//! contact drives output; earlier fingers are ignored until they lift
//! and touch again.

use std::collections::HashMap;

/// Screen axis a contact locked onto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// A locked drag update from the driving contact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Swipe {
    /// Contact that produced the update.
    pub id: u64,
    /// Axis the contact is locked to.
    pub axis: Axis,
    /// Movement along the locked axis since the last accepted update.
    /// The first update after locking carries the whole accumulated
    /// distance, so its magnitude exceeds the threshold.
    pub delta: f64,
}

#[derive(Clone, Debug)]
struct Contact {
    x: f64,
    y: f64,
    locked: Option<Axis>,
    consumed: bool,
}

/// Tracks active touch contacts and reports locked drags.
#[derive(Clone, Debug)]
pub struct TouchTracker {
    contacts: HashMap<u64, Contact>,
    latest: Option<u64>,
    threshold: f64,
}

impl Default for TouchTracker {
    fn default() -> Self {
        Self::new(12.0)
    }
}

impl TouchTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            contacts: HashMap::new(),
            latest: None,
            threshold,
        }
    }

    /// Registers a new contact and makes it the driving one.
    pub fn touch_started(&mut self, id: u64, x: f64, y: f64) {
        self.contacts.insert(
            id,
            Contact {
                x,
                y,
                locked: None,
                consumed: false,
            },
        );
        self.latest = Some(id);
    }

    /// Processes a movement. Returns a [`Swipe`] once the driving
    /// contact is locked and not consumed; reference coordinates only
    /// advance when a swipe is returned, so sub-threshold movement
    /// accumulates instead of being lost.
    pub fn touch_moved(&mut self, id: u64, x: f64, y: f64) -> Option<Swipe> {
        if self.latest != Some(id) {
            return None;
        }
        let contact = self.contacts.get_mut(&id)?;

        let dx = x - contact.x;
        let dy = y - contact.y;

        if contact.locked.is_none() && (dx.abs() > self.threshold || dy.abs() > self.threshold) {
            contact.locked = Some(if dx.abs() > dy.abs() { Axis::X } else { Axis::Y });
        }
        let axis = contact.locked?;
        if contact.consumed {
            return None;
        }

        contact.x = x;
        contact.y = y;
        Some(Swipe {
            id,
            axis,
            delta: match axis {
                Axis::X => dx,
                Axis::Y => dy,
            },
        })
    }

    /// Marks a contact as consumed. It stays locked but produces no
    /// further swipes until it lifts.
    pub fn consume(&mut self, id: u64) {
        if let Some(contact) = self.contacts.get_mut(&id) {
            contact.consumed = true;
        }
    }

    /// Removes a lifted contact.
    pub fn touch_ended(&mut self, id: u64) {
        self.contacts.remove(&id);
    }
}
