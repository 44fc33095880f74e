use std::fs;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use log::{debug, info};

use crate::error::{Error, Result};
use crate::event::{Attendee, Event};

/// Owns the event collection and every operation over it.
///
/// Events are addressed by their position in the sequence. Positions are not
/// stable handles: deleting an event shifts every later index down by one,
/// and [`EventManager::events_in_chronological_order`] reorders the sequence
/// in place. Index-based operations given an out-of-bounds index do nothing
/// and report it through their return value.
#[derive(Debug, Default)]
pub struct EventManager {
    events: Vec<Event>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn event(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Appends unconditionally. Conflict detection is the caller's business,
    /// via [`EventManager::has_schedule_conflict`] beforehand.
    pub fn add_event(&mut self, event: Event) {
        debug!("adding event '{}' at index {}", event.title, self.events.len());
        self.events.push(event);
    }

    /// Replaces the event at `index` wholesale, attendees included.
    pub fn edit_event(&mut self, index: usize, event: Event) -> bool {
        match self.events.get_mut(index) {
            Some(slot) => {
                debug!("replacing event at index {index} with '{}'", event.title);
                *slot = event;
                true
            }
            None => false,
        }
    }

    /// Removes the event at `index`, shifting every later index down by one.
    pub fn delete_event(&mut self, index: usize) -> bool {
        if index >= self.events.len() {
            return false;
        }

        let removed = self.events.remove(index);
        debug!("deleted event '{}' at index {index}", removed.title);
        true
    }

    /// Events dated strictly after now, in their current relative order.
    pub fn upcoming_events(&self) -> Vec<&Event> {
        self.events_after(Local::now().naive_local())
    }

    /// Events dated strictly before now, in their current relative order.
    /// An event dated exactly now is in neither this set nor the upcoming one.
    pub fn past_events(&self) -> Vec<&Event> {
        self.events_before(Local::now().naive_local())
    }

    fn events_after(&self, instant: NaiveDateTime) -> Vec<&Event> {
        self.events.iter().filter(|event| event.date > instant).collect()
    }

    fn events_before(&self, instant: NaiveDateTime) -> Vec<&Event> {
        self.events.iter().filter(|event| event.date < instant).collect()
    }

    pub fn register_attendee(&mut self, index: usize, attendee: Attendee) -> bool {
        match self.events.get_mut(index) {
            Some(event) => {
                debug!("registering '{}' for event '{}'", attendee.name, event.title);
                event.attendees.push(attendee);
                true
            }
            None => false,
        }
    }

    /// The attendee sequence of the event at `index`, or an empty slice for
    /// an out-of-bounds index.
    pub fn attendees(&self, index: usize) -> &[Attendee] {
        self.events
            .get(index)
            .map(|event| event.attendees.as_slice())
            .unwrap_or_default()
    }

    /// Sets `is_present` on every attendee of the event at `index` whose name
    /// equals `name` exactly. Returns whether any attendee was updated.
    pub fn mark_attendance(&mut self, index: usize, name: &str, present: bool) -> bool {
        let Some(event) = self.events.get_mut(index) else {
            return false;
        };

        let mut marked = false;
        for attendee in event.attendees.iter_mut().filter(|a| a.name == name) {
            attendee.is_present = present;
            marked = true;
        }

        marked
    }

    /// Sorts the sequence ascending by date (stable, ties keep their order)
    /// and returns it. The reorder is permanent: indices handed out before
    /// this call refer to different events afterwards.
    pub fn events_in_chronological_order(&mut self) -> &[Event] {
        self.events.sort_by(|a, b| a.date.cmp(&b.date));
        &self.events
    }

    /// True iff some stored event has the same date (full timestamp) and the
    /// same time string as the candidate. Title and location never matter.
    pub fn has_schedule_conflict(&self, candidate: &Event) -> bool {
        self.events
            .iter()
            .any(|event| event.date == candidate.date && event.time == candidate.time)
    }

    /// Writes the full sequence as a JSON array, replacing the file contents.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(&self.events).map_err(Error::Serialize)?;

        fs::write(path, json).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        info!("saved {} events to {}", self.events.len(), path.display());
        Ok(())
    }

    /// Replaces the in-memory sequence with the contents of `path`. A missing
    /// file leaves the current sequence untouched; a present but malformed
    /// file is an error and also leaves it untouched.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            info!("{} does not exist, keeping in-memory events", path.display());
            return Ok(());
        }

        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;

        let events: Vec<Event> = serde_json::from_str(&raw).map_err(|source| Error::Deserialize {
            path: path.to_owned(),
            source,
        })?;

        info!("loaded {} events from {}", events.len(), path.display());
        self.events = events;
        Ok(())
    }
}
