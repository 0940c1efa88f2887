//! A collection view's own play order.
//!
//! `LocalOrder` keeps the rows of an open playlist/album, the order they play
//! in (sequential or shuffled) and the position inside that order. Installed
//! on the controller through `SharedOrder`, it decides what skip buttons and
//! end-of-track do; when the view closes, `reconciled_queue` hands the same
//! order back to the controller's queue.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::track::{TrackId, TrackRef};

use super::policy::{PlaybackPolicy, PolicyContext, PolicyDecision};

/// One row of the collection.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub track_id: TrackId,
    pub title: Option<String>,
    pub artist: Option<String>,
    /// Playable reference, once the track details have been fetched.
    pub resolved: Option<TrackRef>,
}

impl OrderEntry {
    pub fn new(track_id: TrackId, title: Option<String>, artist: Option<String>) -> Self {
        Self {
            track_id,
            title,
            artist,
            resolved: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalOrder {
    entries: Vec<OrderEntry>,
    /// Indices into `entries`, in play order.
    order: Vec<usize>,
    /// Position inside `order`; `None` until something was played.
    pos: Option<usize>,
    shuffled: bool,
}

impl LocalOrder {
    pub fn new(entries: Vec<OrderEntry>) -> Self {
        let order = (0..entries.len()).collect();
        Self {
            entries,
            order,
            pos: None,
            shuffled: false,
        }
    }

    pub fn entries(&self) -> &[OrderEntry] {
        &self.entries
    }

    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn position(&self) -> Option<usize> {
        self.pos
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffled
    }

    /// Entry index at the current position.
    pub fn current_entry(&self) -> Option<usize> {
        self.pos.and_then(|p| self.order.get(p).copied())
    }

    /// Go back to playing rows top to bottom.
    pub fn reset_sequential(&mut self) {
        let current = self.current_entry();
        self.order = (0..self.entries.len()).collect();
        self.shuffled = false;
        self.pos = current;
    }

    /// Replace the order with a random permutation and rewind to its start.
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.order = shuffled_order(self.entries.len(), rng);
        self.shuffled = true;
        self.pos = None;
    }

    /// Move to the position holding `entry` and decide how to play it.
    pub fn select_entry(&mut self, entry: usize) -> Option<PolicyDecision> {
        let pos = self.order.iter().position(|&i| i == entry)?;
        self.pos = Some(pos);
        Some(self.decision_at(pos))
    }

    /// Move to `pos` in the play order and decide how to play it.
    pub fn select_position(&mut self, pos: usize) -> Option<PolicyDecision> {
        if pos >= self.order.len() {
            return None;
        }
        self.pos = Some(pos);
        Some(self.decision_at(pos))
    }

    /// Step through the order. Running off the end releases the view's hold
    /// on the controller; running off the start does nothing.
    pub fn goto_offset(&mut self, offset: isize) -> PolicyDecision {
        let current = self.pos.map_or(-1, |p| p as isize);
        let target = current + offset;
        if target >= 0 && (target as usize) < self.order.len() {
            let pos = target as usize;
            self.pos = Some(pos);
            self.decision_at(pos)
        } else if offset > 0 {
            PolicyDecision::Release
        } else {
            PolicyDecision::Ignore
        }
    }

    /// Remember the playable reference for every row of `track_id`.
    pub fn cache(&mut self, track_id: TrackId, track: &TrackRef) {
        for entry in self.entries.iter_mut().filter(|e| e.track_id == track_id) {
            entry.resolved = Some(track.clone());
        }
    }

    /// The play order as a controller queue plus the start index.
    ///
    /// Rows whose details never arrived are dropped; the start index points at
    /// the current row inside the filtered queue.
    pub fn reconciled_queue(&self) -> Option<(Vec<TrackRef>, usize)> {
        let mut queue = Vec::with_capacity(self.order.len());
        let mut start = 0;
        for (pos, &i) in self.order.iter().enumerate() {
            let Some(track) = self.entries[i].resolved.as_ref() else {
                continue;
            };
            if self.pos.is_some_and(|p| p > pos) {
                start += 1;
            }
            queue.push(track.clone());
        }
        if queue.is_empty() {
            return None;
        }
        let start = start.min(queue.len() - 1);
        Some((queue, start))
    }

    fn decision_at(&self, pos: usize) -> PolicyDecision {
        let entry = &self.entries[self.order[pos]];
        match &entry.resolved {
            Some(track) => PolicyDecision::Play(track.clone()),
            None => PolicyDecision::Lookup(entry.track_id),
        }
    }
}

impl PlaybackPolicy for LocalOrder {
    fn on_track_end(&mut self, _ctx: &PolicyContext) -> PolicyDecision {
        self.goto_offset(1)
    }

    fn on_next(&mut self, _ctx: &PolicyContext) -> PolicyDecision {
        self.goto_offset(1)
    }

    fn on_prev(&mut self, ctx: &PolicyContext) -> PolicyDecision {
        if ctx.past_restart_threshold() {
            PolicyDecision::Restart
        } else {
            self.goto_offset(-1)
        }
    }
}

/// Handle shared between the view (which edits the order) and the
/// controller (which consults it as its policy).
#[derive(Debug, Clone)]
pub struct SharedOrder(pub Rc<RefCell<LocalOrder>>);

impl SharedOrder {
    pub fn new(order: LocalOrder) -> Self {
        Self(Rc::new(RefCell::new(order)))
    }
}

impl PlaybackPolicy for SharedOrder {
    fn on_track_end(&mut self, ctx: &PolicyContext) -> PolicyDecision {
        self.0.borrow_mut().on_track_end(ctx)
    }

    fn on_next(&mut self, ctx: &PolicyContext) -> PolicyDecision {
        self.0.borrow_mut().on_next(ctx)
    }

    fn on_prev(&mut self, ctx: &PolicyContext) -> PolicyDecision {
        self.0.borrow_mut().on_prev(ctx)
    }
}

/// Fisher-Yates permutation of `0..len`.
pub fn shuffled_order<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(rng);
    order
}
