//! Application model types: `App` and the open `CollectionView`.
//!
//! The collection view owns a local play order. Playing from it installs that
//! order on the controller as its policy; closing it hands the order back as
//! the controller's queue.

use rand::Rng;

use crate::audio::{
    AudioOutput, LocalOrder, PlaybackController, PolicyDecision, SharedOrder, SourceTag, Step,
};
use crate::catalog::{Collection, CollectionTrack, TrackDetail};
use crate::track::TrackId;

/// An opened playlist or album.
pub struct CollectionView {
    source: SourceTag,
    tracks: Vec<CollectionTrack>,
    order: SharedOrder,
    selected: usize,
    /// Set once something was played from this view.
    started: bool,
    prefetch_sent: bool,
}

impl CollectionView {
    pub fn new(collection: Collection) -> Self {
        let order = SharedOrder::new(LocalOrder::new(collection.entries()));
        Self {
            source: collection.source,
            tracks: collection.tracks,
            order,
            selected: 0,
            started: false,
            prefetch_sent: false,
        }
    }

    pub fn source(&self) -> &SourceTag {
        &self.source
    }

    pub fn tracks(&self) -> &[CollectionTrack] {
        &self.tracks
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_shuffled(&self) -> bool {
        self.order.0.borrow().is_shuffled()
    }

    pub fn order(&self) -> &SharedOrder {
        &self.order
    }

    /// Row currently playing from this view's order.
    pub fn playing_row(&self) -> Option<usize> {
        if !self.started {
            return None;
        }
        self.order.0.borrow().current_entry()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tracks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn uncached_ids(&self) -> Vec<TrackId> {
        let mut ids: Vec<TrackId> = self
            .order
            .0
            .borrow()
            .entries()
            .iter()
            .filter(|e| e.resolved.is_none())
            .map(|e| e.track_id)
            .collect();
        ids.dedup();
        ids
    }
}

/// The main application model.
#[derive(Default)]
pub struct App {
    view: Option<CollectionView>,
    /// Last message for the footer.
    pub status: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> Option<&CollectionView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut CollectionView> {
        self.view.as_mut()
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    /// Show `collection`, closing whatever view was open before.
    pub fn open_collection<O: AudioOutput>(
        &mut self,
        controller: &mut PlaybackController<O>,
        collection: Collection,
    ) {
        self.close_view(controller);
        log::info!(
            "segue: opened {} {} ({} tracks)",
            collection.source.kind,
            collection.source.id,
            collection.tracks.len()
        );
        self.view = Some(CollectionView::new(collection));
    }

    /// Close the view. If it was driving playback, its order becomes the
    /// controller's queue and the policy is removed.
    pub fn close_view<O: AudioOutput>(&mut self, controller: &mut PlaybackController<O>) {
        let Some(view) = self.view.take() else {
            return;
        };
        if !view.started {
            return;
        }
        controller.uninstall_policy();
        if let Some((queue, start)) = view.order.0.borrow().reconciled_queue() {
            log::debug!("segue: reconciled {} tracks, start {start}", queue.len());
            controller.set_queue(queue, start);
        }
    }

    /// Play the highlighted row; the view goes back to sequential order.
    pub fn play_selected<O: AudioOutput>(&mut self, controller: &mut PlaybackController<O>) -> Step {
        let Some(view) = self.view.as_mut() else {
            return Step::Handled;
        };
        let decision = {
            let mut order = view.order.0.borrow_mut();
            order.reset_sequential();
            order.select_entry(view.selected)
        };
        Self::start(view, controller, decision)
    }

    /// Play the whole view from the top, in order.
    pub fn play_all<O: AudioOutput>(&mut self, controller: &mut PlaybackController<O>) -> Step {
        let Some(view) = self.view.as_mut() else {
            return Step::Handled;
        };
        let decision = {
            let mut order = view.order.0.borrow_mut();
            order.reset_sequential();
            order.select_position(0)
        };
        Self::start(view, controller, decision)
    }

    /// Shuffle the view and play the first track of the new order.
    pub fn shuffle_play<O: AudioOutput, R: Rng + ?Sized>(
        &mut self,
        controller: &mut PlaybackController<O>,
        rng: &mut R,
    ) -> Step {
        let Some(view) = self.view.as_mut() else {
            return Step::Handled;
        };
        let decision = {
            let mut order = view.order.0.borrow_mut();
            order.shuffle(rng);
            order.select_position(0)
        };
        Self::start(view, controller, decision)
    }

    fn start<O: AudioOutput>(
        view: &mut CollectionView,
        controller: &mut PlaybackController<O>,
        decision: Option<PolicyDecision>,
    ) -> Step {
        let Some(decision) = decision else {
            return Step::Handled;
        };
        view.started = true;
        controller.install_policy(Box::new(view.order.clone()));
        controller.set_source(view.source.clone());
        match decision {
            PolicyDecision::Play(track) => {
                if controller.play_track(track).is_ok() {
                    Step::Advanced
                } else {
                    Step::Handled
                }
            }
            PolicyDecision::Lookup(id) => Step::Lookup(id),
            _ => Step::Handled,
        }
    }

    /// Handle fetched track details.
    ///
    /// The result is cached in the view either way; it is played only when
    /// `play` is set, i.e. it answers the latest play request.
    pub fn track_resolved<O: AudioOutput>(
        &mut self,
        controller: &mut PlaybackController<O>,
        detail: &TrackDetail,
        play: bool,
    ) {
        let track = detail.to_track_ref();
        if let Some(view) = self.view.as_mut() {
            view.order.0.borrow_mut().cache(detail.track_id, &track);
        }
        if !play {
            return;
        }
        if let Err(e) = controller.play_track(track) {
            self.set_status(format!("cannot play track {}: {e}", detail.track_id));
        }
    }

    /// Ids to warm the cache with, once per view after playback started.
    pub fn take_prefetch(&mut self) -> Vec<TrackId> {
        match self.view.as_mut() {
            Some(view) if view.started && !view.prefetch_sent => {
                view.prefetch_sent = true;
                view.uncached_ids()
            }
            _ => Vec::new(),
        }
    }
}
