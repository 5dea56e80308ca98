//! Merges each fetched snapshot into what the map currently shows.
//!
//! Markers and polylines are rebuilt wholesale every tick: the snapshot is a
//! full listing with no stable delta. What survives a tick is the decision to
//! reopen an info-window, never the window itself.

use indexmap::IndexMap;
use shared::{EntityId, EntityKind, Snapshot};

use crate::selection::{SelectionChange, SelectionState};
use crate::surface::{LineStyle, MapSurface};

pub struct ActiveMarker<M> {
    pub handle: M,
    pub kind: EntityKind,
    pub info_content: String,
}

pub struct OpenInfoWindow<W> {
    pub entity_id: EntityId,
    pub kind: EntityKind,
    pub handle: W,
}

/// Map handles currently attached. Only the reconciler creates or destroys them.
pub struct OnScreenState<S: MapSurface> {
    active_markers: IndexMap<EntityId, ActiveMarker<S::Marker>>,
    active_polylines: Vec<S::Polyline>,
    open_info_window: Option<OpenInfoWindow<S::InfoWindow>>,
}

impl<S: MapSurface> Default for OnScreenState<S> {
    fn default() -> Self {
        Self {
            active_markers: IndexMap::new(),
            active_polylines: Vec::new(),
            open_info_window: None,
        }
    }
}

impl<S: MapSurface> OnScreenState<S> {
    pub fn marker_count(&self) -> usize {
        self.active_markers.len()
    }

    pub fn polyline_count(&self) -> usize {
        self.active_polylines.len()
    }

    pub fn marker_ids(&self) -> impl Iterator<Item = &EntityId> {
        self.active_markers.keys()
    }

    pub fn marker(&self, id: &str) -> Option<&ActiveMarker<S::Marker>> {
        self.active_markers.get(id)
    }

    pub fn open_entity(&self) -> Option<&EntityId> {
        self.open_info_window.as_ref().map(|open| &open.entity_id)
    }

    fn close_open_window(&mut self, surface: &mut S) -> Option<EntityId> {
        let open = self.open_info_window.take()?;
        surface.close_info_window(open.handle);
        Some(open.entity_id)
    }

    fn open_window_for(&mut self, id: &EntityId, surface: &mut S) -> bool {
        let Some(marker) = self.active_markers.get(id) else {
            return false;
        };
        let handle = surface.open_info_window(id, &marker.handle, &marker.info_content);
        self.open_info_window = Some(OpenInfoWindow {
            entity_id: id.clone(),
            kind: marker.kind,
            handle,
        });
        true
    }

    fn teardown(&mut self, surface: &mut S) -> (usize, usize) {
        let detached_markers = self.active_markers.len();
        let detached_polylines = self.active_polylines.len();
        for (_, marker) in self.active_markers.drain(..) {
            surface.detach_marker(marker.handle);
        }
        for polyline in self.active_polylines.drain(..) {
            surface.detach_polyline(polyline);
        }
        (detached_markers, detached_polylines)
    }
}

/// Outcome of one reconciliation pass, for logging and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub detached_markers: usize,
    pub detached_polylines: usize,
    pub markers: usize,
    pub polylines: usize,
    pub reopened: Option<EntityId>,
    /// A locomotive whose window was open but is not persisting.
    pub dropped: Option<EntityId>,
}

/// Selection plus on-screen state, passed through every reconciliation.
pub struct DashboardViewState<S: MapSurface> {
    selection: SelectionState,
    screen: OnScreenState<S>,
}

impl<S: MapSurface> Default for DashboardViewState<S> {
    fn default() -> Self {
        Self {
            selection: SelectionState::default(),
            screen: OnScreenState::default(),
        }
    }
}

impl<S: MapSurface> DashboardViewState<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn screen(&self) -> &OnScreenState<S> {
        &self.screen
    }

    /// Table click. Closes any other locomotive's window right away instead
    /// of waiting for the refresh the caller is expected to issue.
    pub fn select_entity(
        &mut self,
        id: EntityId,
        kind: EntityKind,
        surface: &mut S,
    ) -> SelectionChange {
        let change = self.selection.select(id.clone(), kind);

        if change.refresh.selected_entity_id.is_some() {
            let other_locomotive_open = self
                .screen
                .open_info_window
                .as_ref()
                .is_some_and(|open| open.kind.is_locomotive() && open.entity_id != id);
            if other_locomotive_open {
                self.screen.close_open_window(surface);
            }
        }
        change
    }

    /// Toggles the clicked marker's window; at most one window stays open.
    /// Clicks on markers from an earlier tick are ignored.
    pub fn on_marker_click(&mut self, id: &EntityId, surface: &mut S) -> bool {
        if !self.screen.active_markers.contains_key(id) {
            return false;
        }
        let was_open = self.screen.close_open_window(surface);
        if was_open.as_ref() != Some(id) {
            self.screen.open_window_for(id, surface);
        }
        true
    }

    /// The user closed a window from the map itself.
    pub fn on_info_window_closed(&mut self, id: &EntityId, surface: &mut S) {
        if self.screen.open_entity() == Some(id) {
            self.screen.close_open_window(surface);
        }
    }

    /// Replaces everything on the map with `snapshot`'s content.
    pub fn reconcile(&mut self, snapshot: &Snapshot, surface: &mut S) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let previously_open = self.screen.close_open_window(surface);
        let (detached_markers, detached_polylines) = self.screen.teardown(surface);
        report.detached_markers = detached_markers;
        report.detached_polylines = detached_polylines;

        for path in &snapshot.connection_lines {
            let polyline = surface.create_polyline(path, LineStyle::Connected);
            self.screen.active_polylines.push(polyline);
        }

        for descriptor in &snapshot.markers {
            let handle = surface.create_marker(descriptor);
            let replaced = self.screen.active_markers.insert(
                descriptor.id.clone(),
                ActiveMarker {
                    handle,
                    kind: descriptor.kind,
                    info_content: descriptor.info_content.clone(),
                },
            );
            // Duplicate id in one snapshot: the later descriptor wins.
            if let Some(replaced) = replaced {
                if self.screen.open_entity() == Some(&descriptor.id) {
                    self.screen.close_open_window(surface);
                }
                surface.detach_marker(replaced.handle);
            }

            if previously_open.as_ref() != Some(&descriptor.id) {
                continue;
            }
            let persists = !descriptor.kind.is_locomotive()
                || self.selection.is_persisting(&descriptor.id);
            if persists {
                self.screen.open_window_for(&descriptor.id, surface);
                report.reopened = Some(descriptor.id.clone());
            } else {
                report.dropped = Some(descriptor.id.clone());
            }
        }

        report.markers = self.screen.active_markers.len();
        report.polylines = self.screen.active_polylines.len();
        report
    }
}
