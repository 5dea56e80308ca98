//! In-memory map surface and snapshot builders for tests.

use std::collections::{BTreeMap, HashSet};

use shared::{EntityId, EntityKind, LatLng, MarkerDescriptor, Snapshot};

use crate::surface::{LineStyle, MapSurface};

#[derive(Debug)]
pub struct FakeMarker(u64);

impl FakeMarker {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct FakePolyline(u64);

#[derive(Debug)]
pub struct FakeWindow(u64);

/// Records which handles are attached to the "map" right now.
#[derive(Default)]
pub struct RecordingSurface {
    next_handle: u64,
    markers: BTreeMap<u64, EntityId>,
    polylines: BTreeMap<u64, LineStyle>,
    // window handle -> (entity, anchoring marker handle)
    windows: BTreeMap<u64, (EntityId, u64)>,
    opened_total: usize,
    calls: usize,
}

impl RecordingSurface {
    fn next(&mut self) -> u64 {
        self.calls += 1;
        self.next_handle += 1;
        self.next_handle
    }

    pub fn attached_markers(&self) -> HashSet<u64> {
        self.markers.keys().copied().collect()
    }

    pub fn attached_polylines(&self) -> HashSet<u64> {
        self.polylines.keys().copied().collect()
    }

    pub fn polyline_styles(&self) -> Vec<LineStyle> {
        self.polylines.values().copied().collect()
    }

    pub fn open_windows(&self) -> Vec<EntityId> {
        self.windows.values().map(|(id, _)| id.clone()).collect()
    }

    pub fn open_window_handles(&self) -> HashSet<u64> {
        self.windows.keys().copied().collect()
    }

    pub fn window_anchor(&self, id: &str) -> Option<u64> {
        self.windows
            .values()
            .find(|(entity, _)| entity.as_str() == id)
            .map(|(_, anchor)| *anchor)
    }

    pub fn opened_total(&self) -> usize {
        self.opened_total
    }

    /// Every create, detach, open and close made so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl MapSurface for RecordingSurface {
    type Marker = FakeMarker;
    type Polyline = FakePolyline;
    type InfoWindow = FakeWindow;

    fn create_marker(&mut self, descriptor: &MarkerDescriptor) -> FakeMarker {
        let handle = self.next();
        self.markers.insert(handle, descriptor.id.clone());
        FakeMarker(handle)
    }

    fn detach_marker(&mut self, marker: FakeMarker) {
        self.calls += 1;
        assert!(
            self.markers.remove(&marker.0).is_some(),
            "marker {} detached twice",
            marker.0
        );
    }

    fn create_polyline(&mut self, _path: &[LatLng], style: LineStyle) -> FakePolyline {
        let handle = self.next();
        self.polylines.insert(handle, style);
        FakePolyline(handle)
    }

    fn detach_polyline(&mut self, polyline: FakePolyline) {
        self.calls += 1;
        self.polylines.remove(&polyline.0);
    }

    fn open_info_window(
        &mut self,
        entity_id: &EntityId,
        marker: &FakeMarker,
        _content: &str,
    ) -> FakeWindow {
        assert!(
            self.markers.contains_key(&marker.0),
            "window opened on detached marker"
        );
        let handle = self.next();
        self.windows.insert(handle, (entity_id.clone(), marker.0));
        self.opened_total += 1;
        FakeWindow(handle)
    }

    fn close_info_window(&mut self, window: FakeWindow) {
        self.calls += 1;
        self.windows.remove(&window.0);
    }
}

pub fn marker(id: &str, kind: EntityKind) -> MarkerDescriptor {
    MarkerDescriptor {
        id: id.into(),
        position: LatLng::new(61.2, -149.9),
        icon_ref: "/static/img/marker.png".to_string(),
        info_content: format!("<b>{}</b>", id),
        kind,
        heading: None,
    }
}

pub fn locomotive(id: &str) -> MarkerDescriptor {
    marker(id, EntityKind::Locomotive)
}

pub fn base(id: &str) -> MarkerDescriptor {
    marker(id, EntityKind::Base)
}

pub fn snapshot_with(markers: Vec<MarkerDescriptor>) -> Snapshot {
    Snapshot {
        table_fragment: "<table></table>".to_string(),
        markers,
        ..Snapshot::default()
    }
}
