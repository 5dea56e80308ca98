use shared::{EntityId, LatLng, MarkerDescriptor};

/// Stroke used for a connectivity polyline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Connected,
    NoConnection,
}

/// Glyph repeated along an otherwise invisible polyline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineGlyph {
    pub path: &'static str,
    pub stroke_opacity: f64,
    pub stroke_color: &'static str,
    pub scale: f64,
}

impl LineStyle {
    pub const REPEAT: &'static str = "10px";

    pub fn glyph(self) -> LineGlyph {
        match self {
            Self::Connected => LineGlyph {
                path: "M 0, -2 1, 1",
                stroke_opacity: 0.8,
                stroke_color: "#ffff00",
                scale: 2.0,
            },
            Self::NoConnection => LineGlyph {
                path: "M 0,-1 0,1",
                stroke_opacity: 0.6,
                stroke_color: "#ff0000",
                scale: 2.0,
            },
        }
    }
}

/// Map primitives the reconciler drives.
///
/// Handles are owned by the caller of `create_*`/`open_*` and given back on
/// detach/close, so a handle that was torn down cannot be used again.
///
/// Implementations route user interaction back as events: a click on a
/// marker created by `create_marker` must reach
/// [`DashboardViewState::on_marker_click`](crate::DashboardViewState::on_marker_click)
/// and a user close on a window opened by `open_info_window` must reach
/// [`DashboardViewState::on_info_window_closed`](crate::DashboardViewState::on_info_window_closed).
pub trait MapSurface {
    type Marker;
    type Polyline;
    type InfoWindow;

    fn create_marker(&mut self, descriptor: &MarkerDescriptor) -> Self::Marker;
    fn detach_marker(&mut self, marker: Self::Marker);

    fn create_polyline(&mut self, path: &[LatLng], style: LineStyle) -> Self::Polyline;
    fn detach_polyline(&mut self, polyline: Self::Polyline);

    /// Builds a fresh info-window with `content` and opens it on `marker`.
    fn open_info_window(
        &mut self,
        entity_id: &EntityId,
        marker: &Self::Marker,
        content: &str,
    ) -> Self::InfoWindow;
    fn close_info_window(&mut self, window: Self::InfoWindow);
}
