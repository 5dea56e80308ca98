//! Google Maps JS API bindings and the map surface driven by the reconciler.

use futures::channel::mpsc::UnboundedSender;
use reconciler::surface::LineGlyph;
use reconciler::{LineStyle, MapSurface};
use serde::Serialize;
use shared::{EntityId, LatLng, MapSection, MarkerDescriptor};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::dashboard::DashboardEvent;

#[wasm_bindgen(js_namespace = ["google", "maps"])]
extern "C" {
    #[wasm_bindgen(js_name = Map)]
    type GoogleMap;

    #[wasm_bindgen(constructor, js_class = "Map")]
    fn new(element: &HtmlElement, options: &JsValue) -> GoogleMap;
}

#[wasm_bindgen(js_namespace = ["google", "maps"])]
extern "C" {
    type Marker;

    #[wasm_bindgen(constructor)]
    fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setMap)]
    fn set_map(this: &Marker, map: &JsValue);

    #[wasm_bindgen(method, js_name = addListener)]
    fn add_listener(this: &Marker, event: &str, handler: &js_sys::Function) -> JsValue;
}

#[wasm_bindgen(js_namespace = ["google", "maps"])]
extern "C" {
    type Polyline;

    #[wasm_bindgen(constructor)]
    fn new(options: &JsValue) -> Polyline;

    #[wasm_bindgen(method, js_name = setMap)]
    fn set_map(this: &Polyline, map: &JsValue);
}

#[wasm_bindgen(js_namespace = ["google", "maps"])]
extern "C" {
    type InfoWindow;

    #[wasm_bindgen(constructor)]
    fn new(options: &JsValue) -> InfoWindow;

    #[wasm_bindgen(method)]
    fn open(this: &InfoWindow, map: &GoogleMap, anchor: &Marker);

    #[wasm_bindgen(method)]
    fn close(this: &InfoWindow);

    #[wasm_bindgen(method, js_name = addListener)]
    fn add_listener(this: &InfoWindow, event: &str, handler: &js_sys::Function) -> JsValue;
}

#[wasm_bindgen(js_namespace = ["google", "maps", "event"])]
extern "C" {
    #[wasm_bindgen(js_name = clearInstanceListeners)]
    fn clear_instance_listeners(instance: &JsValue);
}

// ===== OPTION OBJECTS =====

#[derive(Serialize)]
struct MapOptions {
    center: LatLng,
    zoom: u8,
}

#[derive(Serialize)]
struct MarkerOptions<'a> {
    position: LatLng,
    icon: &'a str,
    title: &'a str,
}

#[derive(Serialize)]
struct InfoWindowOptions<'a> {
    content: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PolylineOptions<'a> {
    path: &'a [LatLng],
    stroke_opacity: f64,
    icons: [IconSequence; 1],
}

#[derive(Serialize, Debug)]
struct IconSequence {
    icon: Symbol,
    offset: &'static str,
    repeat: &'static str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Symbol {
    path: &'static str,
    stroke_opacity: f64,
    stroke_color: &'static str,
    scale: f64,
}

impl From<LineGlyph> for Symbol {
    fn from(glyph: LineGlyph) -> Self {
        Self {
            path: glyph.path,
            stroke_opacity: glyph.stroke_opacity,
            stroke_color: glyph.stroke_color,
            scale: glyph.scale,
        }
    }
}

/// The line itself is transparent; only the repeated glyph is visible.
pub(crate) fn polyline_options(path: &[LatLng], style: LineStyle) -> PolylineOptions<'_> {
    PolylineOptions {
        path,
        stroke_opacity: 0.0,
        icons: [IconSequence {
            icon: style.glyph().into(),
            offset: "0px",
            repeat: LineStyle::REPEAT,
        }],
    }
}

fn js_options<T: Serialize>(options: &T) -> JsValue {
    serde_wasm_bindgen::to_value(options).unwrap_or_else(|error| {
        zoon::eprintln!("Failed to convert map options: {}", error);
        JsValue::UNDEFINED
    })
}

pub fn maps_api_loaded() -> bool {
    web_sys::window()
        .and_then(|window| js_sys::Reflect::get(&window, &"google".into()).ok())
        .and_then(|google| js_sys::Reflect::get(&google, &"maps".into()).ok())
        .is_some_and(|maps| !maps.is_undefined())
}

// ===== SURFACE =====

pub struct GoogleMarker {
    marker: Marker,
    _on_click: Closure<dyn FnMut()>,
}

pub struct GooglePolyline(Polyline);

pub struct GoogleInfoWindow {
    window: InfoWindow,
    _on_close_click: Closure<dyn FnMut()>,
}

/// Status map; clicks are forwarded to the dashboard event loop.
pub struct GoogleMapSurface {
    map: GoogleMap,
    events: UnboundedSender<DashboardEvent>,
}

impl GoogleMapSurface {
    pub fn new(
        container: &HtmlElement,
        settings: &MapSection,
        events: UnboundedSender<DashboardEvent>,
    ) -> Self {
        let options = MapOptions {
            center: settings.center,
            zoom: settings.zoom,
        };
        Self {
            map: GoogleMap::new(container, &js_options(&options)),
            events,
        }
    }

    fn forward(&self, event: impl Fn() -> DashboardEvent + 'static) -> Closure<dyn FnMut()> {
        let events = self.events.clone();
        Closure::new(move || {
            let _ = events.unbounded_send(event());
        })
    }
}

impl MapSurface for GoogleMapSurface {
    type Marker = GoogleMarker;
    type Polyline = GooglePolyline;
    type InfoWindow = GoogleInfoWindow;

    fn create_marker(&mut self, descriptor: &MarkerDescriptor) -> GoogleMarker {
        let options = MarkerOptions {
            position: descriptor.position,
            icon: &descriptor.icon_ref,
            title: descriptor.id.as_str(),
        };
        let marker = Marker::new(&js_options(&options));
        marker.set_map(&self.map);

        let id = descriptor.id.clone();
        let on_click = self.forward(move || DashboardEvent::MarkerClicked(id.clone()));
        marker.add_listener("click", on_click.as_ref().unchecked_ref());

        GoogleMarker {
            marker,
            _on_click: on_click,
        }
    }

    fn detach_marker(&mut self, marker: GoogleMarker) {
        marker.marker.set_map(&JsValue::NULL);
        clear_instance_listeners(&marker.marker);
    }

    fn create_polyline(&mut self, path: &[LatLng], style: LineStyle) -> GooglePolyline {
        let polyline = Polyline::new(&js_options(&polyline_options(path, style)));
        polyline.set_map(&self.map);
        GooglePolyline(polyline)
    }

    fn detach_polyline(&mut self, polyline: GooglePolyline) {
        polyline.0.set_map(&JsValue::NULL);
    }

    fn open_info_window(
        &mut self,
        entity_id: &EntityId,
        marker: &GoogleMarker,
        content: &str,
    ) -> GoogleInfoWindow {
        let window = InfoWindow::new(&js_options(&InfoWindowOptions { content }));

        let id = entity_id.clone();
        let on_close_click = self.forward(move || DashboardEvent::InfoWindowClosed(id.clone()));
        window.add_listener("closeclick", on_close_click.as_ref().unchecked_ref());
        window.open(&self.map, &marker.marker);

        GoogleInfoWindow {
            window,
            _on_close_click: on_close_click,
        }
    }

    fn close_info_window(&mut self, window: GoogleInfoWindow) {
        window.window.close();
        clear_instance_listeners(&window.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connected_line_is_transparent_with_yellow_glyph() {
        let path = [LatLng::new(61.2, -149.9), LatLng::new(61.3, -149.8)];
        let json = serde_json::to_value(polyline_options(&path, LineStyle::Connected)).unwrap();

        assert_eq!(json["strokeOpacity"], 0.0);
        assert_eq!(json["path"][1]["lng"], -149.8);
        assert_eq!(json["icons"][0]["repeat"], "10px");
        assert_eq!(json["icons"][0]["icon"]["strokeColor"], "#ffff00");
        assert_eq!(json["icons"][0]["icon"]["path"], "M 0, -2 1, 1");
    }

    #[test]
    fn no_connection_glyph_is_red() {
        let json = serde_json::to_value(polyline_options(&[], LineStyle::NoConnection)).unwrap();

        assert_eq!(json["icons"][0]["icon"]["strokeColor"], "#ff0000");
        assert_eq!(json["icons"][0]["icon"]["strokeOpacity"], 0.6);
    }
}
