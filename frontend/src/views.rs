use shared::{LegendEntry, RefreshSection, SimulationSection};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::HtmlElement;
use zoon::*;

use crate::app::ControlPanel;
use crate::table_view::TABLE_CONTAINER_ID;

const MAP_CONTAINER_ID: &str = "status-map";
const LEGEND_ID: &str = "map-legend";
const MAP_HEIGHT_PX: &str = "600px";

pub fn root(
    controls: ControlPanel,
    legend: Vec<LegendEntry>,
    on_map_container: impl FnOnce(HtmlElement) + 'static,
) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(12))
        .item(control_panel(controls))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(16))
                .s(Align::new().top())
                .item(table_panel())
                .item(map_panel(legend_markup(&legend), on_map_container)),
        )
}

fn control_panel(controls: ControlPanel) -> impl Element {
    let refresh = controls.refresh.clone();
    let simulation = controls.simulation.clone();

    Row::new()
        .s(Gap::new().x(16))
        .s(Align::new().center_y())
        .item(labeled_slider(
            "Refresh every",
            slider("refresh-interval", refresh.min_interval_secs, refresh.max_interval_secs, controls.refresh_secs.get(), {
                let controls = controls.clone();
                move |value| controls.refresh_interval_changed(interval_from_slider(value, &refresh))
            }),
            controls.refresh_secs.signal().map(interval_readout),
        ))
        .item(labeled_slider(
            "Sim speed",
            slider("time-multiplicand", 1, simulation.max_percent.max(1), controls.time_percent.get(), {
                let controls = controls.clone();
                move |value| controls.time_multiplicand_changed(percent_from_slider(value, &simulation))
            }),
            controls.time_percent.signal().map(percent_readout),
        ))
}

fn labeled_slider(
    label: &'static str,
    slider: impl Element,
    readout: impl Signal<Item = String> + Unpin + 'static,
) -> impl Element {
    Row::new()
        .s(Gap::new().x(8))
        .s(Align::new().center_y())
        .item(El::new().s(Font::new().size(12).weight(FontWeight::Bold)).child(label))
        .item(slider)
        .item(El::new().s(Font::new().size(12).no_wrap()).child(Text::with_signal(readout)))
}

/// Range input; `on_input` gets the raw value on every drag step.
fn slider(id: &'static str, min: u32, max: u32, value: u32, on_input: impl Fn(u32) + 'static) -> impl Element {
    RawHtmlEl::<web_sys::HtmlElement>::new("input")
        .attr("type", "range")
        .attr("id", id)
        .attr("min", &min.to_string())
        .attr("max", &max.to_string())
        .attr("value", &value.to_string())
        .after_insert(move |element| {
            let input: web_sys::HtmlInputElement = element.unchecked_into();
            let listener = Closure::wrap(Box::new({
                let input = input.clone();
                move || {
                    if let Ok(value) = input.value().parse::<u32>() {
                        on_input(value);
                    }
                }
            }) as Box<dyn Fn()>);
            let _ = input.add_event_listener_with_callback("input", listener.as_ref().unchecked_ref());
            listener.forget();
        })
}

fn table_panel() -> impl Element {
    El::new()
        .s(Width::fill())
        .update_raw_el(|raw_el| raw_el.attr("id", TABLE_CONTAINER_ID))
}

fn map_panel(legend_html: String, on_map_container: impl FnOnce(HtmlElement) + 'static) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(8))
        .item(
            El::new()
                .s(Width::fill())
                .update_raw_el(move |raw_el| {
                    raw_el
                        .attr("id", MAP_CONTAINER_ID)
                        .style("height", MAP_HEIGHT_PX)
                        .after_insert(on_map_container)
                }),
        )
        .item(El::new().update_raw_el(move |raw_el| {
            raw_el
                .attr("id", LEGEND_ID)
                .after_insert(move |element| element.set_inner_html(&legend_html))
        }))
}

fn legend_markup(legend: &[LegendEntry]) -> String {
    let entries: String = legend
        .iter()
        .map(|entry| format!(r#"<div><img src="{}"> {}</div>"#, entry.icon, entry.label))
        .collect();
    format!("<b>Coverage Legend:</b>{}", entries)
}

pub fn interval_from_slider(value: u32, refresh: &RefreshSection) -> u32 {
    value
        .min(refresh.max_interval_secs)
        .max(refresh.min_interval_secs)
}

pub fn percent_from_slider(value: u32, simulation: &SimulationSection) -> u32 {
    value.clamp(1, simulation.max_percent.max(1))
}

fn interval_readout(secs: u32) -> String {
    format!("{}s", secs)
}

fn percent_readout(percent: u32) -> String {
    format!("{}%", percent)
}
