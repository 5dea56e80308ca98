use futures::channel::mpsc::UnboundedSender;
use reconciler::TableUpdate;
use shared::{EntityId, ShuffleConfig};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;

use crate::dashboard::DashboardEvent;
use crate::shuffle_text::{reveal_with_shuffle, supersede_running_shuffles};

pub const TABLE_CONTAINER_ID: &str = "locos-table";
pub const SELECTED_ROW_CLASS: &str = "clicked";

pub fn render_table(update: &TableUpdate, shuffle: ShuffleConfig) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    let Some(container) = document.get_element_by_id(TABLE_CONTAINER_ID) else {
        zoon::eprintln!("Table container #{} missing", TABLE_CONTAINER_ID);
        return;
    };
    container.set_inner_html(&update.html);
    supersede_running_shuffles();

    if let Some(selected) = &update.selected_row {
        if let Some(row) = document.get_element_by_id(selected.as_str()) {
            let _ = row.class_list().add_1(SELECTED_ROW_CLASS);
        }
    }

    for field_id in &update.changed_fields {
        reveal_with_shuffle(field_id, shuffle, || {});
    }
}

/// Names under which server-rendered rows call back into the dashboard.
const ROW_CLICK_HOOKS: [&str; 2] = ["dashboard_select_entity", "home_select_loco"];

/// Installs the row click hooks on `window`.
pub fn expose_row_click_hook(events: UnboundedSender<DashboardEvent>) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let on_row_click = Closure::wrap(Box::new(move |id: String| {
        let _ = events.unbounded_send(DashboardEvent::EntitySelected(EntityId::from(id)));
    }) as Box<dyn Fn(String)>);

    for name in ROW_CLICK_HOOKS {
        js_sys::Reflect::set(&window, &name.into(), on_row_click.as_ref().unchecked_ref()).ok();
    }
    on_row_click.forget();
}
