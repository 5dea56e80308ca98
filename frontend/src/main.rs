//! PTC-Sim dashboard client

use std::sync::OnceLock;
use zoon::*;

/// Keeps the startup task alive for the lifetime of the page.
static MAIN_TASK: OnceLock<TaskHandle> = OnceLock::new();

mod app;
mod connection;
mod dashboard;
mod error_display;
mod fetcher;
mod google_maps;
mod scheduler;
mod shuffle_text;
mod table_view;
mod views;

pub fn main() {
    let handle = Task::start_droppable(async {
        let app = crate::app::DashboardApp::new().await;
        let root_element = app.root();
        start_app("app", move || root_element);
    });
    let _ = MAIN_TASK.set(handle);
}
