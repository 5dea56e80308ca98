use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use shared::{DashboardConfig, RefreshSection, SessionVar, SimulationSection};
use zoon::*;

use crate::connection::load_dashboard_config;
use crate::dashboard::{Dashboard, DashboardEvent};
use crate::fetcher::push_session_var;
use crate::table_view::expose_row_click_hook;
use crate::views;

/// Slider state shared between the view and the refresh loop.
#[derive(Clone)]
pub struct ControlPanel {
    pub refresh: RefreshSection,
    pub simulation: SimulationSection,
    pub refresh_secs: Mutable<u32>,
    pub time_percent: Mutable<u32>,
    session_var_url: String,
    events: UnboundedSender<DashboardEvent>,
}

impl ControlPanel {
    fn new(config: &DashboardConfig, events: UnboundedSender<DashboardEvent>) -> Self {
        Self {
            refresh: config.refresh.clone(),
            simulation: config.simulation.clone(),
            refresh_secs: Mutable::new(config.refresh.interval_secs),
            time_percent: Mutable::new(config.simulation.time_multiplicand_percent),
            session_var_url: config.endpoints.session_var.clone(),
            events,
        }
    }

    pub fn refresh_interval_changed(&self, secs: u32) {
        self.refresh_secs.set_neq(secs);
        let _ = self.events.unbounded_send(DashboardEvent::RefreshIntervalChanged(secs));
    }

    pub fn time_multiplicand_changed(&self, percent: u32) {
        self.time_percent.set_neq(percent);
        let var = SessionVar {
            key: self.simulation.session_var_key.clone(),
            value: f64::from(percent) / 100.0,
        };
        Task::start(push_session_var(self.session_var_url.clone(), var));
    }
}

pub struct DashboardApp {
    config: DashboardConfig,
    controls: ControlPanel,
    events: UnboundedSender<DashboardEvent>,
    event_receiver: UnboundedReceiver<DashboardEvent>,
}

impl DashboardApp {
    pub async fn new() -> Self {
        let config = load_dashboard_config().await;
        let (events, event_receiver) = mpsc::unbounded();

        expose_row_click_hook(events.clone());

        Self {
            controls: ControlPanel::new(&config, events.clone()),
            config,
            events,
            event_receiver,
        }
    }

    /// The refresh loop starts once the map container is in the DOM.
    pub fn root(self) -> impl Element {
        let Self {
            config,
            controls,
            events,
            event_receiver,
        } = self;
        let legend = config.legend.clone();

        views::root(controls, legend, move |map_container| {
            Task::start(async move {
                if let Some(dashboard) = Dashboard::new(map_container, config, events).await {
                    dashboard.run(event_receiver).await;
                }
            });
        })
    }
}
