//! The refresh loop. One task owns every piece of dashboard state; timers,
//! map listeners, sliders and table clicks only send it events.

use std::time::Duration;

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender};
use futures::stream::StreamExt;
use reconciler::{RefreshCycle, RefreshScheduler, RefreshTicket, RefreshTrigger, Settled};
use shared::{DashboardConfig, DashboardError, EntityId, EntityKind, Snapshot};
use web_sys::HtmlElement;
use zoon::*;

use crate::error_display::log_error_console_only;
use crate::fetcher::SnapshotFetcher;
use crate::google_maps::{GoogleMapSurface, maps_api_loaded};
use crate::scheduler::ZoonIntervals;
use crate::table_view::render_table;

const MAPS_API_POLL_MS: u32 = 50;
const MAPS_API_MAX_POLLS: u32 = 200;

pub enum DashboardEvent {
    Tick,
    EntitySelected(EntityId),
    MarkerClicked(EntityId),
    InfoWindowClosed(EntityId),
    SnapshotFetched {
        ticket: RefreshTicket,
        result: Result<Snapshot, DashboardError>,
    },
    RefreshIntervalChanged(u32),
}

pub struct Dashboard {
    config: DashboardConfig,
    surface: GoogleMapSurface,
    cycle: RefreshCycle<GoogleMapSurface>,
    fetcher: SnapshotFetcher,
    scheduler: RefreshScheduler<ZoonIntervals>,
    events: UnboundedSender<DashboardEvent>,
}

impl Dashboard {
    /// Waits for the Maps script, then builds the map inside `map_container`.
    pub async fn new(
        map_container: HtmlElement,
        config: DashboardConfig,
        events: UnboundedSender<DashboardEvent>,
    ) -> Option<Self> {
        let mut polls = 0;
        while !maps_api_loaded() {
            polls += 1;
            if polls > MAPS_API_MAX_POLLS {
                zoon::eprintln!("Google Maps API did not load, is map.api_key set?");
                return None;
            }
            Timer::sleep(MAPS_API_POLL_MS).await;
        }

        Some(Self {
            surface: GoogleMapSurface::new(&map_container, &config.map, events.clone()),
            cycle: RefreshCycle::new(),
            fetcher: SnapshotFetcher::new(&config),
            scheduler: RefreshScheduler::new(ZoonIntervals::new(events.clone())),
            config,
            events,
        })
    }

    pub async fn run(mut self, mut events: UnboundedReceiver<DashboardEvent>) {
        self.begin_refresh(RefreshTrigger::Explicit);
        self.scheduler
            .start(Duration::from_secs(self.config.refresh.interval_secs.into()));

        while let Some(event) = events.next().await {
            self.handle(event);
        }
    }

    fn handle(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Tick => self.begin_refresh(RefreshTrigger::Scheduled),
            DashboardEvent::EntitySelected(id) => {
                let kind = self.kind_of(&id);
                let change = self
                    .cycle
                    .view_state_mut()
                    .select_entity(id, kind, &mut self.surface);
                if let Some(released) = change.released {
                    zoon::println!("Released info window of {}", released);
                }
                self.begin_refresh(RefreshTrigger::Explicit);
            }
            DashboardEvent::MarkerClicked(id) => {
                self.cycle.view_state_mut().on_marker_click(&id, &mut self.surface);
            }
            DashboardEvent::InfoWindowClosed(id) => {
                self.cycle
                    .view_state_mut()
                    .on_info_window_closed(&id, &mut self.surface);
            }
            DashboardEvent::SnapshotFetched { ticket, result } => {
                let started = now_ms();
                let settled = self.cycle.settle(ticket, result, &mut self.surface);
                match &settled {
                    Settled::Applied { table, report, .. } => {
                        render_table(table, self.config.shuffle);
                        zoon::println!(
                            "Refreshed {} markers and {} lines, {} fields changed, client side took {:.1}ms",
                            report.markers,
                            report.polylines,
                            table.changed_fields.len(),
                            now_ms() - started
                        );
                    }
                    Settled::Failed { error, .. } => log_error_console_only(error),
                    Settled::Stale => {}
                }
                if settled.wants_follow_up() {
                    self.begin_refresh(RefreshTrigger::Explicit);
                }
            }
            DashboardEvent::RefreshIntervalChanged(secs) => {
                self.scheduler.reschedule(Duration::from_secs(secs.into()));
            }
        }
    }

    /// Entities missing from the current map are table rows, i.e. locomotives.
    fn kind_of(&self, id: &EntityId) -> EntityKind {
        self.cycle
            .view_state()
            .screen()
            .marker(id.as_str())
            .map(|marker| marker.kind)
            .unwrap_or(EntityKind::Locomotive)
    }

    fn begin_refresh(&mut self, trigger: RefreshTrigger) {
        let Some((ticket, request)) = self.cycle.begin(trigger) else {
            return;
        };
        let fetcher = self.fetcher.clone();
        let events = self.events.clone();
        Task::start(async move {
            let result = fetcher.fetch(&request).await;
            let _ = events.unbounded_send(DashboardEvent::SnapshotFetched { ticket, result });
        });
    }
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|window| window.performance())
        .map(|performance| performance.now())
        .unwrap_or(0.0)
}
