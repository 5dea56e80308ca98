//! One refresh cycle: gate the request, then settle its result into the view.

use shared::{ContentRequest, DashboardError, Snapshot};

use crate::scheduler::{FinishOutcome, RefreshGate, RefreshTicket, RefreshTrigger};
use crate::surface::MapSurface;
use crate::table::{TableReconciler, TableUpdate};
use crate::view_state::{DashboardViewState, ReconcileReport};

/// How a resolved request was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum Settled {
    Applied {
        table: TableUpdate,
        report: ReconcileReport,
        follow_up: bool,
    },
    /// The view was left as it was.
    Failed {
        error: DashboardError,
        follow_up: bool,
    },
    /// Not the outstanding request.
    Stale,
}

impl Settled {
    /// An explicit refresh waited on this request and must be issued now.
    pub fn wants_follow_up(&self) -> bool {
        match self {
            Self::Applied { follow_up, .. } | Self::Failed { follow_up, .. } => *follow_up,
            Self::Stale => false,
        }
    }
}

/// View state, table state and the in-flight gate, driven together.
pub struct RefreshCycle<S: MapSurface> {
    view_state: DashboardViewState<S>,
    table: TableReconciler,
    gate: RefreshGate,
}

impl<S: MapSurface> Default for RefreshCycle<S> {
    fn default() -> Self {
        Self {
            view_state: DashboardViewState::new(),
            table: TableReconciler::default(),
            gate: RefreshGate::default(),
        }
    }
}

impl<S: MapSurface> RefreshCycle<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_state(&self) -> &DashboardViewState<S> {
        &self.view_state
    }

    pub fn view_state_mut(&mut self) -> &mut DashboardViewState<S> {
        &mut self.view_state
    }

    /// The request to send, unless one is already in flight.
    pub fn begin(&mut self, trigger: RefreshTrigger) -> Option<(RefreshTicket, ContentRequest)> {
        let ticket = self.gate.try_begin(trigger)?;
        Some((ticket, self.view_state.selection().content_request()))
    }

    /// Failures and stale results never touch the surface.
    pub fn settle(
        &mut self,
        ticket: RefreshTicket,
        result: Result<Snapshot, DashboardError>,
        surface: &mut S,
    ) -> Settled {
        let follow_up = match self.gate.finish(ticket) {
            FinishOutcome::Stale => return Settled::Stale,
            FinishOutcome::Apply => false,
            FinishOutcome::ApplyThenRefresh => true,
        };

        match result {
            Ok(snapshot) => {
                let table = self
                    .table
                    .apply(&snapshot, self.view_state.selection().selected_id());
                let report = self.view_state.reconcile(&snapshot, surface);
                Settled::Applied {
                    table,
                    report,
                    follow_up,
                }
            }
            Err(error) => Settled::Failed { error, follow_up },
        }
    }
}
