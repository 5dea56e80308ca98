//! Refresh cadence and the one-request-in-flight policy.

use std::time::Duration;

/// Starts and cancels repeating timers. Each handle owns exactly one timer.
pub trait TimerBackend {
    type Handle;

    fn start_interval(&mut self, interval: Duration) -> Self::Handle;
    fn cancel(&mut self, handle: Self::Handle);
}

/// Keeps exactly one repeating refresh timer alive.
pub struct RefreshScheduler<B: TimerBackend> {
    backend: B,
    active: Option<B::Handle>,
    interval: Option<Duration>,
}

impl<B: TimerBackend> RefreshScheduler<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            active: None,
            interval: None,
        }
    }

    pub fn start(&mut self, interval: Duration) {
        self.reschedule(interval);
    }

    /// Cancels the running timer, if any, before installing the new one.
    pub fn reschedule(&mut self, interval: Duration) {
        if let Some(handle) = self.active.take() {
            self.backend.cancel(handle);
        }
        self.active = Some(self.backend.start_interval(interval));
        self.interval = Some(interval);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.backend.cancel(handle);
        }
        self.interval = None;
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }
}

impl<B: TimerBackend> Drop for RefreshScheduler<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTrigger {
    /// The repeating timer fired.
    Scheduled,
    /// A user action asked for fresh content right now.
    Explicit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTicket(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishOutcome {
    Apply,
    /// Apply, then issue the explicit refresh that waited for this one.
    ApplyThenRefresh,
    /// Not the outstanding request; discard its result.
    Stale,
}

/// At most one content request is outstanding.
///
/// Scheduled ticks arriving meanwhile are dropped. Explicit requests are
/// coalesced into a single follow-up issued when the outstanding one finishes.
#[derive(Debug, Default)]
pub struct RefreshGate {
    next_ticket: u64,
    in_flight: Option<RefreshTicket>,
    follow_up: bool,
}

impl RefreshGate {
    pub fn try_begin(&mut self, trigger: RefreshTrigger) -> Option<RefreshTicket> {
        if self.in_flight.is_some() {
            if trigger == RefreshTrigger::Explicit {
                self.follow_up = true;
            }
            return None;
        }
        self.next_ticket += 1;
        let ticket = RefreshTicket(self.next_ticket);
        self.in_flight = Some(ticket);
        Some(ticket)
    }

    /// Called once the request behind `ticket` resolved, successfully or not.
    pub fn finish(&mut self, ticket: RefreshTicket) -> FinishOutcome {
        if self.in_flight != Some(ticket) {
            return FinishOutcome::Stale;
        }
        self.in_flight = None;
        if std::mem::take(&mut self.follow_up) {
            FinishOutcome::ApplyThenRefresh
        } else {
            FinishOutcome::Apply
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    #[derive(Default)]
    struct Timers {
        next: u64,
        active: HashSet<u64>,
        intervals: Vec<Duration>,
    }

    #[derive(Clone, Default)]
    struct CountingBackend(Rc<RefCell<Timers>>);

    impl TimerBackend for CountingBackend {
        type Handle = u64;

        fn start_interval(&mut self, interval: Duration) -> u64 {
            let mut timers = self.0.borrow_mut();
            timers.next += 1;
            let handle = timers.next;
            timers.active.insert(handle);
            timers.intervals.push(interval);
            handle
        }

        fn cancel(&mut self, handle: u64) {
            assert!(self.0.borrow_mut().active.remove(&handle), "timer {} cancelled twice", handle);
        }
    }

    #[test]
    fn rapid_reschedules_leave_one_timer() {
        let backend = CountingBackend::default();
        let mut scheduler = RefreshScheduler::new(backend.clone());
        scheduler.start(Duration::from_secs(5));

        for secs in 1..=50 {
            scheduler.reschedule(Duration::from_secs(secs % 7 + 1));
        }

        let timers = backend.0.borrow();
        assert_eq!(timers.active.len(), 1);
        assert_eq!(timers.intervals.len(), 51);
        assert_eq!(scheduler.interval(), Some(Duration::from_secs(50 % 7 + 1)));
    }

    #[test]
    fn stop_and_drop_cancel_the_timer() {
        let backend = CountingBackend::default();
        let mut scheduler = RefreshScheduler::new(backend.clone());
        scheduler.start(Duration::from_secs(5));
        scheduler.stop();
        assert!(backend.0.borrow().active.is_empty());
        assert!(!scheduler.is_running());

        scheduler.start(Duration::from_secs(2));
        drop(scheduler);
        assert!(backend.0.borrow().active.is_empty());
    }

    #[test]
    fn scheduled_tick_during_flight_is_dropped() {
        let mut gate = RefreshGate::default();
        let ticket = gate.try_begin(RefreshTrigger::Scheduled).unwrap();

        assert_eq!(gate.try_begin(RefreshTrigger::Scheduled), None);
        assert_eq!(gate.finish(ticket), FinishOutcome::Apply);
        assert!(!gate.is_in_flight());
    }

    #[test]
    fn explicit_requests_during_flight_coalesce() {
        let mut gate = RefreshGate::default();
        let ticket = gate.try_begin(RefreshTrigger::Scheduled).unwrap();

        assert_eq!(gate.try_begin(RefreshTrigger::Explicit), None);
        assert_eq!(gate.try_begin(RefreshTrigger::Explicit), None);
        assert_eq!(gate.finish(ticket), FinishOutcome::ApplyThenRefresh);

        let follow_up = gate.try_begin(RefreshTrigger::Explicit).unwrap();
        assert_eq!(gate.finish(follow_up), FinishOutcome::Apply);
    }

    #[test]
    fn stale_ticket_is_rejected() {
        let mut gate = RefreshGate::default();
        let first = gate.try_begin(RefreshTrigger::Scheduled).unwrap();
        gate.finish(first);
        let second = gate.try_begin(RefreshTrigger::Scheduled).unwrap();

        assert_eq!(gate.finish(first), FinishOutcome::Stale);
        assert!(gate.is_in_flight());
        assert_eq!(gate.finish(second), FinishOutcome::Apply);
    }
}
