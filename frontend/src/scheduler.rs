use std::time::Duration;

use futures::channel::mpsc::UnboundedSender;
use reconciler::TimerBackend;
use zoon::*;

use crate::dashboard::DashboardEvent;

/// Repeating refresh ticks as droppable zoon tasks; dropping the handle
/// cancels the loop before its next tick.
pub struct ZoonIntervals {
    events: UnboundedSender<DashboardEvent>,
}

impl ZoonIntervals {
    pub fn new(events: UnboundedSender<DashboardEvent>) -> Self {
        Self { events }
    }
}

impl TimerBackend for ZoonIntervals {
    type Handle = TaskHandle;

    fn start_interval(&mut self, interval: Duration) -> TaskHandle {
        let events = self.events.clone();
        let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        Task::start_droppable(async move {
            loop {
                Timer::sleep(millis).await;
                if events.unbounded_send(DashboardEvent::Tick).is_err() {
                    break;
                }
            }
        })
    }

    fn cancel(&mut self, handle: TaskHandle) {
        drop(handle);
    }
}
