use crate::event::{AppEvent, EventSender};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::debug;

/// The repeating countdown tick. At most one may be live at a time.
pub trait Ticker {
    fn start(&mut self);
    fn stop(&mut self);
}

pub struct IntervalTicker {
    runtime_handle: Handle,
    events: EventSender,
    period: Duration,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicker {
    pub fn new(runtime_handle: Handle, events: EventSender, period: Duration) -> Self {
        Self {
            runtime_handle,
            events,
            period,
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Ticker for IntervalTicker {
    fn start(&mut self) {
        self.stop();

        let events = self.events.clone();
        let period = self.period;
        self.task = Some(self.runtime_handle.spawn(async move {
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !events.send(AppEvent::Tick) {
                    break;
                }
            }
        }));
        debug!(period_ms = period.as_millis() as u64, "countdown ticker started");
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("countdown ticker stopped");
        }
    }
}

impl Drop for IntervalTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
