use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::application::CyclePublisher;
use crate::domain::{CycleComplete, DebounceTimer};

/// Called from the sensor driver on each activation edge.
///
/// Never touches the network: accepted activations are queued on the
/// publisher and fanned out by the dispatch loop inside the runtime.
pub struct SensorEdgeHandler {
    timer: Arc<DebounceTimer>,
    cooldown: TimeDelta,
    bus: Box<dyn CyclePublisher>,
}

impl SensorEdgeHandler {
    pub fn new(
        timer: Arc<DebounceTimer>,
        cooldown: TimeDelta,
        bus: impl CyclePublisher + 'static,
    ) -> Self {
        Self {
            timer,
            cooldown,
            bus: Box::new(bus),
        }
    }

    pub fn on_edge(&self) -> bool {
        self.on_edge_at(Utc::now())
    }

    /// Returns whether the activation was accepted.
    pub fn on_edge_at(&self, now: DateTime<Utc>) -> bool {
        tracing::info!(
            at = %now,
            last = ?self.timer.last_fired_at(),
            cooldown_minutes = self.cooldown.num_minutes(),
            "light sensor activated"
        );

        if !self.timer.try_fire(now, self.cooldown) {
            tracing::debug!("within cooldown, not notifying");
            return false;
        }

        if !self.bus.publish(CycleComplete::new(now)) {
            tracing::error!("dispatch loop is gone, cycle complete event dropped");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<CycleComplete>>>,
        closed: bool,
    }

    impl CyclePublisher for Recorder {
        fn publish(&self, event: CycleComplete) -> bool {
            self.events.lock().unwrap().push(event);
            !self.closed
        }
    }

    #[test]
    fn accepted_edges_reach_the_publisher() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let edge = SensorEdgeHandler::new(
            Arc::new(DebounceTimer::new()),
            TimeDelta::minutes(30),
            Recorder {
                events: Arc::clone(&events),
                closed: false,
            },
        );
        let t = Utc::now();

        assert!(edge.on_edge_at(t));
        assert!(!edge.on_edge_at(t + TimeDelta::minutes(5)));
        assert_eq!(*events.lock().unwrap(), vec![CycleComplete::new(t)]);
    }

    #[test]
    fn closed_publisher_still_consumes_the_cooldown() {
        let timer = Arc::new(DebounceTimer::new());
        let edge = SensorEdgeHandler::new(
            Arc::clone(&timer),
            TimeDelta::minutes(30),
            Recorder {
                closed: true,
                ..Recorder::default()
            },
        );
        let t = Utc::now();

        assert!(edge.on_edge_at(t));
        assert_eq!(timer.last_fired_at(), Some(t));
    }
}
