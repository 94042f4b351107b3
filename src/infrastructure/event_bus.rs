use tokio::sync::mpsc;

use crate::application::{CyclePublisher, CycleReceiver};
use crate::domain::CycleComplete;

/// Hand-off from the sensor driver's thread into the async runtime.
///
/// Publishing never blocks and needs no runtime context, so it is safe
/// from a GPIO interrupt callback.
#[derive(Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<CycleComplete>,
}

impl EventBus {
    pub fn new() -> (Self, CycleReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CyclePublisher for EventBus {
    fn publish(&self, event: CycleComplete) -> bool {
        self.tx.send(event).is_ok()
    }
}
