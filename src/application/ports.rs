use crate::domain::{CycleComplete, Profile, UserId, Watcher};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("chat error: {0}")]
    Chat(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("sensor error: {0}")]
    Sensor(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid config: {0}")]
    Config(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// The chat platform as seen by the bot.
#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn send_direct_message(&self, user: UserId, text: &str) -> AppResult<()>;

    async fn send_channel_message(&self, channel: &str, text: &str) -> AppResult<()>;

    async fn fetch_user(&self, user: UserId) -> AppResult<Profile>;

    /// First member whose username matches exactly.
    async fn lookup_member_by_name(&self, name: &str) -> AppResult<Option<Profile>>;
}

/// The watch list. Every operation completes without suspending, so a
/// check-then-insert can't interleave with another command.
pub trait WatcherRepository: Send + Sync {
    /// Returns the entry and whether it was newly created.
    fn add(&self, id: UserId) -> AppResult<(Watcher, bool)>;

    /// `None` when the id was not registered.
    fn remove(&self, id: UserId) -> AppResult<Option<Watcher>>;

    fn get(&self, id: UserId) -> AppResult<Option<Watcher>>;

    /// Snapshot in insertion order.
    fn list(&self) -> AppResult<Vec<Watcher>>;

    /// Fill in profile data; `false` if the watcher is gone by now.
    fn apply_profile(&self, profile: &Profile) -> AppResult<bool>;
}

/// Digital light sensor input.
pub trait LightSensor: Send {
    /// Register the callback invoked on every activation edge. Runs on the
    /// driver's own thread, never inside the async runtime.
    fn on_activated(&mut self, callback: Box<dyn FnMut() + Send>) -> AppResult<()>;
}

/// Queue for accepted sensor activations. Called from the sensor driver's
/// thread, so it must not block or need a runtime.
pub trait CyclePublisher: Send + Sync {
    /// `false` once nothing is draining the queue.
    fn publish(&self, event: CycleComplete) -> bool;
}

/// Receiving end drained by the dispatch loop.
pub type CycleReceiver = tokio::sync::mpsc::UnboundedReceiver<CycleComplete>;
