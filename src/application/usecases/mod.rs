pub mod commands;
pub mod dispatch;
pub mod handle_event;
pub mod resolve_watchers;

pub use commands::*;
pub use dispatch::*;
pub use handle_event::*;
pub use resolve_watchers::*;
