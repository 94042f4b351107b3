pub mod types;
pub mod event;
pub mod watcher;
pub mod policy;

pub use types::*;
pub use event::*;
pub use watcher::*;
pub use policy::*;
