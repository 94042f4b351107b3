pub mod context;
pub mod ports;
pub mod usecases;

pub use context::BotContext;
pub use ports::*;
