pub mod memory_store;
pub mod event_bus;
pub mod fake_chat;
pub mod serenity_chat;
#[cfg(feature = "gpio")]
pub mod gpio_sensor;
