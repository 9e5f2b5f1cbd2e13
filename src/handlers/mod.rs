//! Event handlers for session state changes

pub mod composite;
pub mod console;
pub mod telegram;

// Re-export for convenience
pub use composite::CompositeEventHandler;
pub use console::ConsoleEventHandler;
pub use telegram::TelegramEventHandler;
