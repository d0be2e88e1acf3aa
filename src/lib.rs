//! Terminal editor with column guidelines drawn over every editor surface

pub mod app;
pub mod buffer;
pub mod config;
pub mod events;
pub mod handlers;
pub mod input_system;
pub mod plugins;
pub mod ui;
pub mod widgets;
pub mod workspace;

// Re-export main types for convenience
pub use app::{App, CommandMode};
pub use buffer::Buffer;
