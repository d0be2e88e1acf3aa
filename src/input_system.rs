use crate::events::{AppEvent, EventBus};
use anyhow::{Context, Result};
use ratatui::crossterm::event::KeyEvent;

/// Input system that turns raw terminal input into events
pub struct InputSystem {
    event_bus: EventBus,
}

impl InputSystem {
    /// Create a new input system
    pub fn new(event_bus: EventBus) -> Self {
        Self { event_bus }
    }

    /// Handle keyboard input by publishing a key event
    pub fn handle_key_input(&self, key: KeyEvent) -> Result<()> {
        self.event_bus
            .publish(AppEvent::KeyInput(key))
            .context("Failed to publish key input event")
    }

    /// Handle a terminal resize by publishing a resize event
    pub fn handle_resize(&self, width: u16, height: u16) -> Result<()> {
        self.event_bus
            .publish(AppEvent::Resize { width, height })
            .context("Failed to publish resize event")
    }
}
