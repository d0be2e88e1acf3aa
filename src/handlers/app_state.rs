/// Application state handlers that respond to events
use anyhow::Result;
use ratatui::layout::Rect;

use crate::events::{AppEvent, EventBus};
use crate::App;

/// App state handler that manages application state in response to events
pub struct AppStateHandler;

impl AppStateHandler {
    /// Subscribe to all relevant events
    pub fn subscribe(&self, event_bus: &EventBus) {
        event_bus.subscribe("quit", Self::handle_quit);
        event_bus.subscribe("resize", Self::handle_resize);
        event_bus.subscribe("execute_command", Self::handle_execute_command);
    }

    /// Handle quit events
    fn handle_quit(app: &mut App, _event: &AppEvent) -> Result<()> {
        app.running = false;
        Ok(())
    }

    /// Handle terminal resizes by laying the workspace out again
    fn handle_resize(app: &mut App, event: &AppEvent) -> Result<()> {
        if let AppEvent::Resize { width, height } = *event {
            app.workspace.resize(editor_area(width, height));
        }
        Ok(())
    }

    /// Handle command execution requests
    fn handle_execute_command(app: &mut App, event: &AppEvent) -> Result<()> {
        if let AppEvent::ExecuteCommand { id } = event {
            app.execute_command(id)?;
        }
        Ok(())
    }
}

/// Area left for editors once the status line is taken off the bottom
pub fn editor_area(width: u16, height: u16) -> Rect {
    Rect::new(0, 0, width, height.saturating_sub(1))
}
