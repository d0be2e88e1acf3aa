use anyhow::Result;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::config::SHOW_LINE_NUMBERS;
use crate::events::{AppEvent, EventBus};
use crate::plugins::guidelines::OPEN_PREFERENCES_COMMAND;
use crate::{App, CommandMode};

/// Rows moved by PageUp / PageDown
const PAGE_ROWS: isize = 20;

/// Keyboard handler that processes keyboard events
pub struct KeyboardHandler;

impl KeyboardHandler {
    /// Subscribe to keyboard events
    pub fn subscribe(&self, event_bus: &EventBus) {
        event_bus.subscribe("key_input", Self::handle_key_event);
    }

    /// Handle keyboard events
    fn handle_key_event(app: &mut App, event: &AppEvent) -> Result<()> {
        let AppEvent::KeyInput(key) = event else {
            return Ok(());
        };

        // Ignore release/repeat events reported by some terminals
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        // A modal dialog owns the keyboard while it is open
        if app.settings_dialog.is_some() {
            return Ok(());
        }

        match app.command_mode {
            CommandMode::Normal => Self::handle_normal_mode_key(app, *key),
            CommandMode::Command => Self::handle_command_mode_key(app, *key),
        }
    }

    /// Handle keyboard input in normal mode
    fn handle_normal_mode_key(app: &mut App, key: KeyEvent) -> Result<()> {
        match (key.code, key.modifiers) {
            (KeyCode::Char('p'), KeyModifiers::ALT) => {
                // Open command palette with Alt+P
                app.command_mode = CommandMode::Command;
                app.command_input.clear();
                app.palette_selected = 0;
            }
            (KeyCode::Char('q'), KeyModifiers::CONTROL) => {
                app.events.publish(AppEvent::Quit)?;
            }
            (KeyCode::Char('g'), KeyModifiers::ALT) => {
                app.events.publish(AppEvent::ExecuteCommand {
                    id: OPEN_PREFERENCES_COMMAND.into(),
                })?;
            }
            (KeyCode::Char('n'), KeyModifiers::ALT) => {
                let show = app.show_line_numbers();
                app.preferences.set(SHOW_LINE_NUMBERS, !show)?;
            }
            (KeyCode::Char('w'), KeyModifiers::CONTROL) => {
                app.workspace.focus_next_pane();
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                app.workspace.cycle_layout();
            }
            (KeyCode::Char('m'), KeyModifiers::ALT) => {
                if !app.workspace.move_active_view_to_other_pane() {
                    app.set_status_message("Split the workspace first (Ctrl+L)");
                }
            }
            (KeyCode::Char('i'), KeyModifiers::ALT) => {
                app.workspace.toggle_inline_editor();
            }
            (KeyCode::Tab, KeyModifiers::NONE) => {
                app.workspace.next_view();
            }
            (KeyCode::BackTab, _) | (KeyCode::Tab, KeyModifiers::SHIFT) => {
                app.workspace.prev_view();
            }
            (KeyCode::Up, _) => app.workspace.scroll_active(-1, 0),
            (KeyCode::Down, _) => app.workspace.scroll_active(1, 0),
            (KeyCode::Left, _) => app.workspace.scroll_active(0, -1),
            (KeyCode::Right, _) => app.workspace.scroll_active(0, 1),
            (KeyCode::PageUp, _) => app.workspace.scroll_active(-PAGE_ROWS, 0),
            (KeyCode::PageDown, _) => app.workspace.scroll_active(PAGE_ROWS, 0),
            (KeyCode::Esc, _) => app.clear_status_message(),
            _ => {}
        }

        Ok(())
    }

    /// Handle keyboard input while the command palette is open
    fn handle_command_mode_key(app: &mut App, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => app.close_command_palette(),
            KeyCode::Enter => {
                let selected = app
                    .palette_suggestions()
                    .get(app.palette_selected)
                    .map(|(id, _)| id.clone());
                app.close_command_palette();
                if let Some(id) = selected {
                    app.events.publish(AppEvent::ExecuteCommand { id: id.into() })?;
                }
            }
            KeyCode::Up => {
                app.palette_selected = app.palette_selected.saturating_sub(1);
            }
            KeyCode::Down => {
                let count = app.palette_suggestions().len();
                if app.palette_selected + 1 < count {
                    app.palette_selected += 1;
                }
            }
            KeyCode::Backspace => {
                app.command_input.pop();
                app.palette_selected = 0;
            }
            KeyCode::Char(c) => {
                app.command_input.push(c);
                app.palette_selected = 0;
            }
            _ => {}
        }

        Ok(())
    }
}
