use std::io::Stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use ratatui::{
    backend::CrosstermBackend,
    crossterm::event::{self, Event},
    layout::Rect,
    Terminal,
};
use tracing::{debug, warn};

use crate::buffer::Buffer;
use crate::config::{PreferenceKind, PreferencesManager, SHOW_LINE_NUMBERS};
use crate::events::{AppEvent, EventBus};
use crate::handlers::{AppStateHandler, KeyboardHandler};
use crate::input_system::InputSystem;
use crate::plugins::guidelines::{GuidelineRenderer, SettingsDialog};
use crate::plugins::{CommandManager, Menu, PluginManager};
use crate::workspace::Workspace;

/// Layout used until the terminal reports its real size
const DEFAULT_AREA: Rect = Rect {
    x: 0,
    y: 0,
    width: 80,
    height: 23,
};

/// Contains global state that needs to be shared
pub struct App {
    /// Whether the application is running
    pub running: bool,

    /// Command mode state
    pub command_mode: CommandMode,

    /// Command palette input
    pub command_input: String,

    /// Highlighted command palette entry
    pub palette_selected: usize,

    /// Message to display on status bar
    pub status_message: Option<String>,

    /// Directory where user preferences and logs are stored
    pub user_dir: PathBuf,

    /// Event bus shared by the host and plugins
    pub events: EventBus,

    /// Host preference store
    pub preferences: PreferencesManager,

    /// Panes and editor views
    pub workspace: Workspace,

    /// Guideline overlays and their cached settings
    pub guidelines: GuidelineRenderer,

    /// The guideline settings dialog, while open
    pub settings_dialog: Option<SettingsDialog>,

    /// Registered commands
    pub commands: CommandManager,

    /// The View menu
    pub view_menu: Menu,
}

/// Command input modes
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum CommandMode {
    /// Normal mode (no command input)
    Normal,

    /// Command palette mode
    Command,
}

impl App {
    pub async fn new() -> Result<Self> {
        Self::with_user_dir(default_user_dir(), Buffer::new()).or_else(|e| {
            warn!(error = %e, "falling back to in-memory preferences");
            Self::in_memory(Buffer::new())
        })
    }

    pub async fn with_file(file_path: &str) -> Result<Self> {
        let buffer = Buffer::from_path_async(PathBuf::from(file_path))
            .await
            .map_err(|e| anyhow!("Failed to open file '{}': {}", file_path, e))?;

        Self::with_user_dir(default_user_dir(), buffer)
    }

    /// Create an application whose preferences live in `user_dir`
    pub fn with_user_dir(user_dir: PathBuf, buffer: Buffer) -> Result<Self> {
        // Create user directory if it doesn't exist
        if !user_dir.exists() {
            std::fs::create_dir_all(&user_dir).with_context(|| {
                format!("Could not create user directory {}", user_dir.display())
            })?;
        }

        let mut preferences = PreferencesManager::new(&user_dir);
        if let Err(e) = preferences.load() {
            warn!(error = %e, "could not load preferences, using defaults");
        }

        Self::build(user_dir, preferences, buffer)
    }

    /// Create an application that keeps preferences in memory only
    pub fn in_memory(buffer: Buffer) -> Result<Self> {
        Self::build(PathBuf::from("."), PreferencesManager::in_memory(), buffer)
    }

    fn build(user_dir: PathBuf, mut preferences: PreferencesManager, buffer: Buffer) -> Result<Self> {
        preferences.define_preference(SHOW_LINE_NUMBERS, PreferenceKind::Boolean, true)?;

        let mut app = Self::bare(user_dir, preferences, buffer);

        KeyboardHandler.subscribe(&app.events);
        AppStateHandler.subscribe(&app.events);

        PluginManager::new().load_plugins(&mut app);
        Ok(app)
    }

    fn bare(user_dir: PathBuf, mut preferences: PreferencesManager, buffer: Buffer) -> Self {
        let events = EventBus::new();
        preferences.attach_notifier(events.sender());

        let mut workspace = Workspace::new(buffer, DEFAULT_AREA);
        workspace.attach_notifier(events.sender());

        Self {
            running: true,
            command_mode: CommandMode::Normal,
            command_input: String::new(),
            palette_selected: 0,
            status_message: None,
            user_dir,
            events,
            preferences,
            workspace,
            guidelines: GuidelineRenderer::default(),
            settings_dialog: None,
            commands: CommandManager::new(),
            view_menu: Menu::new("View"),
        }
    }

    /// Run the application until it quits
    pub async fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<bool> {
        let input_system = InputSystem::new(self.events.clone());

        let size = terminal.size()?;
        input_system.handle_resize(size.width, size.height)?;

        // Target frame rate
        let frame_duration = Duration::from_millis(16);
        let mut last_frame: Option<Instant> = None;

        // Main event loop
        while self.running {
            let frame_start = Instant::now();

            self.process_events();
            if !self.running {
                break;
            }

            // Draw the UI - limit to target frame rate
            if last_frame.map_or(true, |last| frame_start.duration_since(last) >= frame_duration) {
                terminal
                    .draw(|f| self.render(f))
                    .context("Rendering error")?;
                last_frame = Some(frame_start);
            }

            // Check for events without blocking
            if event::poll(Duration::from_millis(1))? {
                match event::read()? {
                    Event::Key(key) => {
                        if let Err(e) = input_system.handle_key_input(key) {
                            warn!(error = %e, "error handling key input");
                        }
                    }
                    Event::Resize(width, height) => {
                        if let Err(e) = input_system.handle_resize(width, height) {
                            warn!(error = %e, "error handling resize");
                        }
                    }
                    _ => {}
                }
            } else {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        }

        Ok(true)
    }

    /// Dispatch every event queued so far. Returns how many were handled.
    ///
    /// Events published by handlers are left for the next call.
    pub fn process_events(&mut self) -> usize {
        let events = self.events.take_pending();
        for event in &events {
            self.dispatch(event);
        }
        events.len()
    }

    /// Keep dispatching until the queue stays empty. Returns the number of ticks.
    pub fn process_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        while self.process_events() > 0 {
            ticks += 1;
        }
        ticks
    }

    /// Call every handler subscribed to an event
    pub fn dispatch(&mut self, event: &AppEvent) {
        let event_type = event.event_type();
        for handler in self.events.handlers_for(event_type) {
            if let Err(e) = handler(self, event) {
                warn!(event = event_type, error = %e, "event handler failed");
            }
        }
    }

    /// Bring the guideline overlays up to date with the current layout
    pub fn render_guidelines(&mut self) {
        let surfaces = self.workspace.scroll_surfaces(self.show_line_numbers());
        self.guidelines.render_guidelines(&surfaces);
    }

    /// Whether editors show a line number gutter
    pub fn show_line_numbers(&self) -> bool {
        self.preferences.get_bool(SHOW_LINE_NUMBERS).unwrap_or(true)
    }

    /// Run a registered command
    pub fn execute_command(&mut self, id: &str) -> Result<()> {
        let command = self
            .commands
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Unknown command: {}", id))?;

        debug!(command = id, "executing command");
        command.execute(self)
    }

    /// View menu commands matching the palette input, as (id, label)
    pub fn palette_suggestions(&self) -> Vec<(String, String)> {
        let filter = self.command_input.to_lowercase();
        self.view_menu
            .command_ids()
            .filter_map(|id| self.commands.get(id))
            .filter(|command| {
                filter.is_empty()
                    || command.label.to_lowercase().contains(&filter)
                    || command.id.to_lowercase().contains(&filter)
            })
            .map(|command| (command.id.clone(), command.label.clone()))
            .collect()
    }

    pub fn close_command_palette(&mut self) {
        self.command_mode = CommandMode::Normal;
        self.command_input.clear();
        self.palette_selected = 0;
    }

    /// Set a status message
    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear the status message
    pub fn clear_status_message(&mut self) {
        self.status_message = None;
    }
}

/// Per-user directory for preferences and logs
pub fn default_user_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("guideline")
}
