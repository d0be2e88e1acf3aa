//! Plugin system for the editor
//! Plugins register commands, add menu items and subscribe to host events
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::{info, warn};

use crate::App;

pub mod guidelines;

/// A plugin for the editor
pub trait Plugin {
    /// The ID of the plugin
    fn id(&self) -> &str;

    /// Hook the plugin into the application
    fn init(&self, app: &mut App) -> Result<()>;
}

/// Command handler function type
pub type CommandHandler = Arc<dyn Fn(&mut App) -> Result<()> + Send + Sync>;

/// A command registered with the editor
#[derive(Clone)]
pub struct Command {
    /// The ID of the command
    pub id: String,

    /// Label shown in menus and the command palette
    pub label: String,

    handler: CommandHandler,
}

impl Command {
    /// Run the command
    pub fn execute(&self, app: &mut App) -> Result<()> {
        (self.handler)(app)
    }
}

/// Registry of commands by ID
#[derive(Default)]
pub struct CommandManager {
    commands: HashMap<String, Command>,
}

impl CommandManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command
    pub fn register<F>(&mut self, id: &str, label: &str, handler: F) -> Result<()>
    where
        F: Fn(&mut App) -> Result<()> + Send + Sync + 'static,
    {
        if self.commands.contains_key(id) {
            return Err(anyhow!("Command with ID {} already registered", id));
        }

        self.commands.insert(
            id.to_string(),
            Command {
                id: id.to_string(),
                label: label.to_string(),
                handler: Arc::new(handler),
            },
        );
        Ok(())
    }

    /// Get a command by ID
    pub fn get(&self, id: &str) -> Option<&Command> {
        self.commands.get(id)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// An entry of a menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Command(String),
    Divider,
}

/// An application menu
#[derive(Debug, Clone, Default)]
pub struct Menu {
    pub name: String,
    items: Vec<MenuItem>,
}

impl Menu {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    pub fn add_menu_divider(&mut self) {
        self.items.push(MenuItem::Divider);
    }

    /// Add a menu item for a command
    pub fn add_menu_item(&mut self, command_id: &str) {
        self.items.push(MenuItem::Command(command_id.to_string()));
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    /// Command IDs in menu order, dividers skipped
    pub fn command_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            MenuItem::Command(id) => Some(id.as_str()),
            MenuItem::Divider => None,
        })
    }
}

/// Plugin manager
pub struct PluginManager {
    /// The plugins, in load order
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    /// Create a plugin manager with the built-in plugins
    pub fn new() -> Self {
        Self {
            plugins: vec![Box::new(guidelines::GuidelinesPlugin)],
        }
    }

    /// Create a plugin manager with the given plugins
    pub fn with_plugins(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    /// Initialise all plugins, returning how many loaded
    ///
    /// A plugin that fails to initialise is logged and skipped.
    pub fn load_plugins(&self, app: &mut App) -> usize {
        let mut loaded = 0;
        for plugin in &self.plugins {
            match plugin.init(app) {
                Ok(()) => {
                    info!(plugin = plugin.id(), "plugin loaded");
                    loaded += 1;
                }
                Err(e) => {
                    warn!(plugin = plugin.id(), error = %e, "failed to load plugin");
                }
            }
        }
        loaded
    }

    /// IDs of the known plugins
    pub fn plugin_ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.id()).collect()
    }
}

impl Default for PluginManager {
    fn default() -> Self {
        Self::new()
    }
}
