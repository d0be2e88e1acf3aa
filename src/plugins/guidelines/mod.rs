//! Column guidelines
//!
//! Draws a vertical guideline at a configured column over every editor,
//! inline editors included. Originally a print margin, now mostly a
//! legibility aid. Only meaningful with a fixed-width font, which a
//! terminal always has.

pub mod dialog;
pub mod renderer;
pub mod router;
pub mod settings;

use anyhow::Result;

use super::Plugin;
use crate::App;

pub use dialog::{
    close_settings_dialog, confirm_settings_dialog, show_settings_dialog, DialogOutcome,
    SettingsDialog, SettingsForm, ValidationError,
};
pub use renderer::{GuidelineOverlay, GuidelineRenderer, GuidelineWidget};
pub use router::LayoutNotification;
pub use settings::GuidelineSettings;

/// Command that opens the settings dialog
pub const OPEN_PREFERENCES_COMMAND: &str = "guidelines.open_preferences";

pub struct GuidelinesPlugin;

impl Plugin for GuidelinesPlugin {
    fn id(&self) -> &str {
        "guidelines"
    }

    fn init(&self, app: &mut App) -> Result<()> {
        GuidelineSettings::define(&mut app.preferences)?;

        // Cache the settings now instead of asking the store on every render
        app.guidelines = GuidelineRenderer::new(GuidelineSettings::load(&app.preferences));

        router::subscribe(&app.events);

        app.commands
            .register(OPEN_PREFERENCES_COMMAND, "Guidelines", show_settings_dialog)?;
        app.view_menu.add_menu_divider();
        app.view_menu.add_menu_item(OPEN_PREFERENCES_COMMAND);

        router::schedule_render(&app.events)
    }
}
