//! Guideline settings dialog
//!
//! The dialog is a modal form with a column number, a colour and an enabled
//! checkbox. Its keyboard and button listeners are owned by the dialog, so
//! dropping the dialog (OK, Cancel or Escape) always detaches them.

use anyhow::Result;
use ratatui::{
    buffer::Buffer as TuiBuffer,
    crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use thiserror::Error;
use tracing::{debug, info};

use super::settings::{is_hex_color, GuidelineSettings, MAX_COLUMNS, MIN_COLUMNS};
use crate::events::{AppEvent, SubscriptionGuard};
use crate::widgets::modal::Modal;
use crate::App;

pub const OK_BUTTON: &str = "ok";
pub const CANCEL_BUTTON: &str = "cancel";

/// Longest text a field accepts
const FIELD_LIMIT: usize = 16;

/// A rejected form value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter a column number value between 1 - 1000.")]
    ColumnRange,

    #[error("Enter a valid hex color. E.G. #B0B4B9")]
    InvalidColor,
}

/// Form controls in focus order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Columns,
    Color,
    Enabled,
    Ok,
    Cancel,
}

impl FormField {
    const ORDER: [FormField; 5] = [
        FormField::Columns,
        FormField::Color,
        FormField::Enabled,
        FormField::Ok,
        FormField::Cancel,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Current contents of the settings form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub columns: String,
    pub color: String,
    pub enabled: bool,
    pub focus: FormField,
    pub errors: Vec<ValidationError>,
}

impl SettingsForm {
    /// Pre-populate the form from settings
    pub fn from_settings(settings: &GuidelineSettings) -> Self {
        Self {
            columns: settings.columns.to_string(),
            color: settings.column_color.clone(),
            enabled: settings.enabled,
            focus: FormField::default(),
            errors: Vec::new(),
        }
    }

    /// Check every field, collecting all problems
    ///
    /// Surrounding whitespace is ignored in both text fields.
    pub fn validate(&self) -> Result<GuidelineSettings, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let columns = self
            .columns
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|c| (MIN_COLUMNS..=MAX_COLUMNS).contains(c));
        if columns.is_none() {
            errors.push(ValidationError::ColumnRange);
        }

        let color = self.color.trim();
        if !is_hex_color(color) {
            errors.push(ValidationError::InvalidColor);
        }

        match columns {
            Some(columns) if errors.is_empty() => Ok(GuidelineSettings {
                columns,
                column_color: color.to_string(),
                enabled: self.enabled,
            }),
            _ => Err(errors),
        }
    }

    /// Apply a key press to the focused control
    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.prev(),
            KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Char(' ') if self.focus == FormField::Enabled => {
                self.enabled = !self.enabled;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.text_field_mut() {
                    if field.chars().count() < FIELD_LIMIT {
                        field.push(c);
                    }
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.text_field_mut() {
                    field.pop();
                }
            }
            _ => {}
        }
    }

    fn text_field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Columns => Some(&mut self.columns),
            FormField::Color => Some(&mut self.color),
            _ => None,
        }
    }

    /// Button that Enter activates from the current focus
    pub fn default_button(&self) -> &'static str {
        if self.focus == FormField::Cancel {
            CANCEL_BUTTON
        } else {
            OK_BUTTON
        }
    }
}

/// An open settings dialog
pub struct SettingsDialog {
    pub form: SettingsForm,
    listeners: SubscriptionGuard,
}

impl SettingsDialog {
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

/// What a confirm attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Settings were written and the dialog closed
    Saved(GuidelineSettings),

    /// The form was rejected and stays open
    Invalid(Vec<ValidationError>),

    /// There was no dialog to confirm
    NotOpen,
}

/// Open the settings dialog, pre-populated from the preference store
pub fn show_settings_dialog(app: &mut App) -> Result<()> {
    if app.settings_dialog.is_some() {
        return Ok(());
    }

    let settings = GuidelineSettings::load(&app.preferences);
    let mut listeners = SubscriptionGuard::new(app.events.clone());
    listeners.subscribe("key_input", handle_dialog_key);
    listeners.subscribe("button_click", handle_button_click);

    debug!(?settings, "opening guideline settings");
    app.settings_dialog = Some(SettingsDialog {
        form: SettingsForm::from_settings(&settings),
        listeners,
    });
    Ok(())
}

/// Validate and, when valid, store the form and re-render the guidelines
pub fn confirm_settings_dialog(app: &mut App) -> Result<DialogOutcome> {
    let Some(dialog) = app.settings_dialog.as_mut() else {
        return Ok(DialogOutcome::NotOpen);
    };

    let settings = match dialog.form.validate() {
        Ok(settings) => settings,
        Err(errors) => {
            debug!(?errors, "guideline settings rejected");
            dialog.form.errors = errors.clone();
            return Ok(DialogOutcome::Invalid(errors));
        }
    };

    settings.store(&mut app.preferences)?;
    info!(
        columns = settings.columns,
        color = %settings.column_color,
        enabled = settings.enabled,
        "guideline settings saved"
    );

    let stored = GuidelineSettings::load(&app.preferences);
    app.guidelines.refresh_settings(stored);
    app.guidelines.clear_overlays();
    app.render_guidelines();
    close_settings_dialog(app);

    Ok(DialogOutcome::Saved(settings))
}

/// Close without writing anything
pub fn close_settings_dialog(app: &mut App) {
    if app.settings_dialog.take().is_some() {
        debug!("guideline settings closed");
    }
}

fn handle_dialog_key(app: &mut App, event: &AppEvent) -> Result<()> {
    let AppEvent::KeyInput(key) = event else {
        return Ok(());
    };
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    let Some(dialog) = app.settings_dialog.as_mut() else {
        return Ok(());
    };

    match key.code {
        KeyCode::Esc => close_settings_dialog(app),
        KeyCode::Enter => {
            let button_id = dialog.form.default_button();
            app.events.publish(AppEvent::ButtonClick {
                button_id: button_id.into(),
            })?;
        }
        _ => dialog.form.handle_key(*key),
    }

    Ok(())
}

fn handle_button_click(app: &mut App, event: &AppEvent) -> Result<()> {
    let AppEvent::ButtonClick { button_id } = event else {
        return Ok(());
    };

    match button_id.as_ref() {
        CANCEL_BUTTON => close_settings_dialog(app),
        OK_BUTTON => {
            confirm_settings_dialog(app)?;
        }
        _ => {}
    }

    Ok(())
}

/// Draws the settings form inside a modal
pub struct SettingsDialogWidget<'a> {
    form: &'a SettingsForm,
}

impl<'a> SettingsDialogWidget<'a> {
    pub fn new(form: &'a SettingsForm) -> Self {
        Self { form }
    }

    fn field_style(&self, field: FormField) -> Style {
        if self.form.focus == field {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        }
    }

    fn text_input(&self, field: FormField, value: &str) -> Span<'static> {
        let cursor = if self.form.focus == field { "_" } else { " " };
        Span::styled(
            format!(" {:<width$}", format!("{value}{cursor}"), width = FIELD_LIMIT + 1),
            self.field_style(field),
        )
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::Gray);
        let checkbox = if self.form.enabled { "[x]" } else { "[ ]" };

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Column number  ", label),
                self.text_input(FormField::Columns, &self.form.columns),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Line color     ", label),
                self.text_input(FormField::Color, &self.form.color),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled(
                    format!("{checkbox} Enable guidelines"),
                    self.field_style(FormField::Enabled),
                ),
            ]),
            Line::from(""),
        ];

        if !self.form.errors.is_empty() {
            let error_style = Style::default().fg(Color::Red);
            for error in &self.form.errors {
                lines.push(Line::from(Span::styled(format!("  * {error}"), error_style)));
            }
            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(" Cancel ", self.field_style(FormField::Cancel)),
            Span::raw("  "),
            Span::styled(" OK ", self.field_style(FormField::Ok)),
        ]));
        lines
    }
}

impl Widget for SettingsDialogWidget<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let lines = self.lines();
        let height = lines.len() as u16 + 2;
        Modal::new("Guidelines")
            .content(lines)
            .width(56.min(area.width))
            .height(height.min(area.height))
            .render(area, buf);
    }
}
