use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::plugins::guidelines::dialog::SettingsDialogWidget;
use crate::plugins::guidelines::GuidelineWidget;
use crate::widgets::{CommandPalette, Editor};
use crate::workspace::{inline_viewport, PaneLayout, ScrollSurface, SurfaceId};
use crate::{App, CommandMode};

const INLINE_BACKGROUND: Color = Color::Rgb(25, 25, 40);

impl App {
    /// Main render function for the application UI
    pub fn render(&self, f: &mut Frame) {
        let area = f.area();
        let status_area = Rect {
            x: area.x,
            y: area.bottom().saturating_sub(1),
            width: area.width,
            height: area.height.min(1),
        };

        self.render_workspace(f);
        self.render_status_line(f, status_area);

        if self.command_mode == CommandMode::Command {
            self.render_command_palette(f, area);
        }

        if let Some(dialog) = &self.settings_dialog {
            f.render_widget(SettingsDialogWidget::new(&dialog.form), area);
        }
    }

    /// Render every visible editor with its guideline on top
    fn render_workspace(&self, f: &mut Frame) {
        let show_line_numbers = self.show_line_numbers();
        let surfaces = self.workspace.scroll_surfaces(show_line_numbers);

        for visible in self.workspace.visible_views() {
            let view = visible.view;
            let area = visible.area.intersection(f.area());

            let editor = Editor::new(&view.buffer)
                .scroll_offset(view.scroll_offset)
                .show_line_numbers(show_line_numbers);
            f.render_widget(editor, area);
            self.render_guideline(f, &surfaces, view.surface);

            // Inline editors sit on top of their host, so they draw after it
            if let Some(inline) = &view.inline_editor {
                if let Some(inline_area) = inline_viewport(view, inline, visible.area) {
                    let editor = Editor::new(&inline.buffer)
                        .scroll_offset(inline.scroll_offset)
                        .show_line_numbers(show_line_numbers)
                        .background(INLINE_BACKGROUND);
                    f.render_widget(editor, inline_area.intersection(f.area()));
                    self.render_guideline(f, &surfaces, inline.surface);
                }
            }
        }
    }

    fn render_guideline(
        &self,
        f: &mut Frame,
        surfaces: &[ScrollSurface],
        id: SurfaceId,
    ) {
        let Some(surface) = surfaces.iter().find(|s| s.id == id) else {
            return;
        };
        if let Some(overlay) = self.guidelines.overlay(id) {
            f.render_widget(GuidelineWidget::new(overlay, surface), f.area());
        }
    }

    /// Render the status line
    fn render_status_line(&self, f: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }

        let name = self
            .workspace
            .active_view()
            .map(|view| view.buffer.name.as_str())
            .unwrap_or("");
        let row = self
            .workspace
            .active_view()
            .map_or(0, |view| view.scroll_offset.0 + 1);
        let layout = match self.workspace.layout() {
            PaneLayout::Single => "single",
            PaneLayout::Vertical => "side by side",
            PaneLayout::Horizontal => "stacked",
        };

        let settings = self.guidelines.settings();
        let guideline = if settings.enabled {
            format!("guide @{}", settings.effective_columns())
        } else {
            "guide off".to_string()
        };

        let mut text = format!(" {name} | Ln {row} | {layout} | {guideline}");
        if let Some(message) = &self.status_message {
            text.push_str(" | ");
            text.push_str(message);
        }

        let status = Paragraph::new(text).style(Style::default().fg(Color::White).bg(Color::Blue));
        f.render_widget(status, area);
    }

    /// Render command palette modal
    fn render_command_palette(&self, f: &mut Frame, area: Rect) {
        let suggestions = self.palette_suggestions();
        let entries = suggestions
            .iter()
            .map(|(id, label)| (id.as_str(), label.as_str()))
            .collect();

        let palette = CommandPalette::new(&self.command_input)
            .entries(entries)
            .selected(self.palette_selected);

        // Cursor sits after the "> " prompt inside the border
        let palette_area = palette.area(area);
        let cursor_x = palette_area.x + 3 + self.command_input.chars().count() as u16;
        f.render_widget(palette, area);
        f.set_cursor_position(Position::new(
            cursor_x.min(palette_area.right().saturating_sub(2)),
            palette_area.y + 1,
        ));
    }
}
