//! Guideline overlays, one per scroll surface
//!
//! The renderer owns the cached settings and a map from surface id to its
//! overlay. Rendering upserts overlays in place, so calling it repeatedly
//! with the same surfaces leaves exactly one overlay per surface.

use std::collections::HashMap;

use ratatui::{buffer::Buffer as TuiBuffer, layout::Rect, style::Color, widgets::Widget};
use tracing::{debug, trace};

use super::settings::GuidelineSettings;
use crate::workspace::{ScrollSurface, SurfaceId};

/// The guideline drawn over one scroll surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuidelineOverlay {
    pub surface: SurfaceId,

    /// Rows the overlay covers at least, so it spans short documents
    pub min_height: u16,

    /// Offset from the start of the text in character cells
    pub column: u16,

    pub color: Color,
}

#[derive(Debug, Default)]
pub struct GuidelineRenderer {
    settings: GuidelineSettings,
    overlays: HashMap<SurfaceId, GuidelineOverlay>,
    render_passes: u64,
}

impl GuidelineRenderer {
    pub fn new(settings: GuidelineSettings) -> Self {
        Self {
            settings,
            overlays: HashMap::new(),
            render_passes: 0,
        }
    }

    pub fn settings(&self) -> &GuidelineSettings {
        &self.settings
    }

    /// Replace the cached settings
    ///
    /// Overlays are dropped when anything changed so the next render
    /// rebuilds them from the new values.
    pub fn refresh_settings(&mut self, settings: GuidelineSettings) -> bool {
        if settings == self.settings {
            return false;
        }

        debug!(?settings, "guideline settings changed");
        self.settings = settings;
        self.clear_overlays();
        true
    }

    /// Remove every overlay
    pub fn clear_overlays(&mut self) {
        self.overlays.clear();
    }

    /// Create or update the overlay of every surface
    ///
    /// Does nothing while guidelines are disabled. Overlays of surfaces
    /// that are no longer on screen are dropped.
    pub fn render_guidelines(&mut self, surfaces: &[ScrollSurface]) {
        if !self.settings.enabled {
            return;
        }

        let column = self.settings.effective_columns();
        let color = self.settings.effective_color();

        self.overlays
            .retain(|id, _| surfaces.iter().any(|surface| surface.id == *id));

        for surface in surfaces {
            let overlay = self
                .overlays
                .entry(surface.id)
                .or_insert_with(|| GuidelineOverlay {
                    surface: surface.id,
                    min_height: 0,
                    column,
                    color,
                });
            overlay.min_height = surface.viewport.height;
            overlay.column = column;
            overlay.color = color;
        }

        self.render_passes += 1;
        trace!(
            surfaces = surfaces.len(),
            overlays = self.overlays.len(),
            "rendered guidelines"
        );
    }

    pub fn overlay(&self, surface: SurfaceId) -> Option<&GuidelineOverlay> {
        self.overlays.get(&surface)
    }

    pub fn overlays(&self) -> impl Iterator<Item = &GuidelineOverlay> {
        self.overlays.values()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// How many times overlays were actually rendered
    pub fn render_passes(&self) -> u64 {
        self.render_passes
    }
}

/// Paints an overlay onto its surface after the text has been drawn
pub struct GuidelineWidget<'a> {
    overlay: &'a GuidelineOverlay,
    surface: &'a ScrollSurface,
}

impl<'a> GuidelineWidget<'a> {
    pub fn new(overlay: &'a GuidelineOverlay, surface: &'a ScrollSurface) -> Self {
        Self { overlay, surface }
    }

    /// Screen column of the guideline, if it is inside the text area
    pub fn screen_x(&self) -> Option<u16> {
        let text = self.surface.text_area();
        let offset = (self.overlay.column as usize).checked_sub(self.surface.horizontal_scroll)?;
        if offset >= text.width as usize {
            return None;
        }
        Some(text.x + offset as u16)
    }
}

impl Widget for GuidelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut TuiBuffer) {
        let Some(x) = self.screen_x() else {
            return;
        };

        let viewport = self.surface.viewport.intersection(area);
        if x < viewport.x || x >= viewport.right() {
            return;
        }

        let rows = self.overlay.min_height.min(viewport.height);
        for y in viewport.y..viewport.y + rows {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_bg(self.overlay.color);
            }
        }
    }
}
