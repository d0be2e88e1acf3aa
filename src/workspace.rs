//! Panes, editor views and the scroll surfaces they expose
//!
//! The workspace holds up to two panes, each with a working set of editor
//! views. A view may carry one inline editor nested inside it. Every
//! primary view on screen and every visible inline editor is a scroll
//! surface with its own viewport.
//!
//! Layout-affecting operations publish the matching host notification.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::buffer::Buffer;
use crate::events::AppEvent;

/// Rows an inline editor asks for
pub const INLINE_EDITOR_HEIGHT: u16 = 6;

/// Identity of an independently scrollable editor viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// The main editor of a pane
    Primary,

    /// An editor nested inside another editor
    Inline,
}

/// Geometry of a scroll surface as currently laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSurface {
    pub id: SurfaceId,
    pub kind: SurfaceKind,
    pub viewport: Rect,
    pub gutter_width: u16,
    pub horizontal_scroll: usize,
}

impl ScrollSurface {
    /// Area right of the gutter where text is drawn
    pub fn text_area(&self) -> Rect {
        let gutter = self.gutter_width.min(self.viewport.width);
        Rect {
            x: self.viewport.x + gutter,
            y: self.viewport.y,
            width: self.viewport.width - gutter,
            height: self.viewport.height,
        }
    }
}

/// How the panes share the workspace area
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneLayout {
    /// Only the first pane is shown
    #[default]
    Single,

    /// Panes side by side
    Vertical,

    /// Panes stacked
    Horizontal,
}

impl PaneLayout {
    pub fn next(self) -> Self {
        match self {
            PaneLayout::Single => PaneLayout::Vertical,
            PaneLayout::Vertical => PaneLayout::Horizontal,
            PaneLayout::Horizontal => PaneLayout::Single,
        }
    }
}

/// An editor nested inside a view, anchored below one of its lines
#[derive(Debug, Clone)]
pub struct InlineEditor {
    pub surface: SurfaceId,
    pub buffer: Buffer,
    pub anchor_line: usize,
    pub height: u16,
    pub scroll_offset: (usize, usize),
}

/// A buffer displayed in a pane
#[derive(Debug, Clone)]
pub struct EditorView {
    pub surface: SurfaceId,
    pub buffer: Buffer,
    pub scroll_offset: (usize, usize),
    pub inline_editor: Option<InlineEditor>,
}

/// A pane and its working set
#[derive(Debug, Clone, Default)]
pub struct Pane {
    pub working_set: Vec<EditorView>,
    pub active_view: usize,
}

impl Pane {
    pub fn active(&self) -> Option<&EditorView> {
        self.working_set.get(self.active_view)
    }

    pub fn active_mut(&mut self) -> Option<&mut EditorView> {
        self.working_set.get_mut(self.active_view)
    }
}

/// A view that is on screen, with the rectangle it occupies
pub struct VisibleView<'a> {
    pub pane: usize,
    pub area: Rect,
    pub view: &'a EditorView,
    pub focused: bool,
}

pub struct Workspace {
    panes: [Pane; 2],
    layout: PaneLayout,
    active_pane: usize,
    area: Rect,
    next_surface: u64,
    notifier: Option<mpsc::UnboundedSender<AppEvent>>,
}

impl Workspace {
    /// Create a workspace showing one buffer
    pub fn new(buffer: Buffer, area: Rect) -> Self {
        let mut workspace = Self {
            panes: [Pane::default(), Pane::default()],
            layout: PaneLayout::Single,
            active_pane: 0,
            area,
            next_surface: 1,
            notifier: None,
        };
        let view = workspace.new_view(buffer);
        workspace.panes[0].working_set.push(view);
        workspace
    }

    /// Send layout notifications to this channel
    pub fn attach_notifier(&mut self, sender: mpsc::UnboundedSender<AppEvent>) {
        self.notifier = Some(sender);
    }

    pub fn layout(&self) -> PaneLayout {
        self.layout
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn active_pane(&self) -> usize {
        self.active_pane
    }

    pub fn pane(&self, index: usize) -> Option<&Pane> {
        self.panes.get(index)
    }

    pub fn active_view(&self) -> Option<&EditorView> {
        self.panes[self.active_pane].active()
    }

    pub fn active_view_mut(&mut self) -> Option<&mut EditorView> {
        self.panes[self.active_pane].active_mut()
    }

    /// Open a buffer in the active pane and focus it
    pub fn open_buffer(&mut self, buffer: Buffer) -> SurfaceId {
        let view = self.new_view(buffer);
        let surface = view.surface;
        let pane = &mut self.panes[self.active_pane];
        pane.working_set.push(view);
        pane.active_view = pane.working_set.len() - 1;
        self.notify(AppEvent::ActiveEditorChange);
        surface
    }

    /// Focus the next view of the active pane's working set
    pub fn next_view(&mut self) -> bool {
        self.cycle_view(true)
    }

    /// Focus the previous view of the active pane's working set
    pub fn prev_view(&mut self) -> bool {
        self.cycle_view(false)
    }

    fn cycle_view(&mut self, forward: bool) -> bool {
        let pane = &mut self.panes[self.active_pane];
        let len = pane.working_set.len();
        if len < 2 {
            return false;
        }

        pane.active_view = if forward {
            (pane.active_view + 1) % len
        } else {
            (pane.active_view + len - 1) % len
        };
        self.notify(AppEvent::ActiveEditorChange);
        true
    }

    /// Move focus to the other pane when it is visible and has a view
    pub fn focus_next_pane(&mut self) -> bool {
        if self.layout == PaneLayout::Single {
            return false;
        }

        let other = 1 - self.active_pane;
        if self.panes[other].working_set.is_empty() {
            return false;
        }

        self.active_pane = other;
        self.notify(AppEvent::ActiveEditorChange);
        true
    }

    /// Switch between single, side-by-side and stacked panes
    ///
    /// Returning to a single pane folds the second working set into the first.
    pub fn set_layout(&mut self, layout: PaneLayout) {
        if layout == self.layout {
            return;
        }

        if layout == PaneLayout::Single {
            let moved = std::mem::take(&mut self.panes[1].working_set);
            self.panes[1].active_view = 0;
            self.panes[0].working_set.extend(moved);
            self.active_pane = 0;
        }

        self.layout = layout;
        self.notify(AppEvent::PaneLayoutChange);
    }

    pub fn cycle_layout(&mut self) {
        self.set_layout(self.layout.next());
    }

    /// Move the active view into the other pane without focusing it
    pub fn move_active_view_to_other_pane(&mut self) -> bool {
        if self.layout == PaneLayout::Single {
            return false;
        }

        let from_pane = self.active_pane;
        let to_pane = 1 - from_pane;
        let source = &mut self.panes[from_pane];
        if source.working_set.is_empty() {
            return false;
        }

        let view = source.working_set.remove(source.active_view);
        if source.active_view >= source.working_set.len() {
            source.active_view = source.working_set.len().saturating_sub(1);
        }

        let target = &mut self.panes[to_pane];
        target.working_set.push(view);
        if target.working_set.len() == 1 {
            target.active_view = 0;
        }

        if self.panes[from_pane].working_set.is_empty() {
            self.active_pane = to_pane;
        }

        self.notify(AppEvent::WorkingSetMove { from_pane, to_pane });
        true
    }

    /// Open or close an inline editor below the top visible line of the active view
    pub fn toggle_inline_editor(&mut self) -> bool {
        let surface = self.allocate_surface();
        let Some(view) = self.active_view_mut() else {
            return false;
        };

        if view.inline_editor.take().is_none() {
            view.inline_editor = Some(InlineEditor {
                surface,
                buffer: view.buffer.clone(),
                anchor_line: view.scroll_offset.0,
                height: INLINE_EDITOR_HEIGHT,
                scroll_offset: (0, 0),
            });
        }

        self.notify(AppEvent::ActiveEditorChange);
        true
    }

    /// Scroll the active view, or its inline editor when one is open
    pub fn scroll_active(&mut self, rows: isize, cols: isize) {
        let Some(view) = self.active_view_mut() else {
            return;
        };

        let (offset, max_row) = match view.inline_editor.as_mut() {
            Some(inline) => {
                let max_row = inline.buffer.line_count().saturating_sub(1);
                (&mut inline.scroll_offset, max_row)
            }
            None => {
                let max_row = view.buffer.line_count().saturating_sub(1);
                (&mut view.scroll_offset, max_row)
            }
        };

        offset.0 = offset.0.saturating_add_signed(rows).min(max_row);
        offset.1 = offset.1.saturating_add_signed(cols);
    }

    /// Change the area the workspace is laid out in
    pub fn resize(&mut self, area: Rect) {
        if area == self.area {
            return;
        }

        self.area = area;
        self.notify(AppEvent::WorkspaceUpdateLayout);
    }

    /// Rectangles of the panes currently on screen
    pub fn pane_areas(&self) -> Vec<(usize, Rect)> {
        match self.layout {
            PaneLayout::Single => vec![(0, self.area)],
            PaneLayout::Vertical | PaneLayout::Horizontal => {
                let direction = if self.layout == PaneLayout::Vertical {
                    Direction::Horizontal
                } else {
                    Direction::Vertical
                };
                let chunks = Layout::default()
                    .direction(direction)
                    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(self.area);
                vec![(0, chunks[0]), (1, chunks[1])]
            }
        }
    }

    /// The active view of every visible pane
    pub fn visible_views(&self) -> Vec<VisibleView<'_>> {
        self.pane_areas()
            .into_iter()
            .filter_map(|(pane, area)| {
                self.panes[pane].active().map(|view| VisibleView {
                    pane,
                    area,
                    view,
                    focused: pane == self.active_pane,
                })
            })
            .collect()
    }

    /// Every scroll surface currently on screen
    pub fn scroll_surfaces(&self, show_line_numbers: bool) -> Vec<ScrollSurface> {
        let mut surfaces = Vec::new();

        for visible in self.visible_views() {
            let view = visible.view;
            surfaces.push(ScrollSurface {
                id: view.surface,
                kind: SurfaceKind::Primary,
                viewport: visible.area,
                gutter_width: gutter_width(&view.buffer, show_line_numbers),
                horizontal_scroll: view.scroll_offset.1,
            });

            if let Some(inline) = &view.inline_editor {
                if let Some(viewport) = inline_viewport(view, inline, visible.area) {
                    surfaces.push(ScrollSurface {
                        id: inline.surface,
                        kind: SurfaceKind::Inline,
                        viewport,
                        gutter_width: gutter_width(&inline.buffer, show_line_numbers),
                        horizontal_scroll: inline.scroll_offset.1,
                    });
                }
            }
        }

        surfaces
    }

    fn new_view(&mut self, buffer: Buffer) -> EditorView {
        EditorView {
            surface: self.allocate_surface(),
            buffer,
            scroll_offset: (0, 0),
            inline_editor: None,
        }
    }

    fn allocate_surface(&mut self) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        id
    }

    fn notify(&self, event: AppEvent) {
        debug!(event = event.event_type(), "workspace notification");
        if let Some(sender) = &self.notifier {
            if sender.send(event).is_err() {
                warn!("workspace notification dropped");
            }
        }
    }
}

fn gutter_width(buffer: &Buffer, show_line_numbers: bool) -> u16 {
    if show_line_numbers {
        buffer.line_number_width() as u16
    } else {
        0
    }
}

/// Where an inline editor sits inside its host view, if its anchor is on screen
pub fn inline_viewport(view: &EditorView, inline: &InlineEditor, area: Rect) -> Option<Rect> {
    let first_row = view.scroll_offset.0;
    if inline.anchor_line < first_row {
        return None;
    }

    // The inline editor opens on the row below its anchor line
    let offset = (inline.anchor_line - first_row + 1) as u64;
    if offset >= area.height as u64 {
        return None;
    }

    let offset = offset as u16;
    let height = inline.height.min(area.height - offset);
    Some(Rect {
        x: area.x,
        y: area.y + offset,
        width: area.width,
        height,
    })
}
