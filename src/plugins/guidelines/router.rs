//! Maps host layout notifications onto guideline re-renders
//!
//! The host has no single "viewport changed" signal, so the router listens
//! to every notification that can move or resize an editor. Some of them
//! never fire for some editor configurations; listening to all of them is
//! what catches every case.

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::settings::GuidelineSettings;
use crate::events::{AppEvent, EventBus, EventHandler, SubscriptionId};
use crate::App;

/// Host notifications that can invalidate guideline size or position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutNotification {
    /// Focus moved to another editor, including a freshly opened inline editor
    ActiveEditorChange,

    /// Any preference changed: themes, fonts, line numbers and our own settings
    PreferenceChange,

    /// A view moved to another pane without being focused
    WorkingSetMove,

    /// Pane orientation changed
    PaneLayoutChange,

    /// The workspace was resized
    WorkspaceUpdateLayout,
}

impl LayoutNotification {
    pub const ALL: [LayoutNotification; 5] = [
        LayoutNotification::ActiveEditorChange,
        LayoutNotification::PreferenceChange,
        LayoutNotification::WorkingSetMove,
        LayoutNotification::PaneLayoutChange,
        LayoutNotification::WorkspaceUpdateLayout,
    ];

    /// Event type this notification arrives as
    pub fn event_type(self) -> &'static str {
        match self {
            LayoutNotification::ActiveEditorChange => "active_editor_change",
            LayoutNotification::PreferenceChange => "preference_change",
            LayoutNotification::WorkingSetMove => "working_set_move",
            LayoutNotification::PaneLayoutChange => "pane_layout_change",
            LayoutNotification::WorkspaceUpdateLayout => "workspace_update_layout",
        }
    }

    pub fn from_event(event: &AppEvent) -> Option<Self> {
        match event {
            AppEvent::ActiveEditorChange => Some(LayoutNotification::ActiveEditorChange),
            AppEvent::PreferenceChange { .. } => Some(LayoutNotification::PreferenceChange),
            AppEvent::WorkingSetMove { .. } => Some(LayoutNotification::WorkingSetMove),
            AppEvent::PaneLayoutChange => Some(LayoutNotification::PaneLayoutChange),
            AppEvent::WorkspaceUpdateLayout => Some(LayoutNotification::WorkspaceUpdateLayout),
            _ => None,
        }
    }
}

/// Subscribe the re-render handler to every layout notification
pub fn subscribe(bus: &EventBus) -> Vec<SubscriptionId> {
    let handler: EventHandler = Arc::new(handle_layout_notification);
    let mut ids = Vec::with_capacity(LayoutNotification::ALL.len());
    for notification in LayoutNotification::ALL {
        ids.push(bus.subscribe_handler(notification.event_type(), handler.clone()));
    }

    ids.push(bus.subscribe("render_guidelines", |app, _| {
        app.render_guidelines();
        Ok(())
    }));
    ids
}

fn handle_layout_notification(app: &mut App, event: &AppEvent) -> Result<()> {
    let Some(notification) = LayoutNotification::from_event(event) else {
        return Ok(());
    };

    if notification == LayoutNotification::PreferenceChange {
        let settings = GuidelineSettings::load(&app.preferences);
        app.guidelines.refresh_settings(settings);
    }

    debug!(?notification, "scheduling guideline render");
    schedule_render(&app.events)
}

/// Render on the next tick, once the host has finished laying out
pub fn schedule_render(bus: &EventBus) -> Result<()> {
    bus.publish(AppEvent::RenderGuidelines)
}
