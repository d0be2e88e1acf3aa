use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::Result;
use ratatui::crossterm::event::KeyEvent;
use tokio::sync::mpsc;

use crate::App;

/// All possible events in the application
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Keyboard input events
    KeyInput(KeyEvent),

    /// Terminal was resized
    Resize { width: u16, height: u16 },

    /// Host layout notifications
    ActiveEditorChange,
    PreferenceChange {
        key: Arc<str>,
    },
    WorkingSetMove {
        from_pane: usize,
        to_pane: usize,
    },
    PaneLayoutChange,
    WorkspaceUpdateLayout,

    /// A dialog button was activated
    ButtonClick {
        button_id: Arc<str>,
    },

    /// Run a registered command
    ExecuteCommand {
        id: Arc<str>,
    },

    /// Re-render the guideline overlays
    RenderGuidelines,

    /// Application lifecycle
    Quit,
}

impl AppEvent {
    /// Get the event type string for routing
    pub fn event_type(&self) -> &'static str {
        match self {
            AppEvent::KeyInput(_) => "key_input",
            AppEvent::Resize { .. } => "resize",
            AppEvent::ActiveEditorChange => "active_editor_change",
            AppEvent::PreferenceChange { .. } => "preference_change",
            AppEvent::WorkingSetMove { .. } => "working_set_move",
            AppEvent::PaneLayoutChange => "pane_layout_change",
            AppEvent::WorkspaceUpdateLayout => "workspace_update_layout",
            AppEvent::ButtonClick { .. } => "button_click",
            AppEvent::ExecuteCommand { .. } => "execute_command",
            AppEvent::RenderGuidelines => "render_guidelines",
            AppEvent::Quit => "quit",
        }
    }
}

/// Identifies a single subscription so it can be removed again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Event handler function type
///
/// Handlers run on the UI thread with exclusive access to the application.
pub type EventHandler = Arc<dyn Fn(&mut App, &AppEvent) -> Result<()> + Send + Sync>;

type HandlerMap = HashMap<&'static str, Vec<(SubscriptionId, EventHandler)>>;

/// Event bus for publishing and subscribing to events
///
/// Events are queued on an unbounded channel and dispatched in batches by
/// [`App::process_events`]. Anything published while a batch is being
/// dispatched waits for the next batch.
#[derive(Clone)]
pub struct EventBus {
    /// Handlers keyed by event type
    handlers: Arc<RwLock<HandlerMap>>,

    /// Source of subscription ids
    next_id: Arc<AtomicU64>,

    /// Channel for sending events
    sender: mpsc::UnboundedSender<AppEvent>,

    /// Channel for receiving events
    receiver: Arc<Mutex<mpsc::UnboundedReceiver<AppEvent>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
        }
    }

    /// Get a sender for publishing events
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.sender.clone()
    }

    /// Subscribe to events of one type
    pub fn subscribe<F>(&self, event_type: &'static str, handler: F) -> SubscriptionId
    where
        F: Fn(&mut App, &AppEvent) -> Result<()> + Send + Sync + 'static,
    {
        self.subscribe_handler(event_type, Arc::new(handler))
    }

    /// Subscribe an already shared handler
    pub fn subscribe_handler(&self, event_type: &'static str, handler: EventHandler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        handlers.entry(event_type).or_default().push((id, handler));
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(|e| e.into_inner());
        let mut removed = false;
        for entries in handlers.values_mut() {
            let before = entries.len();
            entries.retain(|(entry_id, _)| *entry_id != id);
            removed |= entries.len() != before;
        }
        handlers.retain(|_, entries| !entries.is_empty());
        removed
    }

    /// Number of handlers currently subscribed to an event type
    pub fn subscriber_count(&self, event_type: &str) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers.get(event_type).map_or(0, Vec::len)
    }

    /// Snapshot of the handlers for an event type
    pub fn handlers_for(&self, event_type: &str) -> Vec<EventHandler> {
        let handlers = self.handlers.read().unwrap_or_else(|e| e.into_inner());
        handlers
            .get(event_type)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }

    /// Publish an event
    pub fn publish(&self, event: AppEvent) -> Result<()> {
        self.sender.send(event)?;
        Ok(())
    }

    /// Take every event queued so far
    pub fn take_pending(&self) -> Vec<AppEvent> {
        let mut receiver = self.receiver.lock().unwrap_or_else(|e| e.into_inner());
        let mut events = Vec::new();
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        events
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A set of subscriptions that are removed when the guard is dropped
pub struct SubscriptionGuard {
    bus: EventBus,
    ids: Vec<SubscriptionId>,
}

impl SubscriptionGuard {
    pub fn new(bus: EventBus) -> Self {
        Self {
            bus,
            ids: Vec::new(),
        }
    }

    /// Subscribe a handler that lives as long as this guard
    pub fn subscribe<F>(&mut self, event_type: &'static str, handler: F) -> SubscriptionId
    where
        F: Fn(&mut App, &AppEvent) -> Result<()> + Send + Sync + 'static,
    {
        let id = self.bus.subscribe(event_type, handler);
        self.ids.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.bus.unsubscribe(id);
        }
    }
}
