//! Integration tests for the application, event bus and plugin host

use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Result};
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use tempfile::TempDir;

use guideline::config::SHOW_LINE_NUMBERS;
use guideline::events::{AppEvent, EventBus, SubscriptionGuard};
use guideline::plugins::guidelines::OPEN_PREFERENCES_COMMAND;
use guideline::plugins::{MenuItem, Plugin, PluginManager};
use guideline::{App, Buffer, CommandMode};

fn test_app() -> App {
    let mut app = App::in_memory(Buffer::from_text("main.rs", "fn main() {}\n")).unwrap();
    app.process_until_idle();
    app
}

fn press(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    app.events
        .publish(AppEvent::KeyInput(KeyEvent::new(code, modifiers)))
        .unwrap();
    app.process_until_idle();
}

#[test]
fn test_app_creation() {
    let app = test_app();

    assert!(app.running);
    assert_eq!(app.command_mode, CommandMode::Normal);
    assert!(app.status_message.is_none());
    assert!(app.settings_dialog.is_none());
    assert!(app.preferences.is_defined(SHOW_LINE_NUMBERS));
    assert!(app.show_line_numbers());
}

#[test]
fn test_plugin_registers_command_and_menu_item() {
    let app = test_app();

    assert_eq!(app.commands.len(), 1);
    assert_eq!(app.commands.get(OPEN_PREFERENCES_COMMAND).unwrap().label, "Guidelines");
    assert_eq!(app.view_menu.name, "View");
    assert_eq!(
        app.view_menu.items(),
        &[
            MenuItem::Divider,
            MenuItem::Command(OPEN_PREFERENCES_COMMAND.to_string())
        ]
    );
}

#[tokio::test]
async fn test_app_with_file() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("test.txt");
    fs::write(&file_path, "Hello World\nSecond Line").unwrap();

    let app = App::with_file(file_path.to_str().unwrap()).await.unwrap();

    let view = app.workspace.active_view().unwrap();
    assert_eq!(view.buffer.name, "test.txt");
    assert_eq!(view.buffer.content, vec!["Hello World", "Second Line"]);
}

#[tokio::test]
async fn test_app_with_missing_file() {
    let result = App::with_file("/definitely/not/here.txt").await;
    assert!(result.is_err());
}

#[test]
fn test_corrupt_preferences_fall_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("preferences.json"), "[1, 2").unwrap();

    let mut app = App::with_user_dir(temp_dir.path().to_path_buf(), Buffer::new()).unwrap();
    app.process_until_idle();

    assert_eq!(app.guidelines.settings().columns, 80);
    assert_eq!(app.guidelines.overlay_count(), 1);
}

#[test]
fn test_user_dir_is_created() {
    let temp_dir = TempDir::new().unwrap();
    let user_dir = temp_dir.path().join("nested").join("guideline");

    let app = App::with_user_dir(user_dir.clone(), Buffer::new()).unwrap();

    assert!(user_dir.is_dir());
    assert_eq!(app.user_dir, user_dir);
    assert_eq!(
        app.preferences.path(),
        Some(user_dir.join("preferences.json").as_path())
    );
}

#[test]
fn test_quit_key() {
    let mut app = test_app();
    press(&mut app, KeyCode::Char('q'), KeyModifiers::CONTROL);
    assert!(!app.running);
}

#[test]
fn test_key_release_is_ignored() {
    let mut app = test_app();
    let release = KeyEvent {
        code: KeyCode::Char('q'),
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Release,
        state: KeyEventState::NONE,
    };
    app.events.publish(AppEvent::KeyInput(release)).unwrap();
    app.process_until_idle();

    assert!(app.running);
}

#[test]
fn test_move_without_split_sets_status_message() {
    let mut app = test_app();

    press(&mut app, KeyCode::Char('m'), KeyModifiers::ALT);
    assert_eq!(
        app.status_message.as_deref(),
        Some("Split the workspace first (Ctrl+L)")
    );

    press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    assert!(app.status_message.is_none());
}

#[test]
fn test_unknown_command_is_an_error() {
    let mut app = test_app();

    let err = app.execute_command("nope").unwrap_err();
    assert_eq!(err.to_string(), "Unknown command: nope");
}

#[test]
fn test_palette_filtering() {
    let mut app = test_app();

    assert_eq!(app.palette_suggestions().len(), 1);

    app.command_input = "GUIDE".to_string();
    assert_eq!(
        app.palette_suggestions(),
        vec![(OPEN_PREFERENCES_COMMAND.to_string(), "Guidelines".to_string())]
    );

    app.command_input = "open_pref".to_string();
    assert_eq!(app.palette_suggestions().len(), 1);

    app.command_input = "zzz".to_string();
    assert!(app.palette_suggestions().is_empty());
}

#[test]
fn test_palette_escape_closes() {
    let mut app = test_app();

    press(&mut app, KeyCode::Char('p'), KeyModifiers::ALT);
    press(&mut app, KeyCode::Char('x'), KeyModifiers::NONE);
    assert_eq!(app.command_input, "x");

    press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
    assert_eq!(app.command_mode, CommandMode::Normal);
    assert!(app.command_input.is_empty());
}

#[test]
fn test_event_bus_subscribe_and_unsubscribe() {
    let bus = EventBus::new();

    let id = bus.subscribe("quit", |_, _| Ok(()));
    assert_eq!(bus.subscriber_count("quit"), 1);

    assert!(bus.unsubscribe(id));
    assert!(!bus.unsubscribe(id));
    assert_eq!(bus.subscriber_count("quit"), 0);
}

#[test]
fn test_event_bus_queues_in_order() {
    let bus = EventBus::new();
    bus.publish(AppEvent::PaneLayoutChange).unwrap();
    bus.publish(AppEvent::Quit).unwrap();

    assert_eq!(
        bus.take_pending(),
        vec![AppEvent::PaneLayoutChange, AppEvent::Quit]
    );
    assert!(bus.take_pending().is_empty());
}

#[test]
fn test_subscription_guard_unsubscribes_on_drop() {
    let bus = EventBus::new();
    {
        let mut guard = SubscriptionGuard::new(bus.clone());
        guard.subscribe("key_input", |_, _| Ok(()));
        guard.subscribe("button_click", |_, _| Ok(()));
        assert_eq!(guard.len(), 2);
        assert_eq!(bus.subscriber_count("key_input"), 1);
    }

    assert_eq!(bus.subscriber_count("key_input"), 0);
    assert_eq!(bus.subscriber_count("button_click"), 0);
}

#[test]
fn test_failing_handler_does_not_stop_others() {
    let mut app = test_app();
    let calls = Arc::new(AtomicUsize::new(0));

    app.events
        .subscribe("pane_layout_change", |_, _| Err(anyhow!("boom")));
    let counter = calls.clone();
    app.events.subscribe("pane_layout_change", move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });

    app.dispatch(&AppEvent::PaneLayoutChange);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

struct FailingPlugin;

impl Plugin for FailingPlugin {
    fn id(&self) -> &str {
        "failing"
    }

    fn init(&self, _app: &mut App) -> Result<()> {
        Err(anyhow!("cannot start"))
    }
}

struct CountingPlugin(Arc<AtomicUsize>);

impl Plugin for CountingPlugin {
    fn id(&self) -> &str {
        "counting"
    }

    fn init(&self, _app: &mut App) -> Result<()> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_plugin_failures_are_skipped() {
    let mut app = test_app();
    let count = Arc::new(AtomicUsize::new(0));
    let manager = PluginManager::with_plugins(vec![
        Box::new(FailingPlugin),
        Box::new(CountingPlugin(count.clone())),
    ]);

    assert_eq!(manager.plugin_ids(), vec!["failing", "counting"]);
    assert_eq!(manager.load_plugins(&mut app), 1);
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_guidelines_plugin_cannot_load_twice() {
    let mut app = test_app();

    // Its preferences are already defined
    assert_eq!(PluginManager::new().load_plugins(&mut app), 0);
    assert_eq!(app.commands.len(), 1);
}
