//! AIThing - AI assistant chat widget visible on top of all apps
//!
//! Library entry for the Tauri application:
//! - `HostGateway` over window management, settings persistence, and global
//!   shortcut capture, with the real implementation on the app handle
//! - settings synchronization between the toggle controls and the host
//! - chat session view-model with a placeholder assistant backend
//! - commands and pushed events wiring the webview shell

pub mod chat;
pub mod host;
pub mod settings;
pub mod shortcuts;
pub mod ui;

use std::sync::Arc;

use tauri::{AppHandle, Emitter, Listener, Manager, State};
use tauri_plugin_global_shortcut::ShortcutState;
use tokio::sync::Mutex;

use chat::{ChatController, ChatEvents, ChatSnapshot, PlaceholderBackend};
use host::{HostGateway, TauriHost};
use settings::{AppSettings, SettingsController};
use shortcuts::ShortcutDispatcher;
use ui::SettingsPanelState;

pub struct AppState {
    settings: Mutex<SettingsController>,
    chat: ChatController,
    panel: Mutex<SettingsPanelState>,
    gateway: Arc<dyn HostGateway>,
    shortcut_subscription: std::sync::Mutex<Option<tauri::EventId>>,
}

/// Forwards transcript snapshots to the webview as `chat-updated` events.
struct WebviewChatEvents {
    app: AppHandle,
}

impl ChatEvents for WebviewChatEvents {
    fn chat_updated(&self, snapshot: ChatSnapshot) {
        if let Err(e) = self.app.emit("chat-updated", snapshot) {
            log::warn!("chat-updated emit failed: {e}");
        }
    }
}

// =============================================================================
// TAURI COMMANDS
// =============================================================================

#[tauri::command]
async fn get_settings(state: State<'_, AppState>) -> Result<AppSettings, String> {
    Ok(state.settings.lock().await.settings())
}

#[tauri::command]
async fn set_show_in_screenshot(
    enabled: bool,
    state: State<'_, AppState>,
) -> Result<(), String> {
    state
        .settings
        .lock()
        .await
        .set_show_in_screenshot(enabled)
        .await;
    Ok(())
}

#[tauri::command]
async fn set_shortcuts_enabled(enabled: bool, state: State<'_, AppState>) -> Result<(), String> {
    state
        .settings
        .lock()
        .await
        .set_shortcuts_enabled(enabled)
        .await;
    Ok(())
}

#[tauri::command]
async fn send_message(text: String, state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.chat.send_message(&text).await)
}

#[tauri::command]
async fn chat_snapshot(state: State<'_, AppState>) -> Result<ChatSnapshot, String> {
    Ok(state.chat.snapshot().await)
}

// minimize goes through the visibility toggle; close hides directly
#[tauri::command]
async fn toggle_visibility(state: State<'_, AppState>) -> Result<bool, String> {
    state
        .gateway
        .toggle_visibility()
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
async fn hide_main_window(state: State<'_, AppState>) -> Result<(), String> {
    state.gateway.hide_window().await.map_err(|e| e.to_string())
}

#[tauri::command]
async fn settings_panel_toggle(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.panel.lock().await.toggle())
}

#[tauri::command]
async fn settings_panel_close(state: State<'_, AppState>) -> Result<bool, String> {
    Ok(state.panel.lock().await.close())
}

#[tauri::command]
async fn settings_panel_outside_click(
    inside_panel: bool,
    on_toggle_button: bool,
    state: State<'_, AppState>,
) -> Result<bool, String> {
    Ok(state
        .panel
        .lock()
        .await
        .handle_click(inside_panel, on_toggle_button))
}

#[tauri::command]
fn input_height(scroll_height: f64) -> f64 {
    ui::input_height(scroll_height)
}

// =============================================================================
// STARTUP & TEARDOWN
// =============================================================================

/// Strictly ordered startup: load settings (and apply their side effects),
/// then subscribe to host-pushed shortcut events. Each step stands alone - a
/// failed load never blocks the subscription.
async fn startup(handle: AppHandle) {
    let state = handle.state::<AppState>();

    let loaded = state.settings.lock().await.load().await;
    if let Err(e) = shortcuts::set_enabled(&handle, loaded.shortcuts_enabled) {
        log::warn!("startup shortcut registration failed: {e}");
    }
    if let Err(e) = state
        .gateway
        .set_screenshot_protection(!loaded.show_in_screenshot)
        .await
    {
        log::warn!("startup screenshot protection failed: {e}");
    }
    // mirror the loaded record into the bound toggle controls
    if let Err(e) = handle.emit("settings-loaded", &loaded) {
        log::warn!("settings-loaded emit failed: {e}");
    }

    let dispatcher = Arc::new(ShortcutDispatcher::new(Arc::clone(&state.gateway)));
    let subscription = handle.listen(shortcuts::SHORTCUT_EVENT, move |event| {
        // event payloads arrive JSON-encoded
        let action = serde_json::from_str::<String>(event.payload()).unwrap_or_default();
        let dispatcher = Arc::clone(&dispatcher);
        tauri::async_runtime::spawn(async move {
            dispatcher.dispatch(&action).await;
        });
    });
    if let Ok(mut slot) = state.shortcut_subscription.lock() {
        *slot = Some(subscription);
    };
}

fn teardown(window: &tauri::Window) {
    let state = window.state::<AppState>();
    state.chat.shutdown();
    if let Ok(mut slot) = state.shortcut_subscription.lock() {
        if let Some(subscription) = slot.take() {
            window.app_handle().unlisten(subscription);
        }
    };
}

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tauri::Builder::default()
        .plugin(
            tauri_plugin_log::Builder::default()
                .level(log::LevelFilter::Info)
                .build(),
        )
        .plugin(
            tauri_plugin_global_shortcut::Builder::new()
                .with_handler(|app, shortcut, event| {
                    if event.state() == ShortcutState::Pressed {
                        if let Some(action) = shortcuts::action_for(shortcut) {
                            if let Err(e) = app.emit(shortcuts::SHORTCUT_EVENT, action) {
                                log::warn!("shortcut event emit failed: {e}");
                            }
                        }
                    }
                })
                .build(),
        )
        .setup(|app| {
            let handle = app.handle().clone();
            let gateway: Arc<dyn HostGateway> = Arc::new(TauriHost::new(handle.clone()));
            app.manage(AppState {
                settings: Mutex::new(SettingsController::new(Arc::clone(&gateway))),
                chat: ChatController::new(
                    Arc::new(PlaceholderBackend),
                    Arc::new(WebviewChatEvents {
                        app: handle.clone(),
                    }),
                ),
                panel: Mutex::new(SettingsPanelState::default()),
                gateway,
                shortcut_subscription: std::sync::Mutex::new(None),
            });

            tauri::async_runtime::spawn(startup(handle));
            Ok(())
        })
        .on_window_event(|window, event| {
            if matches!(event, tauri::WindowEvent::Destroyed) && window.label() == "main" {
                teardown(window);
            }
        })
        .invoke_handler(tauri::generate_handler![
            get_settings,
            set_show_in_screenshot,
            set_shortcuts_enabled,
            send_message,
            chat_snapshot,
            toggle_visibility,
            hide_main_window,
            settings_panel_toggle,
            settings_panel_close,
            settings_panel_outside_click,
            input_height
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
