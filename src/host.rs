//! Host gateway - the privileged surface the chat UI talks to
//!
//! Everything the widget needs from the host process (window visibility,
//! screenshot protection, global shortcut capture, settings persistence)
//! goes through the `HostGateway` trait. The real implementation sits on a
//! `tauri::AppHandle`; tests inject a recording fake instead.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tauri::{AppHandle, Manager, WebviewWindow};
use thiserror::Error;

use crate::settings::AppSettings;
use crate::shortcuts;

/// Settings live as one JSON record under the platform config directory.
const SETTINGS_DIR: &str = "aithing";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum HostError {
    #[error("main window not available")]
    WindowUnavailable,
    #[error("window operation failed: {0}")]
    Window(#[from] tauri::Error),
    #[error("shortcut registration failed: {0}")]
    Shortcut(#[from] tauri_plugin_global_shortcut::Error),
    #[error("settings storage failed: {0}")]
    Storage(#[from] std::io::Error),
    #[error("settings record is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// One async method per host call. All calls are independent request/response
/// invocations; none of them retries or rolls back on failure.
#[async_trait]
pub trait HostGateway: Send + Sync {
    async fn get_settings(&self) -> Result<AppSettings, HostError>;
    async fn set_settings(&self, settings: AppSettings) -> Result<(), HostError>;
    async fn set_screenshot_protection(&self, enabled: bool) -> Result<(), HostError>;
    async fn set_shortcuts_enabled(&self, enabled: bool) -> Result<(), HostError>;
    /// Shows or hides the main window, returning the new visibility.
    async fn toggle_visibility(&self) -> Result<bool, HostError>;
    /// Hides the main window directly, without consulting current visibility.
    async fn hide_window(&self) -> Result<(), HostError>;
}

/// Production gateway backed by the Tauri runtime.
pub struct TauriHost {
    app: AppHandle,
    settings_path: PathBuf,
}

impl TauriHost {
    pub fn new(app: AppHandle) -> Self {
        let settings_path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SETTINGS_DIR)
            .join(SETTINGS_FILE);
        Self { app, settings_path }
    }

    fn main_window(&self) -> Result<WebviewWindow, HostError> {
        self.app
            .get_webview_window("main")
            .ok_or(HostError::WindowUnavailable)
    }
}

#[async_trait]
impl HostGateway for TauriHost {
    async fn get_settings(&self) -> Result<AppSettings, HostError> {
        load_settings_file(&self.settings_path).await
    }

    async fn set_settings(&self, settings: AppSettings) -> Result<(), HostError> {
        store_settings_file(&self.settings_path, &settings).await
    }

    async fn set_screenshot_protection(&self, enabled: bool) -> Result<(), HostError> {
        let window = self.main_window()?;
        window.set_content_protected(enabled)?;
        Ok(())
    }

    async fn set_shortcuts_enabled(&self, enabled: bool) -> Result<(), HostError> {
        shortcuts::set_enabled(&self.app, enabled)?;
        Ok(())
    }

    async fn toggle_visibility(&self) -> Result<bool, HostError> {
        let window = self.main_window()?;
        let is_visible = window.is_visible()?;
        if is_visible {
            window.hide()?;
        } else {
            window.show()?;
        }
        Ok(!is_visible)
    }

    async fn hide_window(&self) -> Result<(), HostError> {
        let window = self.main_window()?;
        window.hide()?;
        Ok(())
    }
}

/// Read the persisted record. A missing file is first run, not an error.
pub(crate) async fn load_settings_file(path: &Path) -> Result<AppSettings, HostError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(AppSettings::default()),
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn store_settings_file(
    path: &Path,
    settings: &AppSettings,
) -> Result<(), HostError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_vec_pretty(settings)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Shared test double: records every call and can be told to fail
/// individual operations.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum HostCall {
        GetSettings,
        SetSettings(AppSettings),
        SetScreenshotProtection(bool),
        SetShortcutsEnabled(bool),
        ToggleVisibility,
        HideWindow,
    }

    #[derive(Default)]
    pub struct RecordingHost {
        pub calls: Mutex<Vec<HostCall>>,
        pub stored: Mutex<Option<AppSettings>>,
        pub fail_get: bool,
        pub fail_set_settings: bool,
        pub fail_protection: bool,
        pub fail_shortcuts: bool,
    }

    impl RecordingHost {
        pub fn with_stored(settings: AppSettings) -> Self {
            Self {
                stored: Mutex::new(Some(settings)),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<HostCall> {
            self.calls.lock().expect("calls lock").clone()
        }

        fn record(&self, call: HostCall) {
            self.calls.lock().expect("calls lock").push(call);
        }
    }

    #[async_trait]
    impl HostGateway for RecordingHost {
        async fn get_settings(&self) -> Result<AppSettings, HostError> {
            self.record(HostCall::GetSettings);
            if self.fail_get {
                return Err(HostError::WindowUnavailable);
            }
            Ok(self
                .stored
                .lock()
                .expect("stored lock")
                .clone()
                .unwrap_or_default())
        }

        async fn set_settings(&self, settings: AppSettings) -> Result<(), HostError> {
            self.record(HostCall::SetSettings(settings.clone()));
            if self.fail_set_settings {
                return Err(HostError::WindowUnavailable);
            }
            *self.stored.lock().expect("stored lock") = Some(settings);
            Ok(())
        }

        async fn set_screenshot_protection(&self, enabled: bool) -> Result<(), HostError> {
            self.record(HostCall::SetScreenshotProtection(enabled));
            if self.fail_protection {
                return Err(HostError::WindowUnavailable);
            }
            Ok(())
        }

        async fn set_shortcuts_enabled(&self, enabled: bool) -> Result<(), HostError> {
            self.record(HostCall::SetShortcutsEnabled(enabled));
            if self.fail_shortcuts {
                return Err(HostError::WindowUnavailable);
            }
            Ok(())
        }

        async fn toggle_visibility(&self) -> Result<bool, HostError> {
            self.record(HostCall::ToggleVisibility);
            Ok(true)
        }

        async fn hide_window(&self) -> Result<(), HostError> {
            self.record(HostCall::HideWindow);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_settings_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        let settings = load_settings_file(&path).await.expect("load");
        assert_eq!(settings, AppSettings::default());
    }

    #[tokio::test]
    async fn settings_file_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("settings.json");
        let settings = AppSettings {
            show_in_screenshot: true,
            open_at_login: true,
            shortcuts_enabled: false,
        };
        store_settings_file(&path, &settings).await.expect("store");
        let loaded = load_settings_file(&path).await.expect("load");
        assert_eq!(loaded, settings);
    }

    #[tokio::test]
    async fn corrupt_settings_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("settings.json");
        tokio::fs::write(&path, b"not json").await.expect("write");
        let result = load_settings_file(&path).await;
        assert!(matches!(result, Err(HostError::Malformed(_))));
    }
}
