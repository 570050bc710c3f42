//! User settings - in-memory record plus host synchronization
//!
//! The controller owns the only mutable copy of `AppSettings`. Each toggle
//! change mutates exactly one field and immediately pushes the full record
//! back to the host - no batching, no debouncing. Failures are logged and
//! swallowed so a broken settings layer never blocks chat interaction.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::host::HostGateway;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub show_in_screenshot: bool,
    pub open_at_login: bool,
    pub shortcuts_enabled: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            show_in_screenshot: false,
            open_at_login: false,
            shortcuts_enabled: true,
        }
    }
}

pub struct SettingsController {
    settings: AppSettings,
    gateway: Arc<dyn HostGateway>,
}

impl SettingsController {
    pub fn new(gateway: Arc<dyn HostGateway>) -> Self {
        Self {
            settings: AppSettings::default(),
            gateway,
        }
    }

    pub fn settings(&self) -> AppSettings {
        self.settings.clone()
    }

    /// Pull the persisted record from the host, replacing the in-memory copy
    /// wholesale on success. On failure the prior values stay in place - no
    /// retry, no user-visible error. Returns the record now in effect so the
    /// bound toggle controls can be mirrored.
    pub async fn load(&mut self) -> AppSettings {
        match self.gateway.get_settings().await {
            Ok(settings) => self.settings = settings,
            Err(e) => log::warn!("settings load failed, keeping current values: {e}"),
        }
        self.settings.clone()
    }

    /// Push the full record to the host, then apply its two side effects:
    /// screenshot protection (inverse of `show_in_screenshot`) and global
    /// shortcut capture. The three calls are awaited in order but are
    /// otherwise independent - one failing does not roll back or skip the
    /// others, so the side effects may partially apply.
    pub async fn save(&self) {
        if let Err(e) = self.gateway.set_settings(self.settings.clone()).await {
            log::warn!("settings save failed: {e}");
        }
        // protected == hidden from screenshots
        if let Err(e) = self
            .gateway
            .set_screenshot_protection(!self.settings.show_in_screenshot)
            .await
        {
            log::warn!("screenshot protection update failed: {e}");
        }
        if let Err(e) = self
            .gateway
            .set_shortcuts_enabled(self.settings.shortcuts_enabled)
            .await
        {
            log::warn!("shortcut capture update failed: {e}");
        }
    }

    pub async fn set_show_in_screenshot(&mut self, enabled: bool) {
        self.settings.show_in_screenshot = enabled;
        self.save().await;
    }

    // No control binds this yet; the field rides along in the record.
    pub async fn set_open_at_login(&mut self, enabled: bool) {
        self.settings.open_at_login = enabled;
        self.save().await;
    }

    pub async fn set_shortcuts_enabled(&mut self, enabled: bool) {
        self.settings.shortcuts_enabled = enabled;
        self.save().await;
    }
}
