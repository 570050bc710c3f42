//! Global shortcuts - bindings, registration toggling, action dispatch
//!
//! The host side registers two bindings and turns every press into a
//! `shortcut-triggered` event carrying an action string. The dispatcher on
//! the receiving side recognizes exactly one action; anything else is
//! dropped without a sound.

use std::sync::Arc;

use tauri::AppHandle;
use tauri_plugin_global_shortcut::{Code, GlobalShortcutExt, Modifiers, Shortcut};

use crate::host::HostGateway;

/// Event name for host-pushed shortcut notifications.
pub const SHORTCUT_EVENT: &str = "shortcut-triggered";

/// Action payload carried by `shortcut-triggered` events.
pub const ACTION_TOGGLE_VISIBILITY: &str = "toggle-visibility";

/// The registered bindings: Control+Option+Space (Control+Alt+Space on
/// Windows/Linux) plus Control+Space as an alternative. Both map to the
/// same action.
pub fn bindings() -> [Shortcut; 2] {
    [
        Shortcut::new(Some(Modifiers::ALT | Modifiers::CONTROL), Code::Space),
        Shortcut::new(Some(Modifiers::CONTROL), Code::Space),
    ]
}

/// Map a pressed shortcut to its action payload.
pub fn action_for(shortcut: &Shortcut) -> Option<&'static str> {
    bindings()
        .iter()
        .find(|binding| binding.id() == shortcut.id())
        .map(|_| ACTION_TOGGLE_VISIBILITY)
}

/// Register or unregister every binding. Unregistering a binding that was
/// never registered is harmless and ignored.
pub fn set_enabled(
    app: &AppHandle,
    enabled: bool,
) -> Result<(), tauri_plugin_global_shortcut::Error> {
    if enabled {
        app.global_shortcut().register_multiple(bindings())?;
    } else {
        for binding in bindings() {
            let _ = app.global_shortcut().unregister(binding);
        }
    }
    Ok(())
}

/// Receives the action strings pushed by the host and re-invokes the
/// matching host call. Unrecognized actions are ignored silently.
pub struct ShortcutDispatcher {
    gateway: Arc<dyn HostGateway>,
}

impl ShortcutDispatcher {
    pub fn new(gateway: Arc<dyn HostGateway>) -> Self {
        Self { gateway }
    }

    pub async fn dispatch(&self, action: &str) {
        match action {
            ACTION_TOGGLE_VISIBILITY => {
                if let Err(e) = self.gateway.toggle_visibility().await {
                    log::warn!("visibility toggle failed: {e}");
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::{HostCall, RecordingHost};

    #[test]
    fn both_bindings_map_to_toggle_visibility() {
        for binding in bindings() {
            assert_eq!(action_for(&binding), Some(ACTION_TOGGLE_VISIBILITY));
        }
    }

    #[test]
    fn unrelated_shortcuts_map_to_nothing() {
        let other = Shortcut::new(Some(Modifiers::SUPER), Code::KeyK);
        assert_eq!(action_for(&other), None);
    }

    #[tokio::test]
    async fn toggle_action_invokes_exactly_one_host_call() {
        let host = Arc::new(RecordingHost::default());
        let dispatcher = ShortcutDispatcher::new(Arc::clone(&host) as Arc<dyn HostGateway>);

        dispatcher.dispatch(ACTION_TOGGLE_VISIBILITY).await;
        assert_eq!(host.calls(), vec![HostCall::ToggleVisibility]);
    }

    #[tokio::test]
    async fn unrecognized_action_touches_nothing() {
        let host = Arc::new(RecordingHost::default());
        let dispatcher = ShortcutDispatcher::new(Arc::clone(&host) as Arc<dyn HostGateway>);

        dispatcher.dispatch("open-the-pod-bay-doors").await;
        dispatcher.dispatch("").await;
        assert!(host.calls().is_empty());
    }
}
