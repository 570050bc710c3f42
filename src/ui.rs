//! Local view state - settings panel visibility and input auto-resize
//!
//! Nothing here talks to the host. Panel visibility is a CSS-class concern
//! the shell applies, and the input clamp is pure arithmetic; both live
//! behind commands so the shell carries no logic of its own.

/// Tallest the input grows before it scrolls internally (logical px).
pub const INPUT_MAX_HEIGHT: f64 = 120.0;

/// Clamp the measured scroll height to the growth limit. The shell resets
/// the textarea height to auto, measures, then applies this on every input
/// event - giving grow-then-scroll behavior.
pub fn input_height(scroll_height: f64) -> f64 {
    scroll_height.min(INPUT_MAX_HEIGHT)
}

/// Open/closed state of the settings panel. Not host-persisted.
#[derive(Debug, Default)]
pub struct SettingsPanelState {
    open: bool,
}

impl SettingsPanelState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The settings button flips the panel. Returns the new state.
    pub fn toggle(&mut self) -> bool {
        self.open = !self.open;
        self.open
    }

    /// The dedicated close button. Idempotent.
    pub fn close(&mut self) -> bool {
        self.open = false;
        self.open
    }

    /// Capture-phase outside-click dismissal: any click that lands neither
    /// inside the panel nor on its toggle button closes the panel, even when
    /// it is already closed. Returns the resulting state.
    pub fn handle_click(&mut self, inside_panel: bool, on_toggle_button: bool) -> bool {
        if !inside_panel && !on_toggle_button {
            self.open = false;
        }
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_height_clamps_at_maximum() {
        assert_eq!(input_height(40.0), 40.0);
        assert_eq!(input_height(120.0), 120.0);
        assert_eq!(input_height(500.0), 120.0);
    }

    #[test]
    fn toggle_flips_and_close_is_idempotent() {
        let mut panel = SettingsPanelState::default();
        assert!(!panel.is_open());
        assert!(panel.toggle());
        assert!(!panel.toggle());
        panel.toggle();
        assert!(!panel.close());
        assert!(!panel.close());
    }

    #[test]
    fn outside_click_always_closes() {
        let mut panel = SettingsPanelState::default();
        panel.toggle();
        assert!(!panel.handle_click(false, false));
        // already closed - still closed, no error
        assert!(!panel.handle_click(false, false));
    }

    #[test]
    fn clicks_on_panel_or_toggle_button_leave_it_open() {
        let mut panel = SettingsPanelState::default();
        panel.toggle();
        assert!(panel.handle_click(true, false));
        assert!(panel.handle_click(false, true));
    }
}
