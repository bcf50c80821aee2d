//! Dashboard view modes and the policy that picks the one actually rendered.

use crate::layout::{BORDER, MIN_PANEL_WIDTH, PANEL_GAP};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Grid,
    Stacked,
    Tabs,
    /// Also accepts the retired "list" name.
    #[serde(alias = "list", alias = "List")]
    Split,
    Compare,
}

impl ViewMode {
    /// User-selectable modes in cycling order.
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Grid,
        ViewMode::Stacked,
        ViewMode::Tabs,
        ViewMode::Split,
        ViewMode::Compare,
    ];

    /// Lenient parse of a stored preference. The legacy "list" maps to Split;
    /// anything unknown falls back to Grid.
    pub fn parse(s: &str) -> ViewMode {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" => ViewMode::Grid,
            "stacked" => ViewMode::Stacked,
            "tabs" => ViewMode::Tabs,
            "split" | "list" => ViewMode::Split,
            "compare" => ViewMode::Compare,
            other => {
                log::warn!("unknown view mode {:?}, using grid", other);
                ViewMode::Grid
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Grid => "grid",
            ViewMode::Stacked => "stacked",
            ViewMode::Tabs => "tabs",
            ViewMode::Split => "split",
            ViewMode::Compare => "compare",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Grid => "Grid",
            ViewMode::Stacked => "Stacked",
            ViewMode::Tabs => "Tabs",
            ViewMode::Split => "Split",
            ViewMode::Compare => "Compare",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }

    pub fn next(self) -> ViewMode {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> ViewMode {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Geometry behind the narrow-terminal fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthPolicy {
    pub min_tile_width: u16,
    pub border: u16,
    pub gap: u16,
}

impl Default for WidthPolicy {
    fn default() -> Self {
        Self {
            min_tile_width: 28,
            border: BORDER,
            gap: PANEL_GAP,
        }
    }
}

impl WidthPolicy {
    /// Narrowest terminal that still fits two tiles side by side.
    pub fn two_column_min_width(&self) -> u16 {
        let tile = self.min_tile_width.max(MIN_PANEL_WIDTH) + 2 * self.border;
        tile * 2 + self.gap
    }

    /// The mode to render this frame. Recomputed every call; never written
    /// back to the configured preference.
    pub fn effective(&self, configured: ViewMode, items: usize, width: u16) -> ViewMode {
        if items > 1 && width < self.two_column_min_width() {
            if configured != ViewMode::Stacked {
                log::debug!(
                    "width {} below {}, rendering stacked instead of {}",
                    width,
                    self.two_column_min_width(),
                    configured.as_str()
                );
            }
            ViewMode::Stacked
        } else {
            configured
        }
    }
}

/// Decisions the key dispatcher hands to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    NextMode,
    PreviousMode,
    SetMode(ViewMode),
    NextTab,
    PreviousTab,
    ScrollUp,
    ScrollDown,
}

/// Caller-owned dashboard state. Transitions consume the old value and
/// return a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardState {
    pub configured: ViewMode,
    pub active_tab: usize,
    pub scroll: usize,
}

impl DashboardState {
    pub fn new(configured: ViewMode) -> Self {
        Self {
            configured,
            ..Self::default()
        }
    }

    /// Next state after `action` with `items` visible items. Tab moves wrap
    /// in both directions and scrolling stops at the last item, so every
    /// stored value is one the view can show.
    #[must_use]
    pub fn apply(self, action: Action, items: usize) -> Self {
        let tab = self.tab_index(items);
        let scroll = self.scroll_offset(items);
        match action {
            Action::NextMode => Self {
                configured: self.configured.next(),
                ..self
            },
            Action::PreviousMode => Self {
                configured: self.configured.previous(),
                ..self
            },
            Action::SetMode(mode) => Self {
                configured: mode,
                ..self
            },
            Action::NextTab if items > 0 => Self {
                active_tab: (tab + 1) % items,
                ..self
            },
            Action::PreviousTab if items > 0 => Self {
                active_tab: (tab + items - 1) % items,
                ..self
            },
            Action::NextTab | Action::PreviousTab => Self {
                active_tab: 0,
                ..self
            },
            Action::ScrollUp => Self {
                scroll: scroll.saturating_sub(1),
                ..self
            },
            Action::ScrollDown => Self {
                scroll: (scroll + 1).min(items.saturating_sub(1)),
                ..self
            },
        }
    }

    /// Active tab wrapped into `0..items`.
    pub fn tab_index(&self, items: usize) -> usize {
        if items == 0 {
            0
        } else {
            self.active_tab % items
        }
    }

    /// Scroll offset clamped to the last item.
    pub fn scroll_offset(&self, items: usize) -> usize {
        self.scroll.min(items.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps_both_ends() {
        assert_eq!(ViewMode::Compare.next(), ViewMode::Grid);
        assert_eq!(ViewMode::Grid.previous(), ViewMode::Compare);
        let mut mode = ViewMode::Grid;
        for _ in 0..ViewMode::ALL.len() {
            mode = mode.next();
        }
        assert_eq!(mode, ViewMode::Grid);
    }

    #[test]
    fn test_legacy_list_is_split() {
        assert_eq!(ViewMode::parse("list"), ViewMode::Split);
        assert_eq!(ViewMode::parse(" List "), ViewMode::Split);
        assert_eq!(ViewMode::parse("bogus"), ViewMode::Grid);
        let mode: ViewMode = serde_json::from_str("\"list\"").unwrap();
        assert_eq!(mode, ViewMode::Split);
        assert_eq!(serde_json::to_string(&mode).unwrap(), "\"split\"");
        assert!(!ViewMode::ALL.iter().any(|m| m.as_str() == "list"));
    }

    #[test]
    fn test_two_column_threshold() {
        let policy = WidthPolicy {
            min_tile_width: 20,
            border: 1,
            gap: 2,
        };
        assert_eq!(policy.two_column_min_width(), 46);
    }

    #[test]
    fn test_narrow_width_forces_stacked() {
        let policy = WidthPolicy::default();
        let narrow = policy.two_column_min_width() - 1;
        for mode in ViewMode::ALL {
            assert_eq!(policy.effective(mode, 2, narrow), ViewMode::Stacked);
            assert_eq!(policy.effective(mode, 2, narrow + 1), mode);
            // a single item never needs two columns
            assert_eq!(policy.effective(mode, 1, 10), mode);
        }
    }

    #[test]
    fn test_override_is_not_latched() {
        let policy = WidthPolicy::default();
        let state = DashboardState::new(ViewMode::Compare);
        assert_eq!(policy.effective(state.configured, 3, 20), ViewMode::Stacked);
        assert_eq!(state.configured, ViewMode::Compare);
        assert_eq!(policy.effective(state.configured, 3, 200), ViewMode::Compare);
    }

    #[test]
    fn test_transitions_return_new_state() {
        let start = DashboardState::new(ViewMode::Grid);
        let next = start.apply(Action::NextMode, 3).apply(Action::ScrollDown, 3);
        assert_eq!(start.configured, ViewMode::Grid);
        assert_eq!(next.configured, ViewMode::Stacked);
        assert_eq!(next.scroll, 1);
        assert_eq!(next.apply(Action::ScrollUp, 3).apply(Action::ScrollUp, 3).scroll, 0);
        assert_eq!(
            start.apply(Action::SetMode(ViewMode::Tabs), 3).configured,
            ViewMode::Tabs
        );
    }

    #[test]
    fn test_tab_and_scroll_clamping() {
        let state = DashboardState {
            active_tab: 7,
            scroll: 9,
            ..Default::default()
        };
        assert_eq!(state.tab_index(3), 1);
        assert_eq!(state.tab_index(0), 0);
        assert_eq!(state.scroll_offset(4), 3);
        // out-of-range values are pulled back in before moving
        assert_eq!(state.apply(Action::PreviousTab, 3).active_tab, 0);
        assert_eq!(state.apply(Action::ScrollUp, 4).scroll, 2);
    }

    #[test]
    fn test_scroll_up_responds_after_overscroll() {
        let mut state = DashboardState::new(ViewMode::Stacked);
        for _ in 0..10 {
            state = state.apply(Action::ScrollDown, 4);
        }
        assert_eq!(state.scroll, 3);
        assert_eq!(state.apply(Action::ScrollUp, 4).scroll, 2);
        assert_eq!(DashboardState::default().apply(Action::ScrollDown, 0).scroll, 0);
    }

    #[test]
    fn test_tab_cycle_wraps_both_ways() {
        let start = DashboardState::new(ViewMode::Tabs);
        assert_eq!(start.apply(Action::PreviousTab, 3).active_tab, 2);
        let mut state = start;
        for _ in 0..3 {
            state = state.apply(Action::NextTab, 3);
        }
        assert_eq!(state.active_tab, 0);
        assert_eq!(start.apply(Action::NextTab, 0).active_tab, 0);
    }
}
