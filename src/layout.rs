//! Pane layout state read by the rendering layer

use crate::types::PanelId;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// How long pane widths stay on screen after the last resize
pub const WIDTH_OVERLAY_HOLD: Duration = Duration::from_secs(1);

/// Split direction of the pane group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Panes side by side
    #[default]
    Vertical,
    /// Panes stacked
    Horizontal,
}

impl Direction {
    /// Parse the page's `dir` parameter: `h` is horizontal, anything else vertical
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("h") => Direction::Horizontal,
            _ => Direction::Vertical,
        }
    }

    pub fn as_param(self) -> &'static str {
        match self {
            Direction::Vertical => "v",
            Direction::Horizontal => "h",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Vertical => write!(f, "vertical"),
            Direction::Horizontal => write!(f, "horizontal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub collapsed: bool,
    /// Share of the pane group, in percent
    pub size: f64,
}

/// Shows pane widths briefly after resizing.
///
/// Every layout change restarts the hold window; only the latest change
/// decides when the overlay hides.
#[derive(Debug, Clone)]
pub struct WidthOverlay {
    hold: Duration,
    visible_until: Option<Instant>,
}

impl WidthOverlay {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            visible_until: None,
        }
    }

    pub fn on_layout_change(&mut self, now: Instant) {
        self.visible_until = Some(now + self.hold);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.visible_until.is_some_and(|until| now < until)
    }
}

impl Default for WidthOverlay {
    fn default() -> Self {
        Self::new(WIDTH_OVERLAY_HOLD)
    }
}

/// Panel group state: direction, per-panel collapse and size, toolbar toggles
#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub direction: Direction,
    pub show_toolbar: bool,
    pub show_resizer: bool,
    pub width_overlay: WidthOverlay,
    order: Vec<PanelId>,
    panels: HashMap<PanelId, PanelState>,
}

impl PanelLayout {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            show_toolbar: true,
            show_resizer: true,
            width_overlay: WidthOverlay::default(),
            order: Vec::new(),
            panels: HashMap::new(),
        }
    }

    /// Register a new visible panel at the end of the group
    pub fn attach(&mut self, panel: PanelId) {
        if self.panels.contains_key(&panel) {
            return;
        }
        self.order.push(panel);
        self.panels.insert(
            panel,
            PanelState {
                collapsed: false,
                size: 0.0,
            },
        );
    }

    pub fn detach(&mut self, panel: PanelId) {
        self.order.retain(|p| *p != panel);
        self.panels.remove(&panel);
    }

    pub fn panel(&self, panel: PanelId) -> Option<&PanelState> {
        self.panels.get(&panel)
    }

    pub fn is_collapsed(&self, panel: PanelId) -> bool {
        self.panels.get(&panel).is_some_and(|p| p.collapsed)
    }

    pub fn visible_count(&self) -> usize {
        self.panels.values().filter(|p| !p.collapsed).count()
    }

    /// Panels in group order that are not collapsed
    pub fn visible(&self) -> Vec<PanelId> {
        self.order
            .iter()
            .copied()
            .filter(|p| !self.is_collapsed(*p))
            .collect()
    }

    /// Collapse or expand a panel.
    ///
    /// Returns `false` without changing anything when the panel is unknown,
    /// or when collapsing it would leave nothing visible. Expanding always
    /// succeeds.
    pub fn toggle(&mut self, panel: PanelId) -> bool {
        let visible = self.visible_count();
        let Some(state) = self.panels.get_mut(&panel) else {
            return false;
        };
        if !state.collapsed && visible <= 1 {
            return false;
        }

        state.collapsed = !state.collapsed;
        true
    }

    /// Expand the first panel in group order when every panel is collapsed
    pub fn ensure_visible(&mut self) {
        if self.visible_count() > 0 {
            return;
        }
        let Some(first) = self.order.first().copied() else {
            return;
        };
        if let Some(state) = self.panels.get_mut(&first) {
            state.collapsed = false;
        }
    }

    /// Assign sizes in group order and expand every panel
    pub fn set_layout(&mut self, sizes: &[f64]) {
        for (panel, size) in self.order.iter().zip(sizes) {
            if let Some(state) = self.panels.get_mut(panel) {
                state.size = *size;
                state.collapsed = false;
            }
        }
    }

    pub fn toggle_toolbar(&mut self) {
        self.show_toolbar = !self.show_toolbar;
    }

    pub fn toggle_resizer(&mut self) {
        self.show_resizer = !self.show_resizer;
    }
}
