//! The side-by-side search page: engines, layout and settings in one place

use crate::{
    error::Result,
    layout::{Direction, PanelLayout},
    registry::EngineRegistry,
    settings::ParamEditor,
    sync,
    types::{Engine, EngineKey, EngineName},
    utils::query,
};
use log::{debug, info};
use std::time::Instant;
use url::Url;

/// Engines created on page load
pub const DEFAULT_ENGINES: [EngineName; 2] = [EngineName::Bing, EngineName::Google];

/// Page address used when none is supplied
pub const DEFAULT_PAGE_URL: &str = "http://localhost:3000/";

/// Headless state of the search page.
///
/// The page address doubles as the bookmarkable state: `dir` selects the
/// split direction and `q` holds the latest shared query.
#[derive(Debug)]
pub struct Workspace {
    page: Url,
    registry: EngineRegistry,
    layout: PanelLayout,
    settings: ParamEditor,
}

impl Workspace {
    /// Initialize from the page address, creating the default engines
    pub fn from_page_url(page: Url) -> Result<Self> {
        let direction = Direction::from_param(query::get_param(&page, "dir").as_deref());

        let mut workspace = Self {
            registry: EngineRegistry::new(page.clone())?,
            layout: PanelLayout::new(direction),
            settings: ParamEditor::new(),
            page,
        };

        for name in DEFAULT_ENGINES {
            workspace.add_engine(name)?;
        }

        debug!(
            "Workspace ready: {} split, {} engines",
            workspace.layout.direction,
            workspace.registry.len()
        );
        Ok(workspace)
    }

    pub fn parse(page: &str) -> Result<Self> {
        Self::from_page_url(Url::parse(page)?)
    }

    /// Current page address, suitable for bookmarking
    pub fn page_url(&self) -> &Url {
        &self.page
    }

    /// Latest shared query recorded on the page
    pub fn shared_query(&self) -> Option<String> {
        query::get_param(&self.page, "q")
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    pub fn engines(&self) -> impl Iterator<Item = &Engine> {
        self.registry.iter()
    }

    pub fn layout(&self) -> &PanelLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut PanelLayout {
        &mut self.layout
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.layout.direction = direction;
    }

    /// Send `text` to every engine and record it as the page's `q`
    pub fn submit_query(&mut self, text: &str) {
        query::set_param(&mut self.page, "q", text);
        sync::submit_shared_query(&mut self.registry, text);
        info!("Shared query submitted to {} engines", self.registry.len());
    }

    /// Add an engine from the menu, carrying the page's current query.
    ///
    /// A capacity rejection comes back as `CapacityExceeded`; use
    /// [`crate::PaneError::notice`] to show it.
    pub fn add_engine(&mut self, name: EngineName) -> Result<EngineKey> {
        let shared_query = self.shared_query();
        let key = self.registry.add_engine(name, shared_query.as_deref())?;
        if let Some(engine) = self.registry.get(key) {
            self.layout.attach(engine.panel);
        }
        Ok(key)
    }

    /// Remove an engine; if only collapsed panes remain, the first is expanded
    pub fn remove_engine(&mut self, key: EngineKey) -> Result<Engine> {
        let engine = self.registry.remove_engine(key)?;
        self.layout.detach(engine.panel);
        self.layout.ensure_visible();
        Ok(engine)
    }

    /// Collapse or expand an engine's pane; hiding the last visible pane is a no-op
    pub fn toggle_engine(&mut self, key: EngineKey) -> bool {
        match self.registry.get(key) {
            Some(engine) => self.layout.toggle(engine.panel),
            None => false,
        }
    }

    /// Give every pane an equal share
    pub fn reset_layout(&mut self) {
        let sizes = self.registry.reset_layout();
        self.layout.set_layout(&sizes);
    }

    pub fn on_layout_change(&mut self, now: Instant) {
        self.layout.width_overlay.on_layout_change(now);
    }

    pub fn show_widths(&self, now: Instant) -> bool {
        self.layout.width_overlay.is_visible(now)
    }

    pub fn open_settings(&mut self) {
        self.settings.open(&self.registry);
    }

    pub fn settings(&self) -> &ParamEditor {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ParamEditor {
        &mut self.settings
    }

    /// Reload one engine's draft from its live URL
    pub fn reset_settings(&mut self, key: EngineKey) {
        self.settings.reset(key, &self.registry);
    }

    /// Apply the settings drafts, replacing every engine's parameters
    pub fn submit_settings(&mut self) {
        let params = self.settings.submit();
        sync::apply_params(&mut self.registry, &params, true);
        info!("Applied settings for {} engines", params.len());
    }
}
