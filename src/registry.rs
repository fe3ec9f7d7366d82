//! Registry of the engines currently shown side by side

use crate::{
    error::{PaneError, Result},
    types::{Engine, EngineKey, EngineName, DEFAULT_QUERY, MAX_ACTIVE_ENGINES},
    utils::{keys::UniqueKeyAllocator, query},
};
use log::{debug, info};
use url::Url;

/// Ordered collection of active engines.
///
/// Entries keep insertion order, which is also pane order. Relative engine
/// templates are resolved against `origin`, so every stored URL is absolute.
#[derive(Debug)]
pub struct EngineRegistry {
    origin: Url,
    engines: Vec<Engine>,
    keys: UniqueKeyAllocator,
}

impl EngineRegistry {
    /// Create an empty registry whose proxied engines resolve against `origin`
    pub fn new(origin: Url) -> Result<Self> {
        if origin.cannot_be_a_base() {
            return Err(PaneError::ConfigError(format!(
                "Origin '{origin}' cannot be used as a base URL"
            )));
        }

        Ok(Self {
            origin,
            engines: Vec::new(),
            keys: UniqueKeyAllocator::new(),
        })
    }

    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Build a fresh entry for `name` carrying `shared_query`.
    ///
    /// Holds a key, so the entry must go straight to [`Self::push_entry`].
    fn create_entry(&mut self, name: EngineName, shared_query: Option<&str>) -> Result<Engine> {
        let template = name.template();
        let mut url = query::resolve_url(&self.origin, template.base)?;

        query::clear_query(&mut url);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(template.query_param, shared_query.unwrap_or(DEFAULT_QUERY));
            for (key, value) in template.extra_params {
                pairs.append_pair(key, value);
            }
        }

        let key = self.keys.allocate();
        debug!("Created {name} entry {key}: {url}");

        Ok(Engine {
            key,
            name,
            url,
            icon: template.icon,
            panel: key,
        })
    }

    /// Copy an existing entry under a fresh key; the source is untouched
    fn clone_entry(&mut self, existing: &Engine) -> Engine {
        let key = self.keys.allocate();
        debug!("Cloned {} entry {} as {key}", existing.name, existing.key);

        Engine {
            key,
            panel: key,
            ..existing.clone()
        }
    }

    /// Append an engine, reusing the URL of the latest entry with the same name.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when [`MAX_ACTIVE_ENGINES`] are already active; the
    /// registry is left unchanged.
    pub fn add_engine(&mut self, name: EngineName, shared_query: Option<&str>) -> Result<EngineKey> {
        if self.engines.len() >= MAX_ACTIVE_ENGINES {
            info!("Rejected adding {name}: {MAX_ACTIVE_ENGINES} engines already active");
            return Err(PaneError::CapacityExceeded {
                limit: MAX_ACTIVE_ENGINES,
            });
        }

        let existing = self.engines.iter().rev().find(|e| e.name == name).cloned();
        let engine = match existing {
            Some(existing) => self.clone_entry(&existing),
            None => self.create_entry(name, shared_query)?,
        };

        self.push_entry(engine)
    }

    /// Append an entry built by [`Self::create_entry`] or [`Self::clone_entry`].
    ///
    /// On rejection the entry's key is released.
    fn push_entry(&mut self, engine: Engine) -> Result<EngineKey> {
        if self.engines.len() >= MAX_ACTIVE_ENGINES {
            self.keys.release(engine.key);
            return Err(PaneError::CapacityExceeded {
                limit: MAX_ACTIVE_ENGINES,
            });
        }

        let key = engine.key;
        self.engines.push(engine);
        Ok(key)
    }

    /// Remove an engine and release its key.
    ///
    /// # Errors
    ///
    /// `EngineNotFound` for an unknown key, `LastEngine` when it is the only
    /// active entry.
    pub fn remove_engine(&mut self, key: EngineKey) -> Result<Engine> {
        let index = self
            .engines
            .iter()
            .position(|e| e.key == key)
            .ok_or(PaneError::EngineNotFound(key))?;

        if self.engines.len() <= 1 {
            info!("Rejected removing engine {key}: it is the last active engine");
            return Err(PaneError::LastEngine);
        }

        let engine = self.engines.remove(index);
        self.keys.release(key);
        debug!("Removed {} entry {key}", engine.name);
        Ok(engine)
    }

    /// Even split of display space, in percent, one slot per entry
    pub fn reset_layout(&self) -> Vec<f64> {
        let count = self.engines.len();
        if count == 0 {
            return Vec::new();
        }
        vec![100.0 / count as f64; count]
    }

    pub fn get(&self, key: EngineKey) -> Option<&Engine> {
        self.engines.iter().find(|e| e.key == key)
    }

    pub fn get_mut(&mut self, key: EngineKey) -> Option<&mut Engine> {
        self.engines.iter_mut().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Engine> {
        self.engines.iter()
    }

    pub fn keys(&self) -> Vec<EngineKey> {
        self.engines.iter().map(|e| e.key).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}
