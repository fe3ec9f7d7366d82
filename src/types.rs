//! Core types for the search workspace

use crate::error::PaneError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Shared query used when none has been supplied yet
pub const DEFAULT_QUERY: &str = "flowers";

/// Maximum number of engines shown side by side
pub const MAX_ACTIVE_ENGINES: usize = 4;

/// Identifier of an active engine, unique among active engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineKey(pub u32);

impl fmt::Display for EngineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle into the pane layout; the layout owns collapsed state and size
pub type PanelId = EngineKey;

/// Opaque reference to the glyph used for an engine
pub type IconRef = &'static str;

/// Per-engine ordered parameter lists, keyed by engine key
pub type ParamsByKey = BTreeMap<EngineKey, Vec<(String, String)>>;

/// Supported search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineName {
    Bing,
    Google,
    Baidu,
    DuckDuckGo,
}

/// Fixed URL rule for one engine
#[derive(Debug)]
pub struct EngineTemplate {
    pub name: EngineName,
    /// Absolute URL, or a path served by the proxy gateway
    pub base: &'static str,
    /// Query parameter carrying the shared query
    pub query_param: &'static str,
    /// Parameters appended after the query on creation
    pub extra_params: &'static [(&'static str, &'static str)],
    pub icon: IconRef,
}

impl EngineTemplate {
    /// Whether requests go through the local proxy gateway
    pub fn is_proxied(&self) -> bool {
        self.base.starts_with('/')
    }
}

static ENGINE_TEMPLATES: [EngineTemplate; 4] = [
    EngineTemplate {
        name: EngineName::Bing,
        base: "https://www.bing.com/search",
        query_param: "q",
        extra_params: &[],
        icon: "bing-icon",
    },
    EngineTemplate {
        name: EngineName::Google,
        base: "https://www.google.com/search",
        query_param: "q",
        extra_params: &[("igu", "1"), ("hl", "en")],
        icon: "google-icon",
    },
    EngineTemplate {
        name: EngineName::Baidu,
        base: "/api/baidu/s",
        query_param: "wd",
        extra_params: &[],
        icon: "baidu-icon",
    },
    EngineTemplate {
        name: EngineName::DuckDuckGo,
        base: "/api/duckduckgo/",
        query_param: "q",
        extra_params: &[],
        icon: "duck-duck-go-icon",
    },
];

impl EngineName {
    /// All engines, in add-menu order
    pub const ALL: [EngineName; 4] = [
        EngineName::Bing,
        EngineName::Google,
        EngineName::Baidu,
        EngineName::DuckDuckGo,
    ];

    pub fn template(self) -> &'static EngineTemplate {
        &ENGINE_TEMPLATES[self as usize]
    }

    /// Parameter name that carries the shared query for this engine
    pub fn query_param(self) -> &'static str {
        self.template().query_param
    }

    pub fn icon(self) -> IconRef {
        self.template().icon
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EngineName::Bing => "bing",
            EngineName::Google => "google",
            EngineName::Baidu => "baidu",
            EngineName::DuckDuckGo => "duckduckgo",
        }
    }
}

impl fmt::Display for EngineName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EngineName {
    type Err = PaneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EngineName::ALL
            .into_iter()
            .find(|name| name.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PaneError::UnknownEngine(s.to_string()))
    }
}

/// One configured search provider shown in its own pane
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    pub key: EngineKey,
    pub name: EngineName,
    /// Current request URL including the query string
    pub url: Url,
    pub icon: IconRef,
    pub panel: PanelId,
}

impl Engine {
    /// Current query pairs, in URL order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.url.query_pairs().into_owned().collect()
    }

    /// Value of the first query parameter with the given name
    pub fn query_value(&self, name: &str) -> Option<String> {
        crate::utils::query::get_param(&self.url, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_table_is_indexed_by_name() {
        for name in EngineName::ALL {
            assert_eq!(name.template().name, name);
        }
    }

    #[test]
    fn test_query_param_rules() {
        assert_eq!(EngineName::Bing.query_param(), "q");
        assert_eq!(EngineName::Google.query_param(), "q");
        assert_eq!(EngineName::Baidu.query_param(), "wd");
        assert_eq!(EngineName::DuckDuckGo.query_param(), "q");
    }

    #[test]
    fn test_proxied_engines() {
        assert!(!EngineName::Bing.template().is_proxied());
        assert!(!EngineName::Google.template().is_proxied());
        assert!(EngineName::Baidu.template().is_proxied());
        assert!(EngineName::DuckDuckGo.template().is_proxied());
    }

    #[test]
    fn test_engine_name_parsing() {
        assert_eq!("bing".parse::<EngineName>().unwrap(), EngineName::Bing);
        assert_eq!(
            "DuckDuckGo".parse::<EngineName>().unwrap(),
            EngineName::DuckDuckGo
        );
        assert_eq!(
            "yahoo".parse::<EngineName>().unwrap_err(),
            PaneError::UnknownEngine("yahoo".to_string())
        );
    }
}
