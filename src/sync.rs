//! Keeps engine URLs in step with the shared query and parameter overrides

use crate::{
    registry::EngineRegistry,
    types::{EngineKey, ParamsByKey},
    utils::query,
};
use log::debug;

/// Apply per-engine parameter lists to the registry.
///
/// For each engine key, its URL query is optionally cleared and then each
/// `(name, value)` pair is set or replaced in order. Keys with no active
/// engine are skipped, as are pairs with an empty name.
pub fn apply_params(registry: &mut EngineRegistry, params_by_key: &ParamsByKey, clear_existing: bool) {
    for (key, params) in params_by_key {
        let Some(engine) = registry.get_mut(*key) else {
            debug!("Skipping parameter update for missing engine {key}");
            continue;
        };

        let mut url = engine.url.clone();
        if clear_existing {
            query::clear_query(&mut url);
        }

        for (name, value) in params {
            if name.is_empty() {
                continue;
            }
            query::set_param(&mut url, name, value);
        }

        debug!("Engine {key} ({}) now at {url}", engine.name);
        engine.url = url;
    }
}

/// Parameter lists that carry `text` to every active engine under its own
/// query parameter name (`q` or `wd`)
pub fn shared_query_params(registry: &EngineRegistry, text: &str) -> ParamsByKey {
    registry
        .iter()
        .map(|engine| {
            (
                engine.key,
                vec![(engine.name.query_param().to_string(), text.to_string())],
            )
        })
        .collect()
}

/// Distribute the shared query to every engine, keeping other parameters
pub fn submit_shared_query(registry: &mut EngineRegistry, text: &str) {
    let params = shared_query_params(registry, text);
    apply_params(registry, &params, false);
}

/// Single-engine convenience over [`apply_params`]
pub fn apply_engine_params(
    registry: &mut EngineRegistry,
    key: EngineKey,
    params: Vec<(String, String)>,
    clear_existing: bool,
) {
    let mut params_by_key = ParamsByKey::new();
    params_by_key.insert(key, params);
    apply_params(registry, &params_by_key, clear_existing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineName;
    use url::Url;

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    fn registry_with_bing(url: &str) -> (EngineRegistry, EngineKey) {
        let mut registry =
            EngineRegistry::new(Url::parse("http://localhost:3000/").unwrap()).unwrap();
        let key = registry.add_engine(EngineName::Bing, None).unwrap();
        registry.get_mut(key).unwrap().url = Url::parse(url).unwrap();
        (registry, key)
    }

    #[test]
    fn test_clear_existing_replaces_everything() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search?a=1&b=2");

        apply_engine_params(&mut registry, key, vec![pair("c", "3")], true);

        assert_eq!(registry.get(key).unwrap().query_pairs(), vec![pair("c", "3")]);
    }

    #[test]
    fn test_merge_keeps_untouched_params() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search?a=1&b=2");

        apply_engine_params(&mut registry, key, vec![pair("a", "9")], false);

        assert_eq!(
            registry.get(key).unwrap().query_pairs(),
            vec![pair("a", "9"), pair("b", "2")]
        );
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search?a=1");

        apply_engine_params(
            &mut registry,
            key,
            vec![pair("", "ignored"), pair("b", "2")],
            false,
        );

        assert_eq!(
            registry.get(key).unwrap().query_pairs(),
            vec![pair("a", "1"), pair("b", "2")]
        );
    }

    #[test]
    fn test_clearing_with_no_params_drops_query() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search?a=1");

        apply_engine_params(&mut registry, key, vec![], true);

        assert_eq!(
            registry.get(key).unwrap().url.as_str(),
            "https://www.bing.com/search"
        );
    }

    #[test]
    fn test_missing_engine_is_skipped() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search?a=1");
        let missing = EngineKey((key.0 + 1) % 100);

        let mut params = ParamsByKey::new();
        params.insert(missing, vec![pair("x", "1")]);
        params.insert(key, vec![pair("a", "2")]);
        apply_params(&mut registry, &params, false);

        assert_eq!(registry.get(key).unwrap().query_pairs(), vec![pair("a", "2")]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_later_pairs_win() {
        let (mut registry, key) = registry_with_bing("https://www.bing.com/search");

        apply_engine_params(
            &mut registry,
            key,
            vec![pair("a", "1"), pair("a", "2")],
            true,
        );

        assert_eq!(registry.get(key).unwrap().query_pairs(), vec![pair("a", "2")]);
    }

    #[test]
    fn test_shared_query_uses_engine_param_names() {
        let mut registry =
            EngineRegistry::new(Url::parse("http://localhost:3000/").unwrap()).unwrap();
        let google = registry.add_engine(EngineName::Google, None).unwrap();
        let baidu = registry.add_engine(EngineName::Baidu, None).unwrap();

        submit_shared_query(&mut registry, "rust");

        let google = registry.get(google).unwrap();
        assert_eq!(google.query_value("q").as_deref(), Some("rust"));
        assert_eq!(google.query_value("igu").as_deref(), Some("1"));
        assert_eq!(
            registry.get(baidu).unwrap().query_value("wd").as_deref(),
            Some("rust")
        );
    }
}
