//! URL query-string helpers

use crate::error::Result;
use url::Url;

/// Resolve an absolute URL or an origin-relative path against `origin`
pub fn resolve_url(origin: &Url, target: &str) -> Result<Url> {
    Ok(origin.join(target)?)
}

/// Set or replace a query parameter.
///
/// The first pair named `name` takes the new value in place and any later
/// pairs with that name are dropped. If none exists the pair is appended.
pub fn set_param(url: &mut Url, name: &str, value: &str) {
    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let mut replaced = false;

    pairs.retain_mut(|(key, val)| {
        if key != name {
            return true;
        }
        if replaced {
            return false;
        }
        *val = value.to_string();
        replaced = true;
        true
    });

    if !replaced {
        pairs.push((name.to_string(), value.to_string()));
    }

    write_pairs(url, &pairs);
}

/// Drop the whole query string
pub fn clear_query(url: &mut Url) {
    url.set_query(None);
}

/// Replace the query string with `pairs`; an empty list leaves no `?`
pub fn write_pairs(url: &mut Url, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        url.set_query(None);
        return;
    }
    url.query_pairs_mut().clear().extend_pairs(pairs);
}

/// Value of the first query parameter with the given name
pub fn get_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
