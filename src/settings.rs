//! Settings-panel editor for per-engine parameter overrides

use crate::{
    registry::EngineRegistry,
    types::{Engine, EngineKey, ParamsByKey},
};
use log::debug;
use std::collections::BTreeMap;

/// Stable identity of an editor row, independent of its name or position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowId(pub u64);

/// One editable `name=value` parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    pub id: RowId,
    pub name: String,
    pub value: String,
}

/// Pending parameter edits for every active engine.
///
/// Rows are addressed by [`RowId`], so two rows that share a name can still
/// be edited or removed independently.
#[derive(Debug, Default)]
pub struct ParamEditor {
    drafts: BTreeMap<EngineKey, Vec<ParamRow>>,
    next_row: u64,
    open: bool,
}

impl ParamEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the panel, loading each engine's live parameters
    pub fn open(&mut self, registry: &EngineRegistry) {
        self.drafts.clear();
        for engine in registry.iter() {
            let rows = self.rows_from(engine);
            self.drafts.insert(engine.key, rows);
        }
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Current draft rows for an engine; empty if it has no draft
    pub fn rows(&self, engine: EngineKey) -> &[ParamRow] {
        self.drafts.get(&engine).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a blank row.
    ///
    /// Returns `None` when the engine has no draft or already has a row
    /// with an empty name.
    pub fn add_row(&mut self, engine: EngineKey) -> Option<RowId> {
        let id = RowId(self.next_row);
        let rows = self.drafts.get_mut(&engine)?;
        if rows.iter().any(|row| row.name.is_empty()) {
            return None;
        }

        rows.push(ParamRow {
            id,
            name: String::new(),
            value: String::new(),
        });
        self.next_row += 1;
        Some(id)
    }

    pub fn remove_row(&mut self, engine: EngineKey, row: RowId) {
        if let Some(rows) = self.drafts.get_mut(&engine) {
            rows.retain(|r| r.id != row);
        }
    }

    pub fn set_name(&mut self, engine: EngineKey, row: RowId, name: &str) {
        if let Some(r) = self.row_mut(engine, row) {
            r.name = name.to_string();
        }
    }

    pub fn set_value(&mut self, engine: EngineKey, row: RowId, value: &str) {
        if let Some(r) = self.row_mut(engine, row) {
            r.value = value.to_string();
        }
    }

    /// Discard pending edits for one engine and reload from its live URL
    pub fn reset(&mut self, engine: EngineKey, registry: &EngineRegistry) {
        let Some(live) = registry.get(engine) else {
            self.drafts.remove(&engine);
            return;
        };
        let rows = self.rows_from(live);
        debug!("Reset settings draft for engine {engine}");
        self.drafts.insert(engine, rows);
    }

    /// Close the panel and hand back the full edited set for every engine
    pub fn submit(&mut self) -> ParamsByKey {
        self.open = false;
        self.drafts
            .iter()
            .map(|(key, rows)| {
                let params = rows
                    .iter()
                    .map(|row| (row.name.clone(), row.value.clone()))
                    .collect();
                (*key, params)
            })
            .collect()
    }

    fn rows_from(&mut self, engine: &Engine) -> Vec<ParamRow> {
        engine
            .query_pairs()
            .into_iter()
            .map(|(name, value)| {
                let id = RowId(self.next_row);
                self.next_row += 1;
                ParamRow { id, name, value }
            })
            .collect()
    }

    fn row_mut(&mut self, engine: EngineKey, row: RowId) -> Option<&mut ParamRow> {
        self.drafts.get_mut(&engine)?.iter_mut().find(|r| r.id == row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EngineName;
    use url::Url;

    fn setup() -> (EngineRegistry, EngineKey) {
        let mut registry =
            EngineRegistry::new(Url::parse("http://localhost:3000/").unwrap()).unwrap();
        let key = registry.add_engine(EngineName::Google, Some("cats")).unwrap();
        (registry, key)
    }

    fn names(editor: &ParamEditor, key: EngineKey) -> Vec<&str> {
        editor.rows(key).iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_open_loads_live_params() {
        let (registry, key) = setup();
        let mut editor = ParamEditor::new();
        editor.open(&registry);

        assert!(editor.is_open());
        assert_eq!(names(&editor, key), vec!["q", "igu", "hl"]);
        assert_eq!(editor.rows(key)[0].value, "cats");
    }

    #[test]
    fn test_only_one_blank_row() {
        let (registry, key) = setup();
        let mut editor = ParamEditor::new();
        editor.open(&registry);

        let blank = editor.add_row(key).unwrap();
        assert!(editor.add_row(key).is_none());

        editor.set_name(key, blank, "safe");
        assert!(editor.add_row(key).is_some());
    }

    #[test]
    fn test_add_row_for_unknown_engine() {
        let mut editor = ParamEditor::new();
        assert!(editor.add_row(EngineKey(7)).is_none());
    }

    #[test]
    fn test_duplicate_names_edited_by_row_id() {
        let (registry, key) = setup();
        let mut editor = ParamEditor::new();
        editor.open(&registry);

        let row = editor.add_row(key).unwrap();
        editor.set_name(key, row, "q");
        editor.set_value(key, row, "dogs");

        // Removing the new row leaves the original `q` in place.
        editor.remove_row(key, row);
        assert_eq!(names(&editor, key), vec!["q", "igu", "hl"]);
        assert_eq!(editor.rows(key)[0].value, "cats");
    }

    #[test]
    fn test_reset_discards_edits() {
        let (registry, key) = setup();
        let mut editor = ParamEditor::new();
        editor.open(&registry);

        let first = editor.rows(key)[0].id;
        editor.set_value(key, first, "changed");
        let second = editor.rows(key)[1].id;
        editor.remove_row(key, second);

        editor.reset(key, &registry);
        assert_eq!(names(&editor, key), vec!["q", "igu", "hl"]);
        assert_eq!(editor.rows(key)[0].value, "cats");
    }

    #[test]
    fn test_submit_returns_full_set_and_closes() {
        let (registry, key) = setup();
        let mut editor = ParamEditor::new();
        editor.open(&registry);

        for id in editor.rows(key).iter().map(|r| r.id).collect::<Vec<_>>() {
            editor.remove_row(key, id);
        }
        let row = editor.add_row(key).unwrap();
        editor.set_name(key, row, "q");
        editor.set_value(key, row, "birds");

        let submitted = editor.submit();
        assert!(!editor.is_open());
        assert_eq!(
            submitted.get(&key).unwrap(),
            &vec![("q".to_string(), "birds".to_string())]
        );
    }
}
