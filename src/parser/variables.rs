//! Per-manifest table of `ext.<name>` version variables

use std::collections::HashMap;

/// Mapping from a variable name to its literal value
///
/// One table is created per manifest file and handed to the parser
/// explicitly, so version symbols never leak between files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableTable {
    values: HashMap<String, String>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value; a later assignment to the same name wins
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over entries sorted by name
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        entries.sort();
        entries
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for VariableTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_last_value_for_duplicate_names() {
        let mut table = VariableTable::new();
        table.insert("springVersion", "5.2.0");
        table.insert("springVersion", "5.3.9");

        assert_eq!(table.get("springVersion"), Some("5.3.9"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn get_returns_none_for_unknown_name() {
        let table = VariableTable::new();
        assert!(table.is_empty());
        assert_eq!(table.get("missing"), None);
    }

    #[test]
    fn sorted_orders_entries_by_name() {
        let table: VariableTable = [("b", "2"), ("a", "1")].into_iter().collect();
        assert_eq!(table.sorted(), vec![("a", "1"), ("b", "2")]);
    }
}
