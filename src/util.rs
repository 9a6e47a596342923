// SPDX-License-Identifier: MPL-2.0
//! Small helpers shared across the crate.

use toml::{Table, Value};

/// Merges `source` into `target`.
///
/// Keys whose values are tables on both sides are merged key by key;
/// anything else in `source` overwrites the value in `target`.
pub fn merge_tables(target: &mut Table, source: &Table) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Returns a new table holding `base` with every `layers` entry merged over it in order.
#[must_use]
pub fn merged(base: &Table, layers: &[&Table]) -> Table {
    let mut result = base.clone();
    for layer in layers {
        merge_tables(&mut result, layer);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(source: &str) -> Table {
        toml::from_str(source).expect("test table should parse")
    }

    #[test]
    fn scalars_overwrite() {
        let mut target = table("duration_ms = 3000\nkind = 'info'");
        merge_tables(&mut target, &table("kind = 'error'"));

        assert_eq!(target["kind"].as_str(), Some("error"));
        assert_eq!(target["duration_ms"].as_integer(), Some(3000));
    }

    #[test]
    fn nested_tables_merge_key_wise() {
        let mut target = table("[style]\nwidth = 'auto'\ncolor = 'blue'");
        merge_tables(&mut target, &table("[style]\nwidth = '200px'"));

        let style = target["style"].as_table().expect("style stays a table");
        assert_eq!(style["width"].as_str(), Some("200px"));
        assert_eq!(style["color"].as_str(), Some("blue"));
    }

    #[test]
    fn table_replaces_scalar() {
        let mut target = table("style = 'plain'");
        merge_tables(&mut target, &table("[style]\nwidth = '10px'"));
        assert!(target["style"].is_table());
    }

    #[test]
    fn merged_applies_layers_in_order() {
        let base = table("a = 1\nb = 1");
        let first = table("a = 2");
        let second = table("a = 3\nc = 3");

        let result = merged(&base, &[&first, &second]);
        assert_eq!(result["a"].as_integer(), Some(3));
        assert_eq!(result["b"].as_integer(), Some(1));
        assert_eq!(result["c"].as_integer(), Some(3));
        // The base is left untouched.
        assert_eq!(base["a"].as_integer(), Some(1));
    }
}
