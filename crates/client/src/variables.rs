//! Variable extraction from dashboard documents.
//!
//! Turns the opaque JSON tree of a dashboard into a name → current-value
//! map. Dashboards without templating, or with partially formed entries,
//! are common in the wild; every shape mismatch degrades to a default
//! instead of an error.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::models::DashboardDocument;

/// Variable name → currently selected textual value.
pub type VariableMap = BTreeMap<String, String>;

/// Extract template variables and their current selections.
///
/// Walks `templating.list[*]`, reading `name` and `current.text` with
/// empty-string defaults at every missing or mistyped step. Later entries
/// with the same name overwrite earlier ones. Never fails.
pub fn extract_variables(document: &DashboardDocument) -> VariableMap {
    let mut variables = VariableMap::new();

    let list = document
        .as_value()
        .get("templating")
        .and_then(|templating| templating.get("list"))
        .and_then(Value::as_array);
    let Some(list) = list else {
        return variables;
    };

    for entry in list {
        // Entries that are not objects carry neither name nor value.
        let Some(entry) = entry.as_object() else {
            continue;
        };
        let name = entry
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let value = entry
            .get("current")
            .and_then(|current| current.get("text"))
            .map(current_text)
            .unwrap_or_default();
        variables.insert(name.to_string(), value);
    }

    variables
}

/// Textual rendering of a `current.text` node.
///
/// Multi-value selections arrive as arrays of strings and are joined with
/// `", "`; any other non-string shape degrades to the empty string.
fn current_text(text: &Value) -> String {
    match text {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}
