// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Merges rendered fragments into the final manifest document

use crate::error::{ProvisionError, Result};
use crate::render::RenderedFragment;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One output manifest: the file it should be written to and the object itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub content: Map<String, Value>,
    pub filename: String,
}

/// Shape of the assembled document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One compact array holding every entry of every template
    Flat,
    /// One pretty-printed array per template
    #[default]
    Nested,
}

/// Concatenate fragments, keeping template order and the entry order inside each
pub fn assemble(fragments: Vec<RenderedFragment>, mode: OutputMode) -> Result<String> {
    let output = match mode {
        OutputMode::Flat => {
            let entries: Vec<Value> = fragments
                .into_iter()
                .flat_map(RenderedFragment::into_entries)
                .collect();
            serde_json::to_string(&entries)
        }
        OutputMode::Nested => {
            let groups: Vec<Vec<Value>> = fragments
                .into_iter()
                .map(RenderedFragment::into_entries)
                .collect();
            serde_json::to_string_pretty(&groups)
        }
    };

    output.map_err(ProvisionError::Serialize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render;
    use crate::request::ManifestRequest;
    use crate::template::Template;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn make_fragment(name: &str, filenames: &[&str]) -> RenderedFragment {
        let entries: Vec<String> = filenames
            .iter()
            .map(|f| format!(r#"{{"filename": "{}", "content": {{"kind": "ConfigMap"}}}}"#, f))
            .collect();
        let source = format!("[{}]", entries.join(","));
        let template = Template::parse(name, &source).unwrap();
        render(&template, &ManifestRequest::show_defaults()).unwrap()
    }

    fn filenames(entries: &[ManifestEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.filename.as_str()).collect()
    }

    #[test]
    fn test_flat_preserves_order() {
        let fragments = vec![
            make_fragment("a", &["1-project.json"]),
            make_fragment("b", &["10-a.json", "10-b.json", "10-c.json"]),
            make_fragment("c", &["20-x.json", "20-y.json"]),
        ];

        let output = assemble(fragments, OutputMode::Flat).unwrap();
        let entries: Vec<ManifestEntry> = serde_json::from_str(&output).unwrap();

        assert_eq!(
            filenames(&entries),
            vec![
                "1-project.json",
                "10-a.json",
                "10-b.json",
                "10-c.json",
                "20-x.json",
                "20-y.json"
            ]
        );
        assert!(!output.contains('\n'));
    }

    #[test]
    fn test_flat_handles_empty_and_single_fragments() {
        let fragments = vec![
            make_fragment("empty", &[]),
            make_fragment("single", &["1-project.json"]),
            make_fragment("empty-again", &[]),
        ];

        let output = assemble(fragments, OutputMode::Flat).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(
            value,
            json!([{"filename": "1-project.json", "content": {"kind": "ConfigMap"}}])
        );
    }

    #[test]
    fn test_flat_with_no_fragments() {
        assert_eq!(assemble(Vec::new(), OutputMode::Flat).unwrap(), "[]");
    }

    #[test]
    fn test_nested_keeps_one_array_per_template() {
        let fragments = vec![
            make_fragment("a", &["1-project.json"]),
            make_fragment("b", &[]),
            make_fragment("c", &["10-a.json", "10-b.json"]),
        ];

        let output = assemble(fragments, OutputMode::Nested).unwrap();
        let groups: Vec<Vec<ManifestEntry>> = serde_json::from_str(&output).unwrap();

        assert_eq!(groups.len(), 3);
        assert_eq!(filenames(&groups[0]), vec!["1-project.json"]);
        assert!(groups[1].is_empty());
        assert_eq!(filenames(&groups[2]), vec!["10-a.json", "10-b.json"]);
        assert!(output.contains("\n  "));
    }
}
