// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Turns one template into a parsed JSON fragment

use crate::assemble::ManifestEntry;
use crate::error::{ProvisionError, Result};
use crate::request::ManifestRequest;
use crate::template::Template;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

/// The entries rendered by a single template, in source order
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFragment {
    template: String,
    entries: Vec<Value>,
}

impl RenderedFragment {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }
}

/// Execute `template` and require its output to be a JSON array of manifest entries
#[instrument(skip_all, fields(template = %template.name()))]
pub fn render(template: &Template, request: &ManifestRequest) -> Result<RenderedFragment> {
    let text = template.execute(request)?;

    let value: Value =
        serde_json::from_str(&text).map_err(|source| ProvisionError::RenderedJson {
            name: template.name().to_string(),
            source,
        })?;

    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(ProvisionError::NotAnArray {
                name: template.name().to_string(),
                found: json_kind(&other),
            })
        }
    };

    for (index, entry) in entries.iter().enumerate() {
        ManifestEntry::deserialize(entry).map_err(|source| ProvisionError::InvalidEntry {
            name: template.name().to_string(),
            index,
            source,
        })?;
    }

    debug!("Rendered {} entries", entries.len());
    Ok(RenderedFragment {
        template: template.name().to_string(),
        entries,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
