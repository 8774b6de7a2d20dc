// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! The provisioning request and its field-level decoders

pub mod resources;

use crate::constants::SHOW_DEFAULTS_PROJECT;
use crate::error::DecodeError;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub use resources::{ResourceName, ResourceRequest, ResourceTable, Unit};

/// A validated, normalised provisioning request. Immutable once decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestRequest {
    #[serde(rename = "projectname")]
    project_name: String,
    environment: String,
    optionals: ResourceTable,
}

impl ManifestRequest {
    /// Validate already-separated fields the same way `decode` does
    pub fn new(
        project_name: &str,
        environment: &str,
        optionals: Vec<ResourceRequest>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            project_name: normalize_project_name(project_name)?,
            environment: environment.to_lowercase(),
            optionals: ResourceTable::new(optionals),
        })
    }

    /// Parse and validate a raw JSON payload
    pub fn from_json(input: &[u8]) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_slice(input)?;
        Self::decode(&value)
    }

    /// Validate a generic JSON value. Unknown keys are ignored and `null` counts as absent.
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(value, "request", "object"))?;
        let present = |key: &str| object.get(key).filter(|v| !v.is_null());

        let project_name = match present("projectname") {
            Some(Value::String(name)) => normalize_project_name(name)?,
            Some(other) => return Err(DecodeError::type_mismatch(other, "projectname", "string")),
            None => String::new(),
        };

        let environment = match present("environment") {
            Some(Value::String(env)) => env.to_lowercase(),
            Some(other) => return Err(DecodeError::type_mismatch(other, "environment", "string")),
            None => String::new(),
        };

        let optionals = match present("optionals") {
            Some(Value::Array(items)) => items
                .iter()
                .map(ResourceRequest::decode)
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => return Err(DecodeError::type_mismatch(other, "optionals", "array")),
            None => Vec::new(),
        };

        debug!(
            "Decoded request for project '{}' with {} optional entries",
            project_name,
            optionals.len()
        );

        Ok(Self {
            project_name,
            environment,
            optionals: ResourceTable::new(optionals),
        })
    }

    /// The request used to expose the defaults baked into templates
    pub fn show_defaults() -> Self {
        Self {
            project_name: SHOW_DEFAULTS_PROJECT.to_string(),
            environment: String::new(),
            optionals: ResourceTable::default(),
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn optionals(&self) -> &ResourceTable {
        &self.optionals
    }
}

fn normalize_project_name(name: &str) -> Result<String, DecodeError> {
    if name.contains(' ') {
        return Err(DecodeError::IllegalSpaces);
    }
    if name.contains('_') {
        return Err(DecodeError::IllegalUnderscores);
    }
    Ok(name.to_lowercase())
}
