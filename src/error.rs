// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;
use thiserror::Error;

use crate::request::resources::ResourceName;

/// Field-level failures raised while decoding a provisioning request.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("malformed request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot decode {found} into {field} of type {expected}")]
    TypeMismatch {
        found: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("data contains illegal spaces")]
    IllegalSpaces,

    #[error("data contains illegal underscores")]
    IllegalUnderscores,

    #[error("optional name entry is invalid: {0}")]
    InvalidName(String),

    #[error("optional unit entry is invalid: {0}")]
    InvalidUnit(String),

    #[error("invalid or missing unit for: {0}")]
    MissingUnit(ResourceName),
}

impl DecodeError {
    pub(crate) fn type_mismatch(
        value: &serde_json::Value,
        field: &'static str,
        expected: &'static str,
    ) -> Self {
        use serde_json::Value;

        let found = match value {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Number(n) => format!("number {}", n),
            Value::String(_) => "string".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::Object(_) => "object".to_string(),
        };
        DecodeError::TypeMismatch {
            found,
            field,
            expected,
        }
    }
}

/// Failures while parsing or executing a template, tagged with the source line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("line {line}: syntax error: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: execution error: {message}")]
    Exec { line: usize, message: String },
}

impl TemplateError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        TemplateError::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn exec(line: usize, message: impl Into<String>) -> Self {
        TemplateError::Exec {
            line,
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateError,
    },

    #[error("template {name} did not render valid JSON: {source}")]
    RenderedJson {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("template {name} entry {index} is not a manifest entry: {source}")]
    InvalidEntry {
        name: String,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("template {name} must render a JSON array, found {found}")]
    NotAnArray { name: String, found: &'static str },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to read template {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("kubeconfig error: {0}")]
    KubeconfigError(String),

    #[error("supplied namespace not found: {0}")]
    NamespaceNotFound(String),
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
