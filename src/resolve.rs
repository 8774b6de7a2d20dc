// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Quota value resolution.
//!
//! Each resolver returns a JSON literal as text, meant to be spliced into a
//! template before the rendered output is parsed.

use crate::request::{ManifestRequest, ResourceName};

/// Fallback supplied by a template when the request carries no override
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaDefault {
    /// Emitted as a quoted JSON string
    String(String),
    /// Emitted as a bare JSON number
    Integer(i64),
}

impl QuotaDefault {
    fn to_json(&self) -> String {
        match self {
            QuotaDefault::String(s) => quoted(s),
            QuotaDefault::Integer(i) => i.to_string(),
        }
    }
}

/// `limits.cpu`: bare number without a unit, quoted quantity with one
pub fn resolve_cpu(request: &ManifestRequest, default: &QuotaDefault) -> String {
    match request.optionals().find(ResourceName::Cpu) {
        Some(entry) if entry.unit().is_some() => quoted(&entry.quantity()),
        Some(entry) => entry.count().to_string(),
        None => default.to_json(),
    }
}

/// `limits.memory`: always a quoted quantity
pub fn resolve_memory(request: &ManifestRequest, default: &QuotaDefault) -> String {
    quantity_or_default(request, ResourceName::Memory, default)
}

/// `persistentvolumeclaims`: always a bare count
pub fn resolve_volumes(request: &ManifestRequest, default: &QuotaDefault) -> String {
    match request.optionals().find(ResourceName::Volumes) {
        Some(entry) => entry.count().to_string(),
        None => default.to_json(),
    }
}

/// `requests.storage`: always a quoted quantity
pub fn resolve_storage(request: &ManifestRequest, default: &QuotaDefault) -> String {
    quantity_or_default(request, ResourceName::Storage, default)
}

fn quantity_or_default(
    request: &ManifestRequest,
    name: ResourceName,
    default: &QuotaDefault,
) -> String {
    request
        .optionals()
        .find(name)
        .map(|entry| quoted(&entry.quantity()))
        .unwrap_or_else(|| default.to_json())
}

fn quoted(s: &str) -> String {
    serde_json::Value::from(s).to_string()
}
