// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Optional quota overrides and the table they are looked up in

use crate::constants::VALID_UNITS;
use crate::error::DecodeError;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// The quota dimensions a request may override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceName {
    Cpu,
    Memory,
    Volumes,
    Storage,
}

impl ResourceName {
    /// Exact, case-sensitive match against the recognised names
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "cpu" => Some(ResourceName::Cpu),
            "memory" => Some(ResourceName::Memory),
            "volumes" => Some(ResourceName::Volumes),
            "storage" => Some(ResourceName::Storage),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceName::Cpu => "cpu",
            ResourceName::Memory => "memory",
            ResourceName::Volumes => "volumes",
            ResourceName::Storage => "storage",
        }
    }

    /// Memory and storage quantities are meaningless without a suffix
    pub fn requires_unit(&self) -> bool {
        matches!(self, ResourceName::Memory | ResourceName::Storage)
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A quantity suffix from the whitelist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Unit(&'static str);

impl Unit {
    pub fn parse(unit: &str) -> Option<Self> {
        VALID_UNITS.iter().copied().find(|u| *u == unit).map(Unit)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One validated `optionals` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRequest {
    name: ResourceName,
    count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<Unit>,
}

impl ResourceRequest {
    /// Build an entry from already-typed parts, applying the unit rules
    pub fn new(name: ResourceName, count: i64, unit: Option<&str>) -> Result<Self, DecodeError> {
        let unit = unit
            .map(|u| Unit::parse(u).ok_or_else(|| DecodeError::InvalidUnit(u.to_string())))
            .transpose()?;

        if unit.is_none() && name.requires_unit() {
            return Err(DecodeError::MissingUnit(name));
        }

        Ok(Self { name, count, unit })
    }

    /// Decode one entry of the `optionals` array
    pub fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(value, "optionals", "object"))?;
        let present = |key: &str| object.get(key).filter(|v| !v.is_null());

        let name = match present("name") {
            Some(Value::String(name)) => {
                ResourceName::parse(name).ok_or_else(|| DecodeError::InvalidName(name.clone()))?
            }
            Some(other) => return Err(DecodeError::type_mismatch(other, "optionals.name", "string")),
            None => return Err(DecodeError::MissingField("optionals.name")),
        };

        let count = match present("count") {
            Some(value @ Value::Number(n)) => n
                .as_i64()
                .ok_or_else(|| DecodeError::type_mismatch(value, "optionals.count", "integer"))?,
            Some(other) => {
                return Err(DecodeError::type_mismatch(other, "optionals.count", "integer"))
            }
            None => return Err(DecodeError::MissingField("optionals.count")),
        };

        let unit = match present("unit") {
            Some(Value::String(unit)) => Some(unit.as_str()),
            Some(other) => return Err(DecodeError::type_mismatch(other, "optionals.unit", "string")),
            None => None,
        };

        Self::new(name, count, unit)
    }

    pub fn name(&self) -> ResourceName {
        self.name
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn unit(&self) -> Option<Unit> {
        self.unit
    }

    /// The count with its suffix appended, e.g. "100Gi"
    pub fn quantity(&self) -> String {
        match self.unit {
            Some(unit) => format!("{}{}", self.count, unit),
            None => self.count.to_string(),
        }
    }
}

/// Read-only view over the optional entries of a request.
///
/// Duplicate names are accepted; lookups return the first entry in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceTable(Vec<ResourceRequest>);

impl ResourceTable {
    pub fn new(entries: Vec<ResourceRequest>) -> Self {
        Self(entries)
    }

    pub fn find(&self, name: ResourceName) -> Option<&ResourceRequest> {
        self.0.iter().find(|entry| entry.name == name)
    }

    pub fn as_slice(&self) -> &[ResourceRequest] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
