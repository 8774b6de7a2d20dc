// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::request::{ManifestRequest, ResourceRequest};

/// A value flowing through template pipelines. Request data is borrowed, never copied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value<'a> {
    Nil,
    Bool(bool),
    Int(i64),
    Str(String),
    Request(&'a ManifestRequest),
    Resource(&'a ResourceRequest),
    Resources(&'a [ResourceRequest]),
}

impl<'a> Value<'a> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "string",
            Value::Request(_) => "request",
            Value::Resource(_) => "optional",
            Value::Resources(_) => "optionals",
        }
    }

    pub(crate) fn field(&self, name: &str) -> Result<Value<'a>, String> {
        match (self, name) {
            (Value::Request(r), "ProjectName") => Ok(Value::Str(r.project_name().to_string())),
            (Value::Request(r), "Environment") => Ok(Value::Str(r.environment().to_string())),
            (Value::Request(r), "Optionals") => Ok(Value::Resources(r.optionals().as_slice())),
            (Value::Resource(o), "Name") => Ok(Value::Str(o.name().as_str().to_string())),
            (Value::Resource(o), "Count") => Ok(Value::Int(o.count())),
            (Value::Resource(o), "Unit") => Ok(Value::Str(
                o.unit().map(|u| u.as_str()).unwrap_or_default().to_string(),
            )),
            (Value::Nil, _) => Err(format!("nil value has no field {}", name)),
            (other, _) => Err(format!(
                "can't evaluate field {} in type {}",
                name,
                other.kind()
            )),
        }
    }

    /// Go template truthiness: zero values and empty collections are false
    pub(crate) fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::Resources(items) => !items.is_empty(),
            Value::Request(_) | Value::Resource(_) => true,
        }
    }

    pub(crate) fn write_to(&self, out: &mut String) -> Result<(), String> {
        match self {
            Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Str(s) => out.push_str(s),
            other => return Err(format!("can't print value of type {}", other.kind())),
        }
        Ok(())
    }
}
