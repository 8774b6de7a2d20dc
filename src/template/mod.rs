// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Template language for manifest sources.
//!
//! A subset of Go's `text/template`: `{{ }}` actions with `{{-`/`-}}` trimming,
//! comments, `.Field` and `$var.Field` access, `:=`/`=` bindings, pipes,
//! parenthesised calls, `if`/`else if`/`else` and `range` over `.Optionals`.
//! The callable helpers are fixed: `lower`, `upper`, `replace`, `getCPU`,
//! `getMEM`, `getPVC` and `getStorage`.

mod exec;
mod helpers;
mod lexer;
mod parser;
mod value;

use crate::error::{ProvisionError, Result};
use crate::request::ManifestRequest;
use parser::Node;
use tracing::debug;

/// A parsed template source
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse a template source, failing on any syntax error
    pub fn parse(name: impl Into<String>, source: &str) -> Result<Self> {
        let name = name.into();
        let nodes = lexer::lex(source)
            .and_then(parser::parse)
            .map_err(|source| ProvisionError::Template {
                name: name.clone(),
                source,
            })?;

        debug!("Parsed template '{}' into {} nodes", name, nodes.len());
        Ok(Self { name, nodes })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute the template against a request, returning the raw rendered text
    pub fn execute(&self, request: &ManifestRequest) -> Result<String> {
        exec::execute(&self.nodes, request).map_err(|source| ProvisionError::Template {
            name: self.name.clone(),
            source,
        })
    }
}
